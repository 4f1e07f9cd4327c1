//  HISTORY.rs
//    by Lut99
//
//  Created:
//    19 Mar 2025, 14:20:09
//  Last edited:
//    25 Mar 2025, 16:02:44
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements a [`History`] of table snapshots, which lets a user step through the table-filling
//!   algorithm one pass at a time, and back.
//!
//!   Stepping back never recomputes anything; it simply moves a cursor over snapshots that were
//!   computed earlier.
//

use crate::automaton::Automaton;
use crate::classes::{Partition, extract_classes};
use crate::log::debug;
use crate::merge::{MergedAutomaton, merge};
use crate::minimize::build;
use crate::table::Table;


/***** LIBRARY *****/
/// Describes what happened in a call to [`History::next()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    /// Moved forward to a snapshot that was already computed.
    Replayed,
    /// Computed a new snapshot in which new pairs were marked.
    Refined,
    /// Computed a pass that marked nothing, meaning the previous snapshot is the fixed point.
    Converged,
    /// Did nothing, because the cursor is already at the fixed point.
    Finished,
}



/// Keeps track of all snapshots of the table as the algorithm progresses.
#[derive(Clone, Debug)]
pub struct History {
    /// The automaton being minimized.
    automaton: Automaton,
    /// All snapshots so far. Never empty; the first is the initialized table.
    snapshots: Vec<Table>,
    /// The snapshot that is currently looked at.
    cursor:    usize,
    /// Whether the last snapshot is known to be a fixed point.
    converged: bool,
}

// Constructors
impl History {
    /// Constructor for the History.
    ///
    /// # Arguments
    /// - `automaton`: The [`Automaton`] to minimize. Editing the automaton means starting a new
    ///   History.
    ///
    /// # Returns
    /// A new History positioned at the [initialized](Table::initialize()) table.
    #[inline]
    pub fn new(automaton: Automaton) -> Self {
        let table = Table::initialize(&automaton);
        Self { automaton, snapshots: vec![table], cursor: 0, converged: false }
    }
}

// Navigation
impl History {
    /// Moves one iteration forward.
    ///
    /// If this iteration was seen before, simply moves to it. Otherwise, runs a
    /// [refinement pass](Table::refine()) on the last snapshot.
    ///
    /// # Returns
    /// A [`Step`] describing what happened.
    pub fn next(&mut self) -> Step {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
            return Step::Replayed;
        }
        if self.converged {
            return Step::Finished;
        }

        let (next, changed): (Table, bool) = self.current().refine(&self.automaton);
        if changed {
            self.snapshots.push(next);
            self.cursor += 1;
            Step::Refined
        } else {
            debug!("Table converged after {} snapshot(s)", self.snapshots.len());
            self.converged = true;
            Step::Converged
        }
    }

    /// Moves one iteration back.
    ///
    /// # Returns
    /// False if we were already at the initial table, or true otherwise.
    #[inline]
    pub fn previous(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Keeps stepping forward until the fixed point is reached.
    ///
    /// # Returns
    /// The converged [`Table`].
    pub fn run_to_fixpoint(&mut self) -> &Table {
        while !matches!(self.next(), Step::Converged | Step::Finished) {}
        self.current()
    }
}

// Queries
impl History {
    /// Returns the snapshot at the cursor.
    #[inline]
    pub fn current(&self) -> &Table {
        // The cursor never exceeds the snapshots, which are never empty
        &self.snapshots[self.cursor]
    }

    /// Returns all snapshots computed so far.
    #[inline]
    pub fn snapshots(&self) -> &[Table] { &self.snapshots }

    /// Returns the index of the snapshot at the cursor.
    #[inline]
    pub const fn cursor(&self) -> usize { self.cursor }

    /// Whether the fixed point has been found.
    #[inline]
    pub const fn is_converged(&self) -> bool { self.converged }

    /// Whether the cursor is at the fixed point.
    #[inline]
    pub fn is_complete(&self) -> bool { self.converged && self.cursor + 1 == self.snapshots.len() }

    /// Returns the automaton being minimized.
    #[inline]
    pub const fn automaton(&self) -> &Automaton { &self.automaton }



    /// Merges the automaton according to the snapshot at the cursor.
    ///
    /// # Returns
    /// A [`MergedAutomaton`] that may have [ambiguous](crate::merge::MergedTransition::Ambiguous)
    /// transitions if the cursor is not at the fixed point.
    #[inline]
    pub fn merged(&self) -> MergedAutomaton { merge(&self.automaton, self.current().unmarked_pairs()) }

    /// Returns the equivalence classes of the automaton.
    ///
    /// # Returns
    /// The [`Partition`], or [`None`] if the cursor is [not at the fixed point](History::is_complete()).
    #[inline]
    pub fn classes(&self) -> Option<Partition> {
        if self.is_complete() { Some(extract_classes(self.current(), &self.automaton)) } else { None }
    }

    /// Returns the minimized automaton.
    ///
    /// # Returns
    /// The minimized [`Automaton`], or [`None`] if the cursor is
    /// [not at the fixed point](History::is_complete()).
    #[inline]
    pub fn minimized(&self) -> Option<Automaton> { self.classes().map(|classes| build(&classes, &self.automaton)) }
}





/***** TESTS *****/
