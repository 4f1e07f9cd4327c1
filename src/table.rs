//  TABLE.rs
//    by Lut99
//
//  Created:
//    14 Mar 2025, 11:02:40
//  Last edited:
//    25 Mar 2025, 14:17:51
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the distinguishability [`Table`] of the Myhill-Nerode table-filling algorithm.
//!
//!   The table tracks, for every unordered pair of distinct states, whether the pair is known to be
//!   _distinguishable_ (marked). It starts by marking all pairs where one state accepts and the
//!   other does not, and then [refines](Table::refine()) by marking pairs that transition to
//!   a marked pair on some symbol. Once a refinement pass changes nothing, the unmarked pairs are
//!   exactly the pairs of equivalent states.
//!
//!   Every state is treated the same. In particular, the start state gets no special treatment and
//!   may end up in a class with other states.
//

use std::fmt::{Display, Formatter, Result as FResult};

use enum_debug::EnumDebug;
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::automaton::{Automaton, StateId, Symbol, Target};
use crate::log::{debug, trace};


/***** LIBRARY *****/
/// An unordered pair of two distinct states.
///
/// The pair is stored canonically, i.e., with the lexicographically smallest identifier first.
/// Hence, `(a, b)` and `(b, a)` are the same Pair.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pair {
    /// The smallest of the two.
    lo: StateId,
    /// The largest of the two.
    hi: StateId,
}
impl Pair {
    /// Constructor for the Pair.
    ///
    /// # Arguments
    /// - `a`: One of the states.
    /// - `b`: The other state.
    ///
    /// # Returns
    /// A new Pair, or [`None`] if `a` and `b` are the same state.
    #[inline]
    pub fn new(a: impl Into<StateId>, b: impl Into<StateId>) -> Option<Self> {
        let (a, b): (StateId, StateId) = (a.into(), b.into());
        if a != b { Some(Self::from_distinct(a, b)) } else { None }
    }

    /// Constructor for the Pair that assumes `a` and `b` are different.
    #[inline]
    pub(crate) fn from_distinct(a: StateId, b: StateId) -> Self { if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } } }

    /// Returns the lexicographically smallest state in the pair.
    #[inline]
    pub const fn first(&self) -> &StateId { &self.lo }

    /// Returns the lexicographically largest state in the pair.
    #[inline]
    pub const fn second(&self) -> &StateId { &self.hi }

    /// Whether the given state is one of the two.
    #[inline]
    pub fn contains(&self, id: &str) -> bool { self.lo.as_str() == id || self.hi.as_str() == id }
}
impl Display for Pair {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "({}, {})", self.lo, self.hi) }
}



/// Explains why a [`Pair`] got marked.
#[derive(Clone, Debug, EnumDebug, Eq, PartialEq)]
pub enum Reason {
    /// One of the states is accepting and the other is not.
    FinalityMismatch {
        /// The state of the pair that accepts.
        accepting: StateId,
    },
    /// On some symbol, the states transition to a pair that was already marked.
    Transition {
        /// The symbol that witnesses the difference.
        symbol:  Symbol,
        /// Where the [first](Pair::first()) and [second](Pair::second()) state of the pair
        /// transition to, respectively.
        targets: (Target, Target),
    },
}
impl Display for Reason {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::FinalityMismatch { accepting } => write!(f, "One state is final ({accepting}) and the other is not"),
            Self::Transition { symbol, targets: (lhs, rhs) } => {
                write!(f, "Transitions on '{symbol}' lead to distinguishable states ({lhs}, {rhs})")
            },
        }
    }
}

/// An entry in the marking log of a [`Table`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkingRecord {
    /// The pair that got marked.
    pub pair:      Pair,
    /// Why it got marked.
    pub reason:    Reason,
    /// The pass in which it got marked. `0` is the [initialization](Table::initialize()).
    pub iteration: usize,
}
impl Display for MarkingRecord {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "Iteration {}: Marked {}: {}", self.iteration, self.pair, self.reason) }
}



/// The distinguishability table.
///
/// Tables are values: [`Table::refine()`] produces a new one instead of updating in-place, such
/// that older tables can be kept around as snapshots.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    /// The states of the automaton this table was built for, in order.
    states:    Vec<StateId>,
    /// Whether each pair of distinct states is marked. Ordered by the order of the states.
    cells:     IndexMap<Pair, bool>,
    /// The number of refinement passes that marked something.
    iteration: usize,
    /// Why things got marked, in the order they did.
    history:   Vec<MarkingRecord>,
}

// Constructors
impl Table {
    /// Initializes the table for the given automaton.
    ///
    /// This marks every pair in which exactly one of the states is accepting.
    ///
    /// # Arguments
    /// - `automaton`: The [`Automaton`] to build the table for.
    ///
    /// # Returns
    /// A new Table at iteration `0`.
    pub fn initialize(automaton: &Automaton) -> Self {
        debug!("Initializing distinguishability table for {} state(s)", automaton.len());
        let mut cells: IndexMap<Pair, bool> = IndexMap::with_capacity(automaton.len() * automaton.len().saturating_sub(1) / 2);
        let mut history: Vec<MarkingRecord> = Vec::new();
        for ((lhs, lstate), (rhs, rstate)) in automaton.states.iter().tuple_combinations() {
            let pair = Pair::from_distinct(lhs.clone(), rhs.clone());
            let mismatch: bool = lstate.role.is_final() != rstate.role.is_final();
            if mismatch {
                let accepting: &StateId = if lstate.role.is_final() { lhs } else { rhs };
                trace!("--> Marking {pair} ({} vs {})", lstate.role.variant(), rstate.role.variant());
                history.push(MarkingRecord { pair: pair.clone(), reason: Reason::FinalityMismatch { accepting: accepting.clone() }, iteration: 0 });
            }
            cells.insert(pair, mismatch);
        }
        debug!("Marked {} out of {} pair(s) on finality", history.len(), cells.len());

        Self { states: automaton.states.keys().cloned().collect(), cells, iteration: 0, history }
    }

    /// Runs the table-filling algorithm to completion.
    ///
    /// # Arguments
    /// - `automaton`: The [`Automaton`] to build the table for.
    ///
    /// # Returns
    /// A Table in which no more pairs can be marked.
    pub fn fixpoint(automaton: &Automaton) -> Self {
        let mut table = Self::initialize(automaton);
        loop {
            let (next, changed): (Self, bool) = table.refine(automaton);
            if !changed {
                debug!("Reached fixed point after {} marking pass(es)", table.iteration);
                return table;
            }
            table = next;
        }
    }
}

// Reasoning
impl Table {
    /// Performs one pass of the table-filling algorithm.
    ///
    /// For every unmarked pair, checks every symbol in the alphabet to see if the pair's states
    /// transition to a pair that is marked in _this_ table. If so, the pair is marked in the new
    /// table, citing the first symbol found.
    ///
    /// # Arguments
    /// - `automaton`: The [`Automaton`] this table was [initialized](Table::initialize()) for.
    ///
    /// # Returns
    /// A tuple of the refined table and whether anything got marked. If nothing got marked, the
    /// returned table is identical to this one (including its [iteration](Table::iteration())).
    pub fn refine(&self, automaton: &Automaton) -> (Self, bool) {
        let iteration: usize = self.iteration + 1;
        debug!("Starting marking pass {iteration}");

        let mut next: Self = self.clone();
        next.iteration = iteration;
        let mut changed: bool = false;
        for (pair, marked) in next.cells.iter_mut() {
            if *marked {
                continue;
            }
            for symbol in &automaton.alphabet {
                let lhs: &Target = automaton.target(pair.first().as_str(), symbol.as_str());
                let rhs: &Target = automaton.target(pair.second().as_str(), symbol.as_str());
                if lhs != rhs && self.is_marked(lhs, rhs) {
                    let reason = Reason::Transition { symbol: symbol.clone(), targets: (lhs.clone(), rhs.clone()) };
                    trace!("--> Marking {pair} ({}): {reason}", reason.variant());
                    *marked = true;
                    next.history.push(MarkingRecord { pair: pair.clone(), reason, iteration });
                    changed = true;
                    break;
                }
            }
        }

        if changed {
            debug!("Marking pass {iteration} marked {} new pair(s)", next.history.len() - self.history.len());
            (next, true)
        } else {
            debug!("Marking pass {iteration} marked nothing");
            (self.clone(), false)
        }
    }



    /// Checks whether two transition targets are distinguishable according to this table.
    ///
    /// # Arguments
    /// - `lhs`: The one [`Target`].
    /// - `rhs`: The other [`Target`].
    ///
    /// # Returns
    /// False if both are the same; true if exactly one of them is [`Target::None`]; or else
    /// whether their pair is marked. Pairs not in this table count as unmarked.
    pub fn is_marked(&self, lhs: &Target, rhs: &Target) -> bool {
        match (lhs, rhs) {
            (Target::State(lhs), Target::State(rhs)) => lhs != rhs && self.cells.get(&Pair::from_distinct(lhs.clone(), rhs.clone())).copied().unwrap_or(false),
            (Target::None, Target::None) => false,
            _ => true,
        }
    }

    /// Checks whether the given pair is marked.
    ///
    /// # Returns
    /// True if it is, or false if it isn't or if it isn't in this table.
    #[inline]
    pub fn is_pair_marked(&self, pair: &Pair) -> bool { self.cells.get(pair).copied().unwrap_or(false) }
}

// Collection
impl Table {
    /// Returns the states this table was built for, in order.
    #[inline]
    pub fn states(&self) -> &[StateId] { &self.states }

    /// Returns all pairs and whether they are marked.
    #[inline]
    pub fn pairs(&self) -> impl '_ + ExactSizeIterator<Item = (&Pair, bool)> { self.cells.iter().map(|(p, m)| (p, *m)) }

    /// Returns the pairs that are marked.
    #[inline]
    pub fn marked_pairs(&self) -> impl '_ + Iterator<Item = &Pair> { self.cells.iter().filter(|(_, m)| **m).map(|(p, _)| p) }

    /// Returns the pairs that are not (yet) marked.
    ///
    /// At a fixed point, these are exactly the pairs of equivalent states.
    #[inline]
    pub fn unmarked_pairs(&self) -> impl '_ + Iterator<Item = &Pair> { self.cells.iter().filter(|(_, m)| !**m).map(|(p, _)| p) }

    /// Returns the marking log.
    #[inline]
    pub fn history(&self) -> &[MarkingRecord] { &self.history }

    /// Returns the number of marking passes that have marked something.
    #[inline]
    pub const fn iteration(&self) -> usize { self.iteration }

    /// Returns the number of pairs in the table.
    #[inline]
    pub fn len(&self) -> usize { self.cells.len() }

    /// Whether the table has no pairs (i.e., was built for fewer than two states).
    #[inline]
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }
}

// Formatting
impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        writeln!(f, "Table (iteration {}) {{", self.iteration)?;
        if self.states.len() < 2 {
            writeln!(f, "    <no pairs>")?;
        } else {
            // Lower triangle: a row for every state but the first, a column for every state but the last
            let width: usize = self.states.iter().map(|s| s.as_str().chars().count()).max().unwrap_or(0).max(1);
            let mut line: String = format!("{:width$}", "");
            for col in &self.states[..self.states.len() - 1] {
                line.push_str(&format!(" {:width$}", col.as_str()));
            }
            writeln!(f, "    {}", line.trim_end())?;
            for (i, row) in self.states.iter().enumerate().skip(1) {
                let mut line: String = format!("{:width$}", row.as_str());
                for col in &self.states[..i] {
                    let cell: &str = if self.is_pair_marked(&Pair::from_distinct(row.clone(), col.clone())) { "x" } else { "." };
                    line.push_str(&format!(" {cell:width$}"));
                }
                writeln!(f, "    {}", line.trim_end())?;
            }
        }
        write!(f, "    history:")?;
        if self.history.is_empty() {
            writeln!(f, " <none>")?;
        } else {
            writeln!(f)?;
            for record in &self.history {
                writeln!(f, "      - {record}")?;
            }
        }
        writeln!(f, "}}")
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Role;
    use crate::tests::{chain, make_dfa, make_id, make_target, redundant, scenario_a, scenario_b, scenario_c};


    /// Shorthand for a pair that must exist.
    fn pair(a: &'static str, b: &'static str) -> Pair { Pair::from_distinct(make_id(a), make_id(b)) }


    #[test]
    fn test_pair_canonical() {
        assert_eq!(Pair::new("q1", "q0"), Pair::new("q0", "q1"));
        assert_eq!(Pair::new("q0", "q0"), None);
        let p = pair("q2", "q1");
        assert_eq!(p.first().as_str(), "q1");
        assert_eq!(p.second().as_str(), "q2");
        assert!(p.contains("q2"));
        assert!(!p.contains("q0"));
    }

    #[test]
    fn test_initialize_scenario_a() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = scenario_a();
        let table = Table::initialize(&dfa);
        assert_eq!(table.len(), 1);
        assert!(table.is_pair_marked(&pair("q0", "q1")));
        assert_eq!(table.history(), &[MarkingRecord {
            pair:      pair("q0", "q1"),
            reason:    Reason::FinalityMismatch { accepting: make_id("q1") },
            iteration: 0,
        }]);

        // The first pass already changes nothing
        let (next, changed) = table.refine(&dfa);
        assert!(!changed);
        assert_eq!(next, table);
    }

    #[test]
    fn test_scenario_b() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = scenario_b();
        let table = Table::initialize(&dfa);
        assert!(!table.is_pair_marked(&pair("q0", "q1")));
        assert!(table.is_pair_marked(&pair("q0", "q2")));
        assert!(table.is_pair_marked(&pair("q1", "q2")));

        let table = Table::fixpoint(&dfa);
        assert!(!table.is_pair_marked(&pair("q0", "q1")));
        assert_eq!(table.unmarked_pairs().collect::<Vec<_>>(), vec![&pair("q0", "q1")]);
        assert!(table.history().iter().all(|r| r.iteration == 0));
    }

    #[test]
    fn test_scenario_c() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = scenario_c();
        let table = Table::initialize(&dfa);
        assert!(table.is_marked(&Target::None, &make_target("r")));
        assert!(table.is_marked(&make_target("r"), &Target::None));
        assert!(!table.is_marked(&Target::None, &Target::None));
        assert_eq!(table.marked_pairs().count(), 0);

        let (table, changed) = table.refine(&dfa);
        assert!(changed);
        assert!(table.is_pair_marked(&pair("p", "q")));
        assert!(table.is_pair_marked(&pair("p", "r")));
        assert!(!table.is_pair_marked(&pair("q", "r")));
        assert_eq!(table.history()[0], MarkingRecord {
            pair:      pair("p", "q"),
            reason:    Reason::Transition { symbol: Symbol::from("a"), targets: (Target::None, make_target("r")) },
            iteration: 1,
        });
    }

    #[test]
    fn test_is_marked_lookup() {
        let table = Table::initialize(&scenario_b());
        assert!(!table.is_marked(&make_target("q0"), &make_target("q0")));
        assert!(table.is_marked(&make_target("q2"), &make_target("q0")));
        assert!(!table.is_marked(&make_target("q0"), &make_target("q1")));
        // Unknown states are never materialized, so they're unmarked
        assert!(!table.is_marked(&make_target("q0"), &make_target("q9")));
    }

    #[test]
    fn test_refine_uses_previous_pass() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = chain();
        let t0 = Table::initialize(&dfa);
        assert_eq!(t0.marked_pairs().count(), 3);

        let (t1, changed) = t0.refine(&dfa);
        assert!(changed);
        assert!(t1.is_pair_marked(&pair("p0", "p2")));
        assert!(t1.is_pair_marked(&pair("p1", "p2")));
        // Only visible one pass later, even though `(p1, p2)` was marked earlier in this pass
        assert!(!t1.is_pair_marked(&pair("p0", "p1")));

        let (t2, changed) = t1.refine(&dfa);
        assert!(changed);
        assert!(t2.is_pair_marked(&pair("p0", "p1")));
        assert_eq!(t2.history().last().map(|r| r.iteration), Some(2));

        let (t3, changed) = t2.refine(&dfa);
        assert!(!changed);
        assert_eq!(t3, t2);
        assert_eq!(Table::fixpoint(&dfa), t2);
    }

    #[test]
    fn test_monotonic() {
        let dfa = chain();
        let mut table = Table::initialize(&dfa);
        loop {
            let (next, changed) = table.refine(&dfa);
            for p in table.marked_pairs() {
                assert!(next.is_pair_marked(p), "Pair {p} got unmarked");
            }
            assert!(next.history().starts_with(table.history()));
            if !changed {
                break;
            }
            table = next;
        }
    }

    #[test]
    fn test_fixpoint_idempotent() {
        for dfa in [scenario_a(), scenario_b(), scenario_c(), chain(), redundant()] {
            let table = Table::fixpoint(&dfa);
            let (again, changed) = table.refine(&dfa);
            assert!(!changed);
            assert_eq!(again, table);
        }
    }

    #[test]
    fn test_unmarked_transitive_at_fixpoint() {
        for dfa in [scenario_a(), scenario_b(), scenario_c(), chain(), redundant()] {
            let table = Table::fixpoint(&dfa);
            let ids: Vec<Target> = dfa.states.keys().cloned().map(Target::State).collect();
            for a in &ids {
                for b in &ids {
                    for c in &ids {
                        if !table.is_marked(a, b) && !table.is_marked(b, c) {
                            assert!(!table.is_marked(a, c), "{a} ~ {b} ~ {c}, but {a} and {c} are distinguishable");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_first_witness_only() {
        // Both symbols distinguish, but only 'a' is recorded
        let dfa = make_dfa(["a", "b"], [
            ("s", Role::Start, vec![("a", "f"), ("b", "f")]),
            ("t", Role::Plain, vec![("a", "t"), ("b", "t")]),
            ("f", Role::Final, vec![("a", "f"), ("b", "f")]),
        ]);
        let table = Table::fixpoint(&dfa);
        let records: Vec<&MarkingRecord> = table.history().iter().filter(|r| r.pair == pair("s", "t")).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reason, Reason::Transition { symbol: Symbol::from("a"), targets: (make_target("f"), make_target("t")) });
    }

    #[test]
    fn test_empty_and_singleton() {
        let empty = make_dfa(["a"], []);
        let table = Table::fixpoint(&empty);
        assert!(table.is_empty());
        assert!(table.history().is_empty());

        let single = make_dfa(["a"], [("q0", Role::StartFinal, vec![("a", "q0")])]);
        let table = Table::fixpoint(&single);
        assert!(table.is_empty());
        assert_eq!(table.iteration(), 0);
    }

    #[test]
    fn test_display() {
        let table = Table::initialize(&scenario_b());
        let text: String = table.to_string();
        assert!(text.starts_with("Table (iteration 0) {\n"));
        assert!(text.contains("    q1 .\n"));
        assert!(text.contains("    q2 x  x\n"));
        assert!(text.contains("Iteration 0: Marked (q0, q2): One state is final (q2) and the other is not"));

        // The log also explains marks made by refinement
        let (table, _) = Table::initialize(&scenario_c()).refine(&scenario_c());
        assert_eq!(table.history()[0].reason.to_string(), "Transitions on 'a' lead to distinguishable states (none, r)");

        // The automata that are shown next to the table
        assert_eq!(scenario_c().to_string(), "Automaton {\n    alphabet: {a}\n    ->  p: a->none\n        q: a->r\n        r: a->r\n}\n");
        let dfa = chain();
        let merged = crate::merge::merge(&dfa, Table::initialize(&dfa).unmarked_pairs());
        assert_eq!(merged.to_string(), "Merged automaton {\n    {p0,p1,p2} (start): a->?[{p0,p1,p2} | {f}]\n    {f} (final): a->{f}\n}\n");
    }

    #[test]
    fn test_states_and_pairs() {
        let dfa = scenario_b();
        let table = Table::initialize(&dfa);
        assert_eq!(table.states(), &[make_id("q0"), make_id("q1"), make_id("q2")]);
        assert_eq!(table.pairs().len(), 3);
        assert_eq!(table.pairs().collect::<Vec<_>>(), vec![(&pair("q0", "q1"), false), (&pair("q0", "q2"), true), (&pair("q1", "q2"), true)]);
        assert_eq!(table.pairs().filter(|(_, m)| *m).count(), table.marked_pairs().count());
    }
}
