//  LIB.rs
//    by Lut99
//
//  Created:
//    13 Mar 2025, 16:43:01
//  Last edited:
//    25 Mar 2025, 17:14:20
//  Auto updated?
//    Yes
//
//  Description:
//!   Minimizes deterministic finite automata using the Myhill-Nerode table-filling algorithm,
//!   with support for stepping through the algorithm one pass at a time.
//!
//!   The typical flow is:
//!   1. Build an [`Automaton`](automaton::Automaton) (or parse one from JSON, using the `serde`
//!      feature);
//!   2. [Initialize](table::Table::initialize()) a [`Table`](table::Table) and
//!      [refine](table::Table::refine()) it until it no longer changes, or simply compute the
//!      [fixed point](table::Table::fixpoint()) directly;
//!   3. [Extract](classes::extract_classes()) the equivalence classes; and
//!   4. [Build](minimize::build()) the minimized automaton.
//!
//!   The [`History`](history::History) wraps all of this for interactive use.
//

// Declare modules
pub mod automaton;
pub mod classes;
#[cfg(feature = "serde")]
pub mod exchange;
pub mod history;
mod log;
pub mod merge;
pub mod minimize;
pub mod table;

// Bring the macro into this namespace
#[cfg(feature = "macros")]
pub use myhill_macros::dfa;
