//  CLASSES.rs
//    by Lut99
//
//  Created:
//    17 Mar 2025, 09:40:12
//  Last edited:
//    24 Mar 2025, 16:05:44
//  Auto updated?
//    Yes
//
//  Description:
//!   Extracts the equivalence classes of states from a converged [`Table`].
//

use std::fmt::{Display, Formatter, Result as FResult};

use itertools::Itertools as _;

use crate::automaton::{Automaton, StateId, Target};
use crate::log::debug;
use crate::table::Table;


/***** LIBRARY FUNCTIONS *****/
/// Partitions the states of an automaton into classes of mutually indistinguishable states.
///
/// States are swept in the order of the automaton. Every state that isn't in a class yet opens a
/// new one, which then absorbs all later unassigned states that are unmarked against it.
///
/// This only yields actual equivalence classes if the `table` reached a fixed point, because only
/// then is "unmarked" transitive. On a partial table, it yields _some_ partition.
///
/// # Arguments
/// - `table`: The distinguishability [`Table`] built for `automaton`.
/// - `automaton`: The [`Automaton`] whose states to partition.
///
/// # Returns
/// A [`Partition`] that covers every state exactly once, with classes and their members ordered
/// by the order of the states in `automaton`.
pub fn extract_classes(table: &Table, automaton: &Automaton) -> Partition {
    let ids: Vec<&StateId> = automaton.states.keys().collect();
    let targets: Vec<Target> = ids.iter().map(|id| Target::State((*id).clone())).collect();
    let mut assigned: Vec<bool> = vec![false; ids.len()];
    let mut classes: Vec<Vec<StateId>> = Vec::new();
    for i in 0..ids.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut class: Vec<StateId> = vec![ids[i].clone()];
        for j in (i + 1)..ids.len() {
            if !assigned[j] && !table.is_marked(&targets[i], &targets[j]) {
                assigned[j] = true;
                class.push(ids[j].clone());
            }
        }
        classes.push(class);
    }
    debug!("Extracted {} equivalence class(es) out of {} state(s)", classes.len(), ids.len());
    Partition { classes }
}





/***** LIBRARY *****/
/// A partition of the states of an automaton into equivalence classes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Partition {
    /// The classes, in order of extraction.
    classes: Vec<Vec<StateId>>,
}
impl Partition {
    /// Returns the index of the class that contains the given state.
    ///
    /// # Arguments
    /// - `id`: The identifier of the state to look for.
    ///
    /// # Returns
    /// The index of the class, or [`None`] if no class contains `id`.
    #[inline]
    pub fn class_of(&self, id: &str) -> Option<usize> { self.classes.iter().position(|c| c.iter().any(|m| m.as_str() == id)) }

    /// Returns the class at the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[StateId]> { self.classes.get(index).map(Vec::as_slice) }

    /// Returns an iterator over the classes.
    #[inline]
    pub fn iter(&self) -> impl '_ + ExactSizeIterator<Item = &[StateId]> { self.classes.iter().map(Vec::as_slice) }

    /// Returns the number of classes.
    #[inline]
    pub fn len(&self) -> usize { self.classes.len() }

    /// Whether there are no classes (i.e., the automaton had no states).
    #[inline]
    pub fn is_empty(&self) -> bool { self.classes.is_empty() }
}
impl Display for Partition {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "{{")?;
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{{}}}", class.iter().join(", "))?;
        }
        write!(f, "}}")
    }
}
impl From<Vec<Vec<StateId>>> for Partition {
    #[inline]
    fn from(value: Vec<Vec<StateId>>) -> Self { Self { classes: value } }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{chain, make_dfa, make_id, redundant, scenario_a, scenario_b, scenario_c};
    use crate::automaton::Role;


    /// Shorthand for writing down classes.
    fn classes(classes: &[&[&'static str]]) -> Partition {
        Partition::from(classes.iter().map(|c| c.iter().copied().map(make_id).collect()).collect::<Vec<Vec<StateId>>>())
    }


    #[test]
    fn test_extract_scenarios() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = scenario_a();
        assert_eq!(extract_classes(&Table::fixpoint(&dfa), &dfa), classes(&[&["q0"], &["q1"]]));
        let dfa = scenario_b();
        assert_eq!(extract_classes(&Table::fixpoint(&dfa), &dfa), classes(&[&["q0", "q1"], &["q2"]]));
        let dfa = scenario_c();
        assert_eq!(extract_classes(&Table::fixpoint(&dfa), &dfa), classes(&[&["p"], &["q", "r"]]));
        let dfa = redundant();
        assert_eq!(extract_classes(&Table::fixpoint(&dfa), &dfa), classes(&[&["A", "B", "E"], &["C", "D"]]));
        let dfa = chain();
        assert_eq!(extract_classes(&Table::fixpoint(&dfa), &dfa), classes(&[&["p0"], &["p1"], &["p2"], &["f"]]));
    }

    #[test]
    fn test_partition_valid() {
        for dfa in [scenario_a(), scenario_b(), scenario_c(), chain(), redundant()] {
            let partition = extract_classes(&Table::fixpoint(&dfa), &dfa);
            let mut seen: Vec<&StateId> = partition.iter().flatten().collect();
            assert_eq!(seen.len(), dfa.len());
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), dfa.len());
            for id in dfa.states.keys() {
                assert!(partition.class_of(id.as_str()).is_some());
            }
        }
    }

    #[test]
    fn test_start_state_not_privileged() {
        // The start state is equivalent to another state, and so shares its class
        let dfa = scenario_b();
        let partition = extract_classes(&Table::fixpoint(&dfa), &dfa);
        assert_eq!(partition.class_of("q0"), partition.class_of("q1"));
        assert_eq!(partition.class_of("q7"), None);
    }

    #[test]
    fn test_extract_empty_and_singleton() {
        let dfa = make_dfa(["a"], []);
        assert!(extract_classes(&Table::fixpoint(&dfa), &dfa).is_empty());
        let dfa = make_dfa(["a"], [("q0", Role::Start, vec![])]);
        assert_eq!(extract_classes(&Table::fixpoint(&dfa), &dfa), classes(&[&["q0"]]));
    }

    #[test]
    fn test_display() {
        assert_eq!(classes(&[&["q0", "q1"], &["q2"]]).to_string(), "{{q0, q1}, {q2}}");
    }
}
