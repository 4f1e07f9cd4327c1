//  MINIMIZE.rs
//    by Lut99
//
//  Created:
//    17 Mar 2025, 13:26:50
//  Last edited:
//    24 Mar 2025, 16:12:31
//  Auto updated?
//    Yes
//
//  Description:
//!   Builds the minimized [`Automaton`] out of the equivalence classes of an original one.
//

use crate::automaton::{Automaton, Position, Role, State, StateId, Target};
use crate::classes::{Partition, extract_classes};
use crate::log::{debug, warn};
use crate::table::Table;


/***** LIBRARY FUNCTIONS *****/
/// Returns the identifier given to the state built for the `index`th class.
///
/// # Arguments
/// - `index`: The index of the class in its [`Partition`].
///
/// # Returns
/// A [`StateId`] of the shape `q<index>`.
#[inline]
pub fn class_id(index: usize) -> StateId { StateId(format!("q{index}")) }



/// Builds a new automaton with one state per equivalence class.
///
/// The `index`th class becomes the state [`q<index>`](class_id()). Its role is the union of the
/// roles of _all_ members of the class, and it is drawn at the centroid of its members. Its
/// transitions are those of the first member of the class, redirected to the class containing the
/// original destination.
///
/// # Arguments
/// - `partition`: The [`Partition`] of the states of `automaton`.
/// - `automaton`: The original [`Automaton`].
///
/// # Returns
/// A new [`Automaton`] over the same alphabet.
///
/// Destinations that aren't in any class become [`Target::None`].
pub fn build(partition: &Partition, automaton: &Automaton) -> Automaton {
    let mut result = Automaton::new(automaton.alphabet.iter().cloned());
    for (i, class) in partition.iter().enumerate() {
        let members: Vec<&State> = class.iter().filter_map(|id| automaton.state(id.as_str())).collect();

        let mut state = State::new(Role::union(members.iter().map(|s| s.role)));
        state.position = Position::centroid(members.iter().filter_map(|s| s.position));
        if let Some(repr) = members.first() {
            for (symbol, target) in &repr.transitions {
                let target: Target = match target.as_state() {
                    Some(id) => match partition.class_of(id.as_str()) {
                        Some(j) => Target::State(class_id(j)),
                        None => {
                            warn!("State '{}' transitions on '{symbol}' to '{id}', which is not in any class; dropping transition", class[0]);
                            Target::None
                        },
                    },
                    None => Target::None,
                };
                state.transitions.insert(symbol.clone(), target);
            }
        }
        result.add_state(class_id(i), state);
    }
    debug!("Built minimized automaton with {} state(s) (originally {})", result.len(), automaton.len());
    result
}

/// Runs the whole minimization in one go.
///
/// This is a shorthand for [building](build()) from the [classes](extract_classes()) of the
/// [fixed point](Table::fixpoint()).
///
/// # Arguments
/// - `automaton`: The [`Automaton`] to minimize.
///
/// # Returns
/// The minimized [`Automaton`].
#[inline]
pub fn minimize(automaton: &Automaton) -> Automaton { build(&extract_classes(&Table::fixpoint(automaton), automaton), automaton) }





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{chain, make_dfa, make_target, redundant, scenario_a, scenario_b, scenario_c};


    #[test]
    fn test_build_scenario_a() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        // Already minimal, and happens to use the same names
        let dfa = scenario_a();
        assert_eq!(minimize(&dfa), dfa);
    }

    #[test]
    fn test_build_scenario_b() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let min = minimize(&scenario_b());
        assert_eq!(
            min,
            make_dfa(["a", "b"], [("q0", Role::Start, vec![("a", "q1"), ("b", "q0")]), ("q1", Role::Final, vec![("a", "q1"), ("b", "q1")])])
        );
    }

    #[test]
    fn test_build_keeps_none() {
        let min = minimize(&scenario_c());
        assert_eq!(min.len(), 2);
        assert_eq!(min.target("q0", "a"), &Target::None);
        assert_eq!(min.target("q1", "a"), &make_target("q1"));
    }

    #[test]
    fn test_role_is_union_of_class() {
        // The first member of the class is plain, but another is the start state
        let dfa = make_dfa(["a"], [("x", Role::Plain, vec![("a", "x")]), ("y", Role::Start, vec![("a", "x")])]);
        let min = minimize(&dfa);
        assert_eq!(min.len(), 1);
        assert_eq!(min.state("q0").map(|s| s.role), Some(Role::Start));
    }

    #[test]
    fn test_role_preservation() {
        for dfa in [scenario_a(), scenario_b(), scenario_c(), chain(), redundant()] {
            let partition = extract_classes(&Table::fixpoint(&dfa), &dfa);
            let min = build(&partition, &dfa);
            for (i, class) in partition.iter().enumerate() {
                let role: Role = min.state(class_id(i).as_str()).map(|s| s.role).unwrap_or(Role::Plain);
                let any_start: bool = class.iter().any(|id| dfa.state(id.as_str()).is_some_and(|s| s.role.is_start()));
                let any_final: bool = class.iter().any(|id| dfa.state(id.as_str()).is_some_and(|s| s.role.is_final()));
                assert_eq!(role.is_start(), any_start);
                assert_eq!(role.is_final(), any_final);
            }
        }
    }

    #[test]
    fn test_build_redundant() {
        let min = minimize(&redundant());
        assert_eq!(
            min,
            make_dfa(["0", "1"], [("q0", Role::Start, vec![("0", "q0"), ("1", "q1")]), ("q1", Role::Final, vec![("0", "q0"), ("1", "q1")])])
        );
    }

    #[test]
    fn test_build_dangling_becomes_none() {
        let dfa = make_dfa(["a", "b"], [("q0", Role::Start, vec![("a", "ghost"), ("b", "q0")])]);
        let partition = extract_classes(&Table::fixpoint(&dfa), &dfa);
        let min = build(&partition, &dfa);
        assert_eq!(min.target("q0", "a"), &Target::None);
        assert_eq!(min.target("q0", "b"), &make_target("q0"));
    }

    #[test]
    fn test_build_centroid() {
        let mut dfa = scenario_b();
        for (i, state) in dfa.states.values_mut().enumerate() {
            state.position = Some(Position { x: 100.0 * i as f64, y: 50.0 });
        }
        let min = minimize(&dfa);
        assert_eq!(min.state("q0").and_then(|s| s.position), Some(Position { x: 50.0, y: 50.0 }));
        assert_eq!(min.state("q1").and_then(|s| s.position), Some(Position { x: 200.0, y: 50.0 }));
    }

    #[test]
    fn test_build_empty() {
        let dfa = make_dfa(["a"], []);
        assert!(minimize(&dfa).is_empty());
    }
}
