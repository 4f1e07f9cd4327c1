//  MOD.rs
//    by Lut99
//
//  Created:
//    18 Mar 2025, 10:02:48
//  Last edited:
//    25 Mar 2025, 15:36:20
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the incremental merge engine, which folds states that are (still) unmarked against
//!   each other into _composite_ states.
//!
//!   Unlike the [minimized automaton](crate::minimize), this view can be computed from any table,
//!   not just a converged one. That makes it suitable to show how the automaton collapses as the
//!   table-filling algorithm progresses. The price is that, on a partial table, the members of a
//!   composite state may disagree on where to go. Such transitions are kept as
//!   [ambiguous](MergedTransition::Ambiguous) instead of picking one.
//

// Nested modules
pub mod union_find;

// Imports
use std::fmt::{Display, Formatter, Result as FResult};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools as _;
pub use union_find::DisjointSet;

use crate::automaton::{Automaton, Position, Role, State, StateId, Symbol, Target};
use crate::log::{debug, trace, warn};
use crate::table::Pair;


/***** LIBRARY FUNCTIONS *****/
/// Merges all states that occur together in the given pairs.
///
/// Pairs are merged transitively, so `(a, b)` and `(b, c)` result in one composite of `a`, `b`
/// and `c`. Composites are ordered by their first member in the order of `automaton`.
///
/// # Arguments
/// - `automaton`: The [`Automaton`] to merge states in.
/// - `unmarked`: The [`Pair`]s of states to merge. Typically the
///   [unmarked pairs](crate::table::Table::unmarked_pairs()) of a table. Pairs naming states
///   that don't exist are ignored.
///
/// # Returns
/// A [`MergedAutomaton`] with a composite state for every group of merged states.
pub fn merge<'p>(automaton: &Automaton, unmarked: impl IntoIterator<Item = &'p Pair>) -> MergedAutomaton {
    // Union the pairs
    let mut set = DisjointSet::new(automaton.len());
    for pair in unmarked {
        match (automaton.index_of(pair.first().as_str()), automaton.index_of(pair.second().as_str())) {
            (Some(a), Some(b)) => {
                if set.union(a, b) {
                    trace!("--> Merged {pair}");
                }
            },
            _ => {
                warn!("Cannot merge pair {pair}, as it names a state that is not in the automaton");
            },
        }
    }

    // Collect the groups, ordered by their first member
    let mut roots: IndexMap<usize, usize> = IndexMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut composite_of: Vec<CompositeId> = Vec::with_capacity(automaton.len());
    for i in 0..automaton.len() {
        let root: usize = set.find(i);
        let group: usize = *roots.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(i);
        composite_of.push(CompositeId(group));
    }

    // Build the composite states
    let mut states: Vec<CompositeState> = Vec::with_capacity(groups.len());
    for (c, group) in groups.iter().enumerate() {
        let members: Vec<(&StateId, &State)> = group.iter().filter_map(|i| automaton.states.get_index(*i)).collect();
        let label: String = format!("{{{}}}", members.iter().map(|(id, _)| *id).sorted().join(","));

        let mut transitions: IndexMap<Symbol, MergedTransition> = IndexMap::with_capacity(automaton.alphabet.len());
        for symbol in &automaton.alphabet {
            let mut dests: Vec<MergedTarget> = Vec::with_capacity(1);
            for (id, state) in &members {
                let dest: MergedTarget = match state.target(symbol.as_str()) {
                    Target::State(target) => match automaton.index_of(target.as_str()) {
                        Some(j) => MergedTarget::Composite(composite_of[j]),
                        None => {
                            warn!("State '{id}' transitions on '{symbol}' to unknown state '{target}'; treating it as no transition");
                            MergedTarget::None
                        },
                    },
                    Target::None => MergedTarget::None,
                };
                if !dests.contains(&dest) {
                    dests.push(dest);
                }
            }
            let transition: MergedTransition = if dests.len() > 1 {
                dests.sort();
                warn!("Composite state {label} has ambiguous transitions on '{symbol}' (members disagree)");
                MergedTransition::Ambiguous(dests)
            } else {
                MergedTransition::Deterministic(dests.pop().unwrap_or(MergedTarget::None))
            };
            transitions.insert(symbol.clone(), transition);
        }

        states.push(CompositeState {
            id: CompositeId(c),
            members: members.iter().map(|(id, _)| (*id).clone()).collect(),
            label,
            role: Role::union(members.iter().map(|(_, s)| s.role)),
            position: Position::centroid(members.iter().filter_map(|(_, s)| s.position)),
            transitions,
        });
    }
    debug!("Merged {} state(s) into {} composite state(s)", automaton.len(), states.len());

    MergedAutomaton { alphabet: automaton.alphabet.clone(), states }
}





/***** LIBRARY *****/
/// Identifies a [`CompositeState`] within its [`MergedAutomaton`].
///
/// This is simply its index. Use [`MergedAutomaton::label()`] for something presentable.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CompositeId(pub usize);

/// Where a transition of a [`CompositeState`] leads.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MergedTarget {
    /// To another (or the same) composite state.
    Composite(CompositeId),
    /// Nowhere.
    None,
}

/// The transition of a [`CompositeState`] on some symbol.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MergedTransition {
    /// All members agree on where to go.
    Deterministic(MergedTarget),
    /// The members disagree on where to go. Contains every destination, in sorted order.
    ///
    /// This happens when merging states that aren't actually equivalent, e.g., when merging
    /// according to a table that hasn't reached its fixed point yet.
    Ambiguous(Vec<MergedTarget>),
}
impl MergedTransition {
    /// Whether this transition is ambiguous.
    #[inline]
    pub const fn is_ambiguous(&self) -> bool { matches!(self, Self::Ambiguous(_)) }
}

/// A state that represents a group of merged states.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeState {
    /// The identifier of this state.
    pub id:          CompositeId,
    /// The original states merged into this one, in the order of the original automaton.
    pub members:     Vec<StateId>,
    /// The presentable name of this state, i.e., its sorted members like `{q0,q1}`.
    pub label:       String,
    /// The union of the roles of the members.
    pub role:        Role,
    /// The centroid of the positions of the members, if any of them had one.
    pub position:    Option<Position>,
    /// The transitions out of this state, one for every symbol in the alphabet.
    pub transitions: IndexMap<Symbol, MergedTransition>,
}

/// The result of [merging](merge()) an automaton.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedAutomaton {
    /// The alphabet of the original automaton.
    pub alphabet: IndexSet<Symbol>,
    /// The composite states, where every state is at the index of its [`CompositeId`].
    pub states:   Vec<CompositeState>,
}

// Queries
impl MergedAutomaton {
    /// Returns the composite state with the given identifier.
    #[inline]
    pub fn get(&self, id: CompositeId) -> Option<&CompositeState> { self.states.get(id.0) }

    /// Returns the composite state an original state got merged into.
    ///
    /// # Arguments
    /// - `id`: The identifier of the state in the original automaton.
    ///
    /// # Returns
    /// The [`CompositeId`] of the composite state, or [`None`] if no such state was merged.
    #[inline]
    pub fn composite_of(&self, id: &str) -> Option<CompositeId> {
        self.states.iter().find(|s| s.members.iter().any(|m| m.as_str() == id)).map(|s| s.id)
    }

    /// Returns the label of the composite state with the given identifier.
    #[inline]
    pub fn label(&self, id: CompositeId) -> Option<&str> { self.states.get(id.0).map(|s| s.label.as_str()) }

    /// Returns all ambiguous transitions.
    ///
    /// # Returns
    /// An [`Iterator`] over the composite state, the symbol and the possible destinations of every
    /// ambiguous transition.
    pub fn ambiguities(&self) -> impl '_ + Iterator<Item = (CompositeId, &Symbol, &[MergedTarget])> {
        self.states.iter().flat_map(|s| {
            s.transitions.iter().filter_map(move |(symbol, t)| match t {
                MergedTransition::Ambiguous(dests) => Some((s.id, symbol, dests.as_slice())),
                MergedTransition::Deterministic(_) => None,
            })
        })
    }

    /// Whether none of the transitions is ambiguous.
    #[inline]
    pub fn is_deterministic(&self) -> bool { self.states.iter().all(|s| s.transitions.values().all(|t| !t.is_ambiguous())) }

    /// Returns the number of composite states.
    #[inline]
    pub fn len(&self) -> usize { self.states.len() }

    /// Whether there are no composite states.
    #[inline]
    pub fn is_empty(&self) -> bool { self.states.is_empty() }
}

// Conversion
impl MergedAutomaton {
    /// Renders a [`MergedTarget`] as a plain [`Target`], using labels as identifiers.
    #[inline]
    fn flatten(&self, target: &MergedTarget) -> Target {
        match target {
            MergedTarget::Composite(c) => self.label(*c).map(Target::state).unwrap_or(Target::None),
            MergedTarget::None => Target::None,
        }
    }

    /// Flattens this merged view into a plain [`Automaton`] for drawing.
    ///
    /// Composite states are named after their [label](CompositeState::label). Ambiguous
    /// transitions become a transition to a single state named after all destinations (e.g.,
    /// `{{q0,q1},{q2}}`), which does not exist in the result.
    ///
    /// # Returns
    /// A new [`Automaton`].
    pub fn to_automaton(&self) -> Automaton {
        let mut result = Automaton::new(self.alphabet.iter().cloned());
        for composite in &self.states {
            let mut state = State::new(composite.role);
            state.position = composite.position;
            for (symbol, transition) in &composite.transitions {
                let target: Target = match transition {
                    MergedTransition::Deterministic(dest) => self.flatten(dest),
                    MergedTransition::Ambiguous(dests) => Target::State(StateId(format!("{{{}}}", dests.iter().map(|d| self.flatten(d)).join(",")))),
                };
                state.transitions.insert(symbol.clone(), target);
            }
            result.add_state(composite.label.as_str(), state);
        }
        result
    }
}

// Formatting
impl Display for MergedAutomaton {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        writeln!(f, "Merged automaton {{")?;
        if self.states.is_empty() {
            writeln!(f, "    <no states>")?;
        }
        for state in &self.states {
            write!(f, "    {} ({}):", state.label, state.role)?;
            for (symbol, transition) in &state.transitions {
                match transition {
                    MergedTransition::Deterministic(dest) => write!(f, " {symbol}->{}", self.flatten(dest))?,
                    MergedTransition::Ambiguous(dests) => write!(f, " {symbol}->?[{}]", dests.iter().map(|d| self.flatten(d)).join(" | "))?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "}}")
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::extract_classes;
    use crate::minimize::build;
    use crate::table::Table;
    use crate::tests::{chain, make_dfa, make_target, redundant, scenario_a, scenario_b, scenario_c};


    #[test]
    fn test_merge_nothing() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = scenario_b();
        let merged = merge(&dfa, []);
        assert_eq!(merged.len(), 3);
        assert!(merged.is_deterministic());
        assert_eq!(merged.states.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(), vec!["{q0}", "{q1}", "{q2}"]);
        assert_eq!(merged.get(CompositeId(0)).map(|s| s.transitions["a"].clone()), Some(MergedTransition::Deterministic(MergedTarget::Composite(CompositeId(2)))));
    }

    #[test]
    fn test_merge_fixpoint_scenario_b() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let dfa = scenario_b();
        let table = Table::fixpoint(&dfa);
        let merged = merge(&dfa, table.unmarked_pairs());
        assert_eq!(merged.len(), 2);
        assert!(merged.is_deterministic());
        assert_eq!(merged.composite_of("q0"), Some(CompositeId(0)));
        assert_eq!(merged.composite_of("q1"), Some(CompositeId(0)));
        assert_eq!(merged.composite_of("q2"), Some(CompositeId(1)));
        assert_eq!(merged.label(CompositeId(0)), Some("{q0,q1}"));
        assert_eq!(merged.states[0].role, Role::Start);
        assert_eq!(merged.states[1].role, Role::Final);

        assert_eq!(
            merged.to_automaton(),
            make_dfa(["a", "b"], [
                ("{q0,q1}", Role::Start, vec![("a", "{q2}"), ("b", "{q0,q1}")]),
                ("{q2}", Role::Final, vec![("a", "{q2}"), ("b", "{q2}")]),
            ])
        );
    }

    #[test]
    fn test_merge_partial_is_ambiguous() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        // Before any refinement, all non-accepting states of the chain are still together
        let dfa = chain();
        let table = Table::initialize(&dfa);
        let merged = merge(&dfa, table.unmarked_pairs());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.label(CompositeId(0)), Some("{p0,p1,p2}"));
        assert!(!merged.is_deterministic());

        assert!(merged.states[0].transitions["a"].is_ambiguous());
        assert!(!merged.states[1].transitions["a"].is_ambiguous());

        let ambiguities: Vec<(CompositeId, &Symbol, &[MergedTarget])> = merged.ambiguities().collect();
        assert_eq!(ambiguities.len(), 1);
        assert_eq!(ambiguities[0].0, CompositeId(0));
        assert_eq!(ambiguities[0].1.as_str(), "a");
        assert_eq!(ambiguities[0].2, &[MergedTarget::Composite(CompositeId(0)), MergedTarget::Composite(CompositeId(1))]);

        assert_eq!(merged.to_automaton().target("{p0,p1,p2}", "a"), &make_target("{{p0,p1,p2},{f}}"));
    }

    #[test]
    fn test_merge_none_disagreement() {
        // `p` has no transition, `q` does; merging them anyway is ambiguous
        let dfa = scenario_c();
        let merged = merge(&dfa, [&Pair::from_distinct("p".into(), "q".into())]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.states[0].transitions["a"], MergedTransition::Ambiguous(vec![MergedTarget::Composite(CompositeId(1)), MergedTarget::None]));
        assert_eq!(merged.to_automaton().target("{p,q}", "a"), &make_target("{{r},none}"));
    }

    #[test]
    fn test_merge_role_and_position() {
        let mut dfa = scenario_a();
        for (i, state) in dfa.states.values_mut().enumerate() {
            state.position = Some(Position { x: 10.0 + 20.0 * i as f64, y: 40.0 });
        }
        let pair = Pair::from_distinct("q0".into(), "q1".into());
        let merged = merge(&dfa, [&pair]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.states[0].role, Role::StartFinal);
        assert_eq!(merged.states[0].position, Some(Position { x: 20.0, y: 40.0 }));
        assert!(merged.is_deterministic());
    }

    #[test]
    fn test_merge_ignores_unknown_states() {
        let dfa = scenario_a();
        let pair = Pair::from_distinct("q0".into(), "ghost".into());
        let merged = merge(&dfa, [&pair]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_dangling_target() {
        let dfa = make_dfa(["a"], [("q0", Role::Start, vec![("a", "ghost")])]);
        let merged = merge(&dfa, []);
        assert_eq!(merged.states[0].transitions["a"], MergedTransition::Deterministic(MergedTarget::None));
    }

    #[test]
    fn test_merge_agrees_with_build() {
        for dfa in [scenario_a(), scenario_b(), scenario_c(), chain(), redundant()] {
            let table = Table::fixpoint(&dfa);
            let merged = merge(&dfa, table.unmarked_pairs());
            let built = build(&extract_classes(&table, &dfa), &dfa);
            assert_eq!(merged.len(), built.len());
            assert!(merged.is_deterministic());
        }
    }
}
