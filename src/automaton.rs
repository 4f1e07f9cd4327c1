//  AUTOMATON.rs
//    by Lut99
//
//  Created:
//    14 Mar 2025, 10:11:52
//  Last edited:
//    24 Mar 2025, 11:30:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`Automaton`] as plain data: its alphabet, its states and their transitions.
//!
//!   Note that nothing in here checks if the automaton is a _well-formed_ DFA. Missing transitions
//!   are simply read as [`Target::None`], and dangling targets are carried around but never
//!   followed.
//

use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result as FResult};

use enum_debug::EnumDebug;
use indexmap::{IndexMap, IndexSet};


/***** CONSTANTS *****/
/// The target returned for transitions that aren't there.
static ABSENT: Target = Target::None;





/***** HELPER MACROS *****/
/// Implements the boilerplate of a string newtype.
macro_rules! string_newtype {
    ($name:ident) => {
        impl $name {
            /// Returns the inner string.
            ///
            /// # Returns
            /// A [`str`] with the raw value.
            #[inline]
            pub fn as_str(&self) -> &str { &self.0 }
        }
        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str { &self.0 }
        }
        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> FResult { f.write_str(&self.0) }
        }
        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self { Self(value.into()) }
        }
        impl From<&String> for $name {
            #[inline]
            fn from(value: &String) -> Self { Self(value.clone()) }
        }
        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self { Self(value) }
        }
        impl From<&$name> for $name {
            #[inline]
            fn from(value: &$name) -> Self { value.clone() }
        }
    };
}





/***** LIBRARY *****/
/// An opaque token of the alphabet.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Symbol(pub String);
string_newtype!(Symbol);

/// Identifies a state within one [`Automaton`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateId(pub String);
string_newtype!(StateId);



/// The role a state plays in the automaton.
#[derive(Clone, Copy, Debug, EnumDebug, Eq, Hash, PartialEq)]
pub enum Role {
    /// The state in which the automaton starts.
    Start,
    /// An accepting state.
    Final,
    /// The start state, which is also accepting.
    StartFinal,
    /// Neither starting nor accepting.
    Plain,
}
impl Role {
    /// Builds the role that has the given properties.
    ///
    /// # Arguments
    /// - `is_start`: Whether the role should be a starting one.
    /// - `is_final`: Whether the role should be an accepting one.
    ///
    /// # Returns
    /// The matching Role.
    #[inline]
    pub const fn from_flags(is_start: bool, is_final: bool) -> Self {
        match (is_start, is_final) {
            (true, true) => Self::StartFinal,
            (true, false) => Self::Start,
            (false, true) => Self::Final,
            (false, false) => Self::Plain,
        }
    }

    /// Collapses the roles of a group of states into a single one.
    ///
    /// The result is starting if _any_ of the roles is, and accepting if _any_ of the roles is.
    ///
    /// # Arguments
    /// - `roles`: The roles of the group. May be empty, in which case [`Role::Plain`] is returned.
    ///
    /// # Returns
    /// The union of the given roles.
    #[inline]
    pub fn union(roles: impl IntoIterator<Item = Self>) -> Self {
        let (mut is_start, mut is_final): (bool, bool) = (false, false);
        for role in roles {
            is_start |= role.is_start();
            is_final |= role.is_final();
        }
        Self::from_flags(is_start, is_final)
    }

    /// Whether this role marks a start state.
    #[inline]
    pub const fn is_start(&self) -> bool { matches!(self, Self::Start | Self::StartFinal) }

    /// Whether this role marks an accepting state.
    #[inline]
    pub const fn is_final(&self) -> bool { matches!(self, Self::Final | Self::StartFinal) }
}
impl Display for Role {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Start => write!(f, "start"),
            Self::Final => write!(f, "final"),
            Self::StartFinal => write!(f, "start+final"),
            Self::Plain => write!(f, "plain"),
        }
    }
}



/// Where a transition leads.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Target {
    /// It leads to the state with the given identifier.
    State(StateId),
    /// There is no transition.
    None,
}
impl Target {
    /// Convenience constructor for a [`Target::State`].
    ///
    /// # Arguments
    /// - `id`: Something that becomes the [`StateId`] of the targeted state.
    ///
    /// # Returns
    /// A new Target pointing to `id`.
    #[inline]
    pub fn state(id: impl Into<StateId>) -> Self { Self::State(id.into()) }

    /// Returns the targeted state, if any.
    #[inline]
    pub const fn as_state(&self) -> Option<&StateId> {
        match self {
            Self::State(id) => Some(id),
            Self::None => None,
        }
    }

    /// Whether this is the absent transition.
    #[inline]
    pub const fn is_none(&self) -> bool { matches!(self, Self::None) }
}
impl Display for Target {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::State(id) => id.fmt(f),
            Self::None => write!(f, "none"),
        }
    }
}
impl From<StateId> for Target {
    #[inline]
    fn from(value: StateId) -> Self { Self::State(value) }
}
impl From<Option<StateId>> for Target {
    #[inline]
    fn from(value: Option<StateId>) -> Self { value.map(Self::State).unwrap_or(Self::None) }
}



/// Display coordinates of a state.
///
/// The engine never looks at these, except to place merged states at the centroid of their
/// members.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}
impl Position {
    /// Computes the mean of the given positions.
    ///
    /// # Arguments
    /// - `positions`: The positions to average.
    ///
    /// # Returns
    /// The centroid, or [`None`] if no positions were given.
    pub fn centroid(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
        let (mut x, mut y, mut n): (f64, f64, usize) = (0.0, 0.0, 0);
        for pos in positions {
            x += pos.x;
            y += pos.y;
            n += 1;
        }
        if n > 0 { Some(Self { x: x / n as f64, y: y / n as f64 }) } else { None }
    }
}



/// A single state of an [`Automaton`].
///
/// Its identifier lives in the automaton, as key of the state.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// Whether this state starts and/or accepts.
    pub role: Role,
    /// The transitions out of this state, in the order they were defined.
    pub transitions: IndexMap<Symbol, Target>,
    /// Where the state is drawn, if anywhere.
    pub position: Option<Position>,
}
impl State {
    /// Constructor for a State without transitions.
    ///
    /// # Arguments
    /// - `role`: The [`Role`] of the new state.
    ///
    /// # Returns
    /// A new State.
    #[inline]
    pub fn new(role: Role) -> Self { Self { role, transitions: IndexMap::new(), position: None } }

    /// Adds a transition to this state.
    ///
    /// # Arguments
    /// - `symbol`: The [`Symbol`] on which to transition.
    /// - `target`: The [`Target`] to transition to. Replaces any previous one for `symbol`.
    ///
    /// # Returns
    /// Self for chaining.
    #[inline]
    pub fn with_transition(mut self, symbol: impl Into<Symbol>, target: impl Into<Target>) -> Self {
        self.transitions.insert(symbol.into(), target.into());
        self
    }

    /// Gives this state display coordinates.
    ///
    /// # Returns
    /// Self for chaining.
    #[inline]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    /// Returns where this state transitions to on the given symbol.
    ///
    /// # Arguments
    /// - `symbol`: The symbol to transition on.
    ///
    /// # Returns
    /// The [`Target`], which is [`Target::None`] if the state has no transition for `symbol`.
    #[inline]
    pub fn target(&self, symbol: &str) -> &Target { self.transitions.get(symbol).unwrap_or(&ABSENT) }
}



/// A deterministic finite automaton as given by the editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Automaton {
    /// The alphabet, in order of definition.
    pub alphabet: IndexSet<Symbol>,
    /// The states, in order of definition.
    pub states:   IndexMap<StateId, State>,
}

// Constructors
impl Automaton {
    /// Constructor for an Automaton without any states.
    ///
    /// # Arguments
    /// - `alphabet`: The symbols in the alphabet. Duplicates are collapsed.
    ///
    /// # Returns
    /// A new Automaton.
    #[inline]
    pub fn new<S: Into<Symbol>>(alphabet: impl IntoIterator<Item = S>) -> Self {
        Self { alphabet: alphabet.into_iter().map(Into::into).collect(), states: IndexMap::new() }
    }

    /// Adds a state to the automaton.
    ///
    /// # Arguments
    /// - `id`: The identifier of the state.
    /// - `state`: The [`State`] itself.
    ///
    /// # Returns
    /// Self for chaining.
    #[inline]
    pub fn with_state(mut self, id: impl Into<StateId>, state: State) -> Self {
        self.add_state(id, state);
        self
    }

    /// Adds a state to the automaton.
    ///
    /// If a state with the same identifier already exists, it is replaced in-place (i.e., it keeps
    /// its position in the order).
    ///
    /// # Arguments
    /// - `id`: The identifier of the state.
    /// - `state`: The [`State`] itself.
    ///
    /// # Returns
    /// The replaced [`State`], if any.
    #[inline]
    pub fn add_state(&mut self, id: impl Into<StateId>, state: State) -> Option<State> { self.states.insert(id.into(), state) }
}

// Queries
impl Automaton {
    /// Returns the state with the given identifier.
    #[inline]
    pub fn state(&self, id: &str) -> Option<&State> { self.states.get(id) }

    /// Returns the position of the state with the given identifier in the order of states.
    #[inline]
    pub fn index_of(&self, id: &str) -> Option<usize> { self.states.get_index_of(id) }

    /// Returns where the given state transitions to on the given symbol.
    ///
    /// # Arguments
    /// - `id`: The identifier of the state to transition from.
    /// - `symbol`: The symbol to transition on.
    ///
    /// # Returns
    /// The [`Target`]. If the state doesn't exist or has no such transition, this is
    /// [`Target::None`].
    #[inline]
    pub fn target(&self, id: &str, symbol: &str) -> &Target { self.states.get(id).map(|s| s.target(symbol)).unwrap_or(&ABSENT) }

    /// Returns the identifier of the start state.
    ///
    /// # Returns
    /// The first state with a starting role, or [`None`] if there is none.
    #[inline]
    pub fn start(&self) -> Option<&StateId> { self.states.iter().find(|(_, s)| s.role.is_start()).map(|(id, _)| id) }

    /// Returns the number of states in the automaton.
    #[inline]
    pub fn len(&self) -> usize { self.states.len() }

    /// Whether the automaton has no states.
    #[inline]
    pub fn is_empty(&self) -> bool { self.states.is_empty() }
}

// Formatting
impl Display for Automaton {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        writeln!(f, "Automaton {{")?;
        write!(f, "    alphabet: {{")?;
        for (i, symbol) in self.alphabet.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{symbol}")?;
        }
        writeln!(f, "}}")?;
        if self.states.is_empty() {
            writeln!(f, "    <no states>")?;
        }
        for (id, state) in &self.states {
            let marker: &str = match state.role {
                Role::Start => "->  ",
                Role::Final => "   *",
                Role::StartFinal => "-> *",
                Role::Plain => "    ",
            };
            write!(f, "    {marker}{id}:")?;
            for symbol in &self.alphabet {
                write!(f, " {symbol}->{}", state.target(symbol.as_str()))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "}}")
    }
}





/***** TESTS *****/
