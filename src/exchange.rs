//  EXCHANGE.rs
//    by Lut99
//
//  Created:
//    20 Mar 2025, 10:31:26
//  Last edited:
//    25 Mar 2025, 17:10:52
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the record in which automata are exchanged with the outside world (e.g., saved by
//!   the editor), and conversions from and to [`Automaton`]s.
//!
//!   Both directions refuse automata that would not survive the trip, i.e., those with a state
//!   called `none` or with symbols that don't fit a comma-separated alphabet.
//!
//!   The record looks like:
//!   ```json
//!   {
//!       "alphabet": "a,b",
//!       "states": [
//!           { "id": "q0", "type": "start", "transitions": { "a": "q1", "b": "none" }, "x": 100, "y": 200 }
//!       ]
//!   }
//!   ```
//

use std::error;
use std::fmt::{Display, Formatter, Result as FResult};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, Position, Role, State, StateId, Symbol, Target};


/***** CONSTANTS *****/
/// The target written for absent transitions.
pub const NONE_TARGET: &str = "none";





/***** ERRORS *****/
/// Defines errors occurring when reading or writing [`AutomatonRecord`]s.
#[derive(Debug)]
pub enum Error {
    /// Failed to parse the given JSON as a record.
    Deserialize { err: serde_json::Error },
    /// Failed to write a record as JSON.
    Serialize { err: serde_json::Error },
    /// A state has a type we don't know.
    UnknownRole { state: String, tag: String },
    /// Two states have the same identifier.
    DuplicateState { id: String },
    /// More than one state is a start state.
    MultipleStarts { first: String, second: String },
    /// A state is named like an absent transition.
    ReservedStateId { id: String },
    /// A symbol cannot be written in the comma-separated alphabet.
    InvalidSymbol { symbol: String },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> FResult {
        match self {
            Self::Deserialize { .. } => write!(f, "Failed to parse automaton record"),
            Self::Serialize { .. } => write!(f, "Failed to serialize automaton record"),
            Self::UnknownRole { state, tag } => write!(
                f,
                "State '{state}' has unknown type '{tag}' (expected one of 'start', 'final', 'start+final' or 'transition')"
            ),
            Self::DuplicateState { id } => write!(f, "State '{id}' is defined more than once"),
            Self::MultipleStarts { first, second } => write!(f, "Both state '{first}' and state '{second}' are start states"),
            Self::ReservedStateId { id } => write!(f, "State identifier '{id}' is reserved for absent transitions"),
            Self::InvalidSymbol { symbol } => {
                write!(f, "Symbol '{symbol}' cannot be written to an alphabet (it is empty, contains a comma or has surrounding whitespace)")
            },
        }
    }
}
impl error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Deserialize { err } | Self::Serialize { err } => Some(err),
            Self::UnknownRole { .. }
            | Self::DuplicateState { .. }
            | Self::MultipleStarts { .. }
            | Self::ReservedStateId { .. }
            | Self::InvalidSymbol { .. } => None,
        }
    }
}





/***** HELPER FUNCTIONS *****/
/// Parses the type-tag of a state.
///
/// # Returns
/// The matching [`Role`], or [`None`] if the tag is unknown.
fn parse_role(tag: &str) -> Option<Role> {
    match tag {
        "start" => Some(Role::Start),
        "final" => Some(Role::Final),
        "start+final" => Some(Role::StartFinal),
        "transition" | "plain" => Some(Role::Plain),
        _ => None,
    }
}

/// Serializes a role as the type-tag of a state.
fn role_tag(role: Role) -> &'static str {
    match role {
        Role::Start => "start",
        Role::Final => "final",
        Role::StartFinal => "start+final",
        Role::Plain => "transition",
    }
}





/***** LIBRARY *****/
/// The exchanged form of an [`Automaton`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AutomatonRecord {
    /// The symbols of the alphabet, separated by commas.
    pub alphabet: String,
    /// The states of the automaton.
    pub states:   Vec<StateRecord>,
}

/// The exchanged form of a [`State`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StateRecord {
    /// The identifier of the state.
    pub id: String,
    /// The role of the state: `start`, `final`, `start+final` or `transition`.
    #[serde(rename = "type")]
    pub role: String,
    /// Maps symbols to the identifier of the target state, or to `none`.
    #[serde(default)]
    pub transitions: IndexMap<String, String>,
    /// The horizontal display coordinate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// The vertical display coordinate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

// JSON
impl AutomatonRecord {
    /// Parses a record from JSON.
    ///
    /// # Arguments
    /// - `raw`: The JSON to parse.
    ///
    /// # Returns
    /// A new AutomatonRecord.
    ///
    /// # Errors
    /// This function errors if the JSON is not valid or doesn't describe a record.
    #[inline]
    pub fn from_json(raw: &str) -> Result<Self, Error> { serde_json::from_str(raw).map_err(|err| Error::Deserialize { err }) }

    /// Writes this record as (pretty) JSON.
    ///
    /// # Errors
    /// This function errors if serialization fails.
    #[inline]
    pub fn to_json(&self) -> Result<String, Error> { serde_json::to_string_pretty(self).map_err(|err| Error::Serialize { err }) }
}

// Conversion
impl TryFrom<AutomatonRecord> for Automaton {
    type Error = Error;

    /// Converts a record into an automaton.
    ///
    /// Symbols in the alphabet are trimmed, and empty ones are skipped. Transitions to `none`
    /// become [`Target::None`]; any other target is taken as a state identifier, regardless of
    /// whether that state exists.
    ///
    /// # Errors
    /// This function errors if a state has an unknown type, if a state is called `none`, if two
    /// states share an identifier or if there is more than one start state.
    fn try_from(value: AutomatonRecord) -> Result<Self, Self::Error> {
        let mut automaton = Automaton::new(value.alphabet.split(',').map(str::trim).filter(|s| !s.is_empty()));
        let mut start: Option<String> = None;
        for record in value.states {
            let role: Role = parse_role(&record.role).ok_or_else(|| Error::UnknownRole { state: record.id.clone(), tag: record.role.clone() })?;
            if record.id == NONE_TARGET {
                return Err(Error::ReservedStateId { id: record.id });
            }
            if automaton.state(&record.id).is_some() {
                return Err(Error::DuplicateState { id: record.id });
            }
            if role.is_start() {
                if let Some(first) = start {
                    return Err(Error::MultipleStarts { first, second: record.id });
                }
                start = Some(record.id.clone());
            }

            let mut state = State::new(role);
            for (symbol, target) in record.transitions {
                let target: Target = if target == NONE_TARGET { Target::None } else { Target::State(StateId(target)) };
                state.transitions.insert(symbol.into(), target);
            }
            if let (Some(x), Some(y)) = (record.x, record.y) {
                state.position = Some(Position { x, y });
            }
            automaton.add_state(record.id, state);
        }
        Ok(automaton)
    }
}
impl TryFrom<&Automaton> for AutomatonRecord {
    type Error = Error;

    /// Converts an automaton into a record.
    ///
    /// # Errors
    /// This function errors if the record could not be read back as the same automaton. That's
    /// the case when a symbol is empty, contains a comma or has surrounding whitespace, when a
    /// state (or the target of a transition) is called `none` or when there is more than one start
    /// state.
    fn try_from(value: &Automaton) -> Result<Self, Self::Error> {
        let mut starts = value.states.iter().filter(|(_, s)| s.role.is_start()).map(|(id, _)| id);
        if let (Some(first), Some(second)) = (starts.next(), starts.next()) {
            return Err(Error::MultipleStarts { first: first.to_string(), second: second.to_string() });
        }
        if let Some(symbol) = value.alphabet.iter().find(|s| s.as_str().is_empty() || s.as_str().contains(',') || s.as_str().trim() != s.as_str()) {
            return Err(Error::InvalidSymbol { symbol: symbol.to_string() });
        }

        let mut states: Vec<StateRecord> = Vec::with_capacity(value.len());
        for (id, state) in &value.states {
            if id.as_str() == NONE_TARGET {
                return Err(Error::ReservedStateId { id: id.to_string() });
            }
            let mut transitions: IndexMap<String, String> = IndexMap::with_capacity(state.transitions.len());
            for (symbol, target) in &state.transitions {
                let target: String = match target.as_state() {
                    Some(target) if target.as_str() == NONE_TARGET => return Err(Error::ReservedStateId { id: target.to_string() }),
                    Some(target) => target.to_string(),
                    None => NONE_TARGET.into(),
                };
                transitions.insert(symbol.to_string(), target);
            }
            states.push(StateRecord {
                id: id.to_string(),
                role: role_tag(state.role).into(),
                transitions,
                x: state.position.map(|p| p.x),
                y: state.position.map(|p| p.y),
            });
        }

        Ok(Self { alphabet: value.alphabet.iter().map(Symbol::as_str).collect::<Vec<_>>().join(","), states })
    }
}





/***** TESTS *****/
