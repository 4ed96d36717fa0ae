//! The closed value model for brick parameters.
//!
//! Recorded parameter values are arbitrarily nested literals: scalars,
//! sequences, and string-keyed mappings. The variant set is closed so the
//! scanner in `lineage-history` can match exhaustively instead of probing
//! structure at runtime.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered parameter map. Order matters: several resolution rules
/// pick the first parameter satisfying a predicate.
pub type ParamMap = IndexMap<String, Value>;

/// One recorded parameter value.
///
/// Only `Text` leaves can reference tracked filenames; `Null`, `Bool`, and
/// `Number` leaves are static parameters and never data references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Whether this value is a container (sequence or mapping).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}
