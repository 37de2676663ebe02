//! Generic value tree for the legacy (NeXTSTEP) property-list dialect.
//!
//! The decoder in [`decode`] produces this tree; the project layer attaches
//! to it and the serializer in `project::serialize` writes it back.

mod decode;

use std::collections::BTreeMap;

use serde::Serialize;

pub use decode::decode;

/// A decoded property-list value.
///
/// The dialect has no scalar types besides strings, and no reference type:
/// identifiers are plain strings that happen to name another object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A quoted or unquoted string.
    String(String),
    /// An ordered `( a, b, )` sequence.
    Array(Vec<Value>),
    /// A `{ key = value; }` map, kept in key order.
    Dictionary(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the elements mutably, if this is an array.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is a dictionary.
    #[must_use]
    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Dictionary(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
