//! Field values as submitted and as stored.
//!
//! Most inputs carry a single string; checkbox groups carry an ordered list.
//! [`FieldValue`] models both explicitly instead of relying on loose typing.
//! Stored documents written by other tools may hold numbers, booleans, or
//! `null`; those load as [`FieldValue::Other`] and are written back unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field's value: one string, or an ordered sequence of strings.
///
/// Serialized untagged, so a record stored as JSON looks like
/// `{"name": "Ana", "topics": ["rust", "forms"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single string value.
    Scalar(String),
    /// An ordered sequence of values (checkbox groups, comma-split scalars).
    Multi(Vec<String>),
    /// Any other JSON value found in a stored record, kept verbatim.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Returns an empty scalar.
    pub const fn empty() -> Self {
        Self::Scalar(String::new())
    }

    /// Returns `true` for an empty string, an empty sequence, a sequence
    /// holding a single empty string, or `null`.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::Multi(values) => match values.as_slice() {
                [] => true,
                [only] => only.is_empty(),
                _ => false,
            },
            Self::Other(value) => value.is_null(),
        }
    }

    /// Returns the scalar string, or `None` for a sequence.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Multi(_) | Self::Other(_) => None,
        }
    }

    /// Coerces the value into a sequence. An empty scalar becomes an empty
    /// sequence; any other scalar becomes a one-element sequence. Foreign
    /// values have no string view and yield an empty sequence.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Self::Scalar(s) if s.is_empty() => Vec::new(),
            Self::Scalar(s) => vec![s.as_str()],
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
            Self::Other(_) => Vec::new(),
        }
    }

    /// Joins the value into one string with the given separator. Foreign
    /// values render as JSON, `null` as the empty string.
    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::Scalar(s) => s.clone(),
            Self::Multi(values) => values.join(separator),
            Self::Other(serde_json::Value::Null) => String::new(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(","))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multi(values.into_iter().map(String::from).collect())
    }
}
