//! Scalar property values.

use core::fmt;
use serde::{Deserialize, Serialize};

/// The value of a single CSS property in the model.
///
/// Values are scalars: either raw text (`"red"`, `"10px solid"`) or a number
/// that is rendered in its shortest form (`1`, `0.5`). Equality is scalar
/// equality; a number compares equal to itself even when it is NaN so that
/// diffing a model against itself never reports a change.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A numeric value, written without a unit.
    Number(f64),
    /// A textual value, written verbatim.
    Text(String),
}

impl PropertyValue {
    /// Returns the text content if this is a textual value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(_) => None,
        }
    }

    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => {
                left.to_bits() == right.to_bits() || left == right
            }
            (Self::Text(left), Self::Text(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for PropertyValue {}

impl fmt::Display for PropertyValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(formatter, "{number}"),
            Self::Text(text) => formatter.write_str(text),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for PropertyValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for PropertyValue {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}
