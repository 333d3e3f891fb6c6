#![forbid(unsafe_code)]

//! Errors from building constraint sets and parsing flag names.
//!
//! The field validator itself never fails; these only surface from the
//! builders in [`constraints`](crate::constraints) and from
//! [`ValidityFlag`](crate::ValidityFlag)'s `FromStr`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConstraintError>;

/// Failure to build a [`Constraints`](crate::Constraints) set from attribute text.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("attribute {attribute} expects a number, got {value:?}")]
    NotANumber { attribute: &'static str, value: String },

    #[error("attribute {attribute} expects a non-negative integer, got {value:?}")]
    NotALength { attribute: &'static str, value: String },

    #[error("minlength {min} exceeds maxlength {max}")]
    LengthBounds { min: usize, max: usize },

    #[error("step must be positive, got {0}")]
    Step(f64),
}

impl ConstraintError {
    #[must_use]
    pub fn not_a_number(attribute: &'static str, value: impl Into<String>) -> Self {
        Self::NotANumber {
            attribute,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn not_a_length(attribute: &'static str, value: impl Into<String>) -> Self {
        Self::NotALength {
            attribute,
            value: value.into(),
        }
    }
}

/// A string that names no known validity flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validity flag: {name}")]
pub struct ParseFlagError {
    pub name: String,
}
