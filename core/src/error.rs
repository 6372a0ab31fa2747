//! Error types for argument parsing and validation.
//!
//! Parsing stops at the first problem, so each error describes exactly one
//! offending option. Option names are rendered in long form (`--scale`).

use thiserror::Error;

use crate::settings::SettingsError;

/// Errors found while scanning tokens against the option table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Token does not name any option.
    #[error("unrecognized option: {0}")]
    UnrecognizedOption(String),

    /// Option needs more values than the remaining tokens provide.
    #[error("missing argument for {option}: expected {expected} value(s), found {found}")]
    MissingArgument {
        option: String,
        expected: usize,
        found: usize,
    },

    /// Two options of the same exclusivity group were supplied.
    #[error("{first} and {second} are mutually exclusive")]
    MutuallyExclusive { first: String, second: String },
}

/// Errors found while checking option values against their domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Number outside the legal range.
    #[error("value '{value}' for {option} is out of range: expected {expected}")]
    OutOfRange {
        option: String,
        value: String,
        expected: String,
    },

    /// Token is not one of the accepted names.
    #[error("invalid value '{value}' for {option}: expected one of {expected}")]
    InvalidEnumValue {
        option: String,
        value: String,
        expected: String,
    },

    /// Multi-value argument with the wrong shape.
    #[error("malformed value '{value}' for {option}: {reason}")]
    MalformedPair {
        option: String,
        value: String,
        reason: String,
    },

    /// Value is not a number.
    #[error("value '{value}' for {option} is not a number")]
    NotANumber { option: String, value: String },

    /// Value is empty.
    #[error("value for {option} cannot be empty")]
    EmptyValue { option: String },
}

/// Any failure that turns an argument list into no configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
