//! Parse and conversion errors.

use std::fmt;

use thiserror::Error;

/// A converter rejected a raw token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not a valid {expected}")]
pub struct ConversionError {
    raw: String,
    expected: String,
}

impl ConversionError {
    /// `expected` names the kind of value the converter wanted (e.g. "integer").
    pub fn new(raw: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            expected: expected.into(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

/// The declaration a value was headed for when conversion failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Flag as written on the command line, prefix included (`--double`, `-d`).
    Flag(String),
    /// Positional declaration name.
    Positional(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "flag '{flag}'"),
            Self::Positional(name) => write!(f, "positional '{name}'"),
        }
    }
}

/// First failure of a parse. Parsing stops as soon as one is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("flag could not be matched: {flag}")]
    UnmatchedFlag { flag: String },

    #[error("flag '{flag}' requires an argument but received none")]
    MissingValue { flag: String },

    #[error("flag '{flag}' was passed a joined argument, but these are disallowed")]
    DisallowedJoinedValue { flag: String },

    #[error("flag '{flag}' was passed a separate argument, but these are disallowed")]
    DisallowedSeparateValue { flag: String },

    #[error("{target} received an invalid value: {source}")]
    InvalidValue {
        target: Target,
        #[source]
        source: ConversionError,
    },

    #[error("flag '{flag}' does not take an argument but was passed '{value}'")]
    UnexpectedValueOnFlag { flag: String, value: String },

    #[error("no positional arguments were ready to receive: {token}")]
    NoPositionalSlot { token: String },
}

/// Violation class of a [`ParseError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnmatchedFlag,
    MissingValue,
    DisallowedJoinedValue,
    DisallowedSeparateValue,
    InvalidValue,
    UnexpectedValueOnFlag,
    NoPositionalSlot,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnmatchedFlag { .. } => ErrorKind::UnmatchedFlag,
            Self::MissingValue { .. } => ErrorKind::MissingValue,
            Self::DisallowedJoinedValue { .. } => ErrorKind::DisallowedJoinedValue,
            Self::DisallowedSeparateValue { .. } => ErrorKind::DisallowedSeparateValue,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
            Self::UnexpectedValueOnFlag { .. } => ErrorKind::UnexpectedValueOnFlag,
            Self::NoPositionalSlot { .. } => ErrorKind::NoPositionalSlot,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
