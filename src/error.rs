//! Error types for the dynamic data core.
//!
//! Provides a unified error type hierarchy for value access, conversion, and
//! JSON decode/encode failures.

use thiserror::Error;

/// Result type alias using this crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wrong-kind access, e.g. keying into a Number, or encoding a Pointer.
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// A [`crate::Variant`] conversion that cannot be totalized.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Const lookup of an absent object member.
    #[error("Member not existing: {0}")]
    MemberNotExisting(String),

    /// Array indexed beyond its bounds.
    #[error("Index {index} out of range (length {length})")]
    OutOfRange { index: usize, length: usize },

    /// Malformed JSON structure.
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Bad escape or invalid string contents.
    #[error("Format error at offset {offset}: {message}")]
    Format { offset: usize, message: String },

    /// Number grammar violation.
    #[error("Number error at offset {offset}: {message}")]
    Number { offset: usize, message: String },
}

/// Wrong-kind access error detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {operation} on value of kind {kind}")]
pub struct TypeError {
    pub kind: &'static str,
    pub operation: &'static str,
}

/// A [`crate::Variant`] conversion that cannot be totalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert from {from} to {to}")]
pub struct ConversionError {
    pub from: &'static str,
    pub to: &'static str,
}

impl Error {
    pub(crate) fn member_not_existing(key: impl Into<String>) -> Self {
        Error::MemberNotExisting(key.into())
    }

    pub(crate) fn out_of_range(index: usize, length: usize) -> Self {
        Error::OutOfRange { index, length }
    }

    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn format(offset: usize, message: impl Into<String>) -> Self {
        Error::Format {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn number(offset: usize, message: impl Into<String>) -> Self {
        Error::Number {
            offset,
            message: message.into(),
        }
    }
}
