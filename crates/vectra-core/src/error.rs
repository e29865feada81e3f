use thiserror::Error;

use crate::dtype::ScalarKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectraError {
    #[error("expected {expected} dimension(s) but got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("expected {expected:?} elements but got {got:?}")]
    SizeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("unexpected format {format:?} for a {expected} target")]
    FormatMismatch { format: String, expected: ScalarKind },

    /// Raised for `index >= len`. Hosts iterating by index treat it as the end
    /// of the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected a value of type {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("no type named {0:?} is registered")]
    UnknownType(String),

    #[error("type {0:?} is already registered")]
    DuplicateType(String),

    #[error("no implicit conversion from {from} to {to}")]
    NoConversion { from: String, to: String },

    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("config error: {0}")]
    Config(String),
}

impl VectraError {
    /// Whether this error should end an iteration-by-index loop.
    pub fn is_index_error(&self) -> bool {
        matches!(self, VectraError::IndexOutOfRange { .. })
    }
}

/// Bounds check shared by every indexed accessor.
#[inline]
pub fn check_index(index: usize, len: usize) -> crate::Result<()> {
    if index >= len {
        return Err(VectraError::IndexOutOfRange { index, len });
    }
    Ok(())
}
