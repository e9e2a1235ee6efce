//! Error-handling module for the crate

use thiserror::Error;

/// Error-Collection for all the possible Errors occurring in this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was empty
    #[error("argument `{0}` must not be empty")]
    NullArgument(&'static str),
    /// No column of the given name exists in the table
    #[error("column \"{0}\" not found")]
    NotFound(String),
    /// Element access with a type that does not match the column
    #[error("type mismatch: found {found}, expected {expected}")]
    TypeMismatch {
        /// Type of the accessed column or array
        found: String,
        /// Description of what the operation needs
        expected: &'static str,
    },
    /// Conversion to or storage as an unsupported type
    #[error("unsupported target type: {0}")]
    InvalidType(String),
    /// Argument is illegal for this operation
    #[error("illegal input: {0}")]
    IllegalInput(String),
    /// Row or element index is out of range
    #[error("index {index} is out of range for length {len}")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of elements that can be accessed
        len: usize,
    },
    /// Two tables or columns do not share the required structure
    #[error("incompatible input: {0}")]
    IncompatibleInput(String),
    /// Operation is undefined for the kind of column it was applied to
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),
}

impl Error {
    pub(crate) fn type_mismatch(found: impl ToString, expected: &'static str) -> Self {
        Self::TypeMismatch {
            found: found.to_string(),
            expected,
        }
    }
}
