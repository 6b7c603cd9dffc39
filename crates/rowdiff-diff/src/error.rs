//! Error types for the diff crate.

use crate::key::CompositeKey;
use crate::merge::Side;

/// Errors that can occur during diff operations.
///
/// Every variant is a violated precondition of the input; the diff
/// algorithms themselves are total over well-formed record sequences.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// No key fields were given for a key diff.
    #[error("invalid key specification: at least one key field is required")]
    EmptyKeySpec,

    /// A key field name was empty or whitespace.
    #[error("invalid key specification: key field #{index} is blank")]
    InvalidKeyField { index: usize },

    /// Two records on one side share a composite key and duplicates are rejected.
    #[error("duplicate key {key} in {side} records")]
    DuplicateKey { side: Side, key: CompositeKey },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
