use std::path::PathBuf;

use rowdiff_types::TypeError;

/// Errors from record source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded. `line` is 1-based; for whole-document
    /// formats it is the line reported by the parser.
    #[error("{path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: TypeError,
    },

    /// A JSON document input did not hold an array of records.
    #[error("{path}: expected an array of records, got {actual}")]
    NotAnArray { path: PathBuf, actual: &'static str },

    /// No records are registered under this path (in-memory source).
    #[error("no such input: {0}")]
    NotFound(PathBuf),

    /// Both a keep-list and an ignore-list were given.
    #[error("field selection may use a keep-list or an ignore-list, not both")]
    ConflictingSelection,
}

/// Result alias for record source operations.
pub type SourceResult<T> = Result<T, SourceError>;
