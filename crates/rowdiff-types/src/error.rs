use thiserror::Error;

/// Errors produced by record operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record JSON: {0}")]
    Parse(String),

    #[error("expected a mapping record, got {0}")]
    NotAMapping(&'static str),
}
