//! Error types for work domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing work domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkDomainError {
    /// The work name is empty after trimming.
    #[error("work name must not be empty")]
    EmptyWorkName,
}

/// Error returned while parsing task buckets from tags or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task bucket: {0}")]
pub struct ParseTaskBucketError(pub String);

/// Error returned while parsing row actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown row action: {0}")]
pub struct ParseRowActionError(pub String);
