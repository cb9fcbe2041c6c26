//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while transforming a change notification
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("failed to decode change event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no field {0} was provided")]
    MissingField(&'static str),

    #[error("invalid configuration diff: no {0} entry")]
    MissingDiffKey(String),

    #[error("invalid configuration diff: {0} has no previous value")]
    MissingPreviousValue(String),

    #[error("malformed tag change event at {0}")]
    MalformedTagChange(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("event was not create, update, or delete: {0}")]
    UnsupportedChangeKind(String),
}

/// Errors that can occur while delivering records downstream
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("unexpected response from stream endpoint: {0}")]
    UnexpectedStatus(u16),

    #[error("failed to serialize records: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("delivery cancelled")]
    Cancelled,

    #[error("delivery deadline exceeded")]
    DeadlineExceeded,
}

/// Errors from a transform-then-report invocation
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
