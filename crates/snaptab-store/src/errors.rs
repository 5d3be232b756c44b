//! Error handling for snaptab-store
//!
//! Wraps snaptab-core ExError with filesystem-specific helpers

use snaptab_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a not-found error for a missing snapshot root or entity directory
pub fn not_found(op: &str, path: &Path, what: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op)
        .with_path(path.display().to_string())
        .with_message(format!("{} not found", what))
}

/// Create an IO error
pub fn io_error(op: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a malformed-document error for one line of a partition file
pub fn malformed_document(path: &Path, line: u64, err: &serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::MalformedDocument)
        .with_op("iter_entity")
        .with_path(path.display().to_string())
        .with_line(line)
        .with_message(err.to_string())
}

/// Create an error for a rejected caller argument
pub fn invalid_input(op: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(op)
        .with_message(reason)
}

/// Create a pipeline configuration error
pub fn config_invalid(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("pipeline_config")
        .with_message(reason)
}

/// Create an error from a csv writer failure
pub fn from_csv(op: &str, path: &Path, err: csv::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}
