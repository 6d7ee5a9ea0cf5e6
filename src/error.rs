//! Error types for service binding operations

use thiserror::Error;

/// The main error type for service binding operations
///
/// Missing entries, missing directories and malformed keys are not errors:
/// they are reported as `Ok(None)` or an empty collection. This enum covers
/// the conditions a caller cannot recover from by simply treating the value
/// as absent.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("binding does not contain a type")]
    MissingType,
}

/// A type alias for `Result<T, BindingError>`
pub type Result<T> = std::result::Result<T, BindingError>;
