//! Error types for control operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when building or addressing actuator controls.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Control line name that no pump listens on.
    #[error("Unknown control line: {line}")]
    UnknownLine { line: String },

    #[error(transparent)]
    Core(#[from] ballast_core::CoreError),
}
