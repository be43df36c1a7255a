//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ballast_core::CoreError> for SimError {
    fn from(e: ballast_core::CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<ballast_controls::ControlError> for SimError {
    fn from(e: ballast_controls::ControlError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
