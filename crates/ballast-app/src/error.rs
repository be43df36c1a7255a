//! Error types for the ballast-app service layer.

use std::path::PathBuf;

/// Application error type wrapping errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Pump not found: {0}")]
    PumpNotFound(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ballast-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<ballast_project::ProjectError> for AppError {
    fn from(err: ballast_project::ProjectError) -> Self {
        match err {
            ballast_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Scenario(other.to_string()),
        }
    }
}

impl From<ballast_project::ValidationError> for AppError {
    fn from(err: ballast_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ballast_sim::SimError> for AppError {
    fn from(err: ballast_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
