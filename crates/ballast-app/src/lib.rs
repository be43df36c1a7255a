//! Shared application service layer for ballast.
//!
//! Turns a validated scenario into a running station of pumps around one tank,
//! drives it with the fixed-step runner and summarises the run. The CLI is a thin
//! front end over this crate.

pub mod error;
pub mod project_service;
pub mod report;
pub mod run_service;
pub mod station;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use project_service::{PumpSummary, list_pumps, load_scenario, validate_scenario};
pub use report::{EventCounters, PumpRow, PumpTotals, RunReport, StationSnapshot, TankRow};
pub use run_service::{run_path, run_scenario};
pub use station::Station;
