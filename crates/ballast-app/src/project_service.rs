//! Scenario loading, validation, and introspection.

use std::path::Path;

use ballast_project::schema::Scenario;

use crate::error::{AppError, AppResult};

/// Summary of a pump for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpSummary {
    pub id: String,
    pub capacity_rate: f64,
    pub rated_power: f64,
    pub event_count: usize,
}

/// Load and validate a scenario (YAML, or JSON by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    Ok(ballast_project::load(path)?)
}

/// Validate scenario structure.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    ballast_project::validate_scenario(scenario)?;
    if scenario.pumps.is_empty() {
        return Err(AppError::Validation(
            "Scenario must have at least one pump".to_string(),
        ));
    }
    Ok(())
}

/// List all pumps in the scenario with summaries.
pub fn list_pumps(scenario: &Scenario) -> Vec<PumpSummary> {
    scenario
        .pumps
        .iter()
        .map(|pump| PumpSummary {
            id: pump.id.clone(),
            capacity_rate: pump.capacity_rate,
            rated_power: pump.rated_power,
            event_count: scenario.events.iter().filter(|e| e.pump == pump.id).count(),
        })
        .collect()
}
