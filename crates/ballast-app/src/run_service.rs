//! Run execution service.

use std::path::Path;
use std::time::Instant;

use ballast_project::schema::{RunDef, Scenario};
use ballast_sim::{SimOptions, run_sim};
use tracing::info;

use crate::error::AppResult;
use crate::project_service;
use crate::report::RunReport;
use crate::station::Station;

fn sim_options(run: &RunDef) -> SimOptions {
    SimOptions {
        dt: run.dt,
        t_end: run.t_end,
        max_steps: run.max_steps,
        record_every: run.record_every,
    }
}

/// Validate a scenario, run it to completion and summarise the result.
pub fn run_scenario(scenario: &Scenario) -> AppResult<RunReport> {
    project_service::validate_scenario(scenario)?;

    let start = Instant::now();
    let mut station = Station::build(scenario)?;
    let record = run_sim(&mut station, &sim_options(&scenario.run))?;
    let elapsed_wall_s = start.elapsed().as_secs_f64();

    let report = RunReport {
        scenario: scenario.name.clone(),
        steps: record.steps,
        elapsed_wall_s,
        records: record.x,
        events: station.counters().clone(),
        pumps: station.totals(),
    };

    info!(
        scenario = %report.scenario,
        steps = report.steps,
        records = report.records.len(),
        elapsed_s = elapsed_wall_s,
        "run complete"
    );

    Ok(report)
}

/// Load a scenario file and run it.
pub fn run_path(path: &Path) -> AppResult<RunReport> {
    let scenario = project_service::load_scenario(path)?;
    run_scenario(&scenario)
}
