//! Fixed-step runner and result recording.

use crate::error::{SimError, SimResult};
use crate::model::TickModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            t_end: 10.0,
            max_steps: 100_000,
            record_every: 10,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.t_end.is_finite() && self.t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Record of simulation results.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimRecord<S> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
    /// Number of ticks taken
    pub steps: usize,
}

/// Run a model with a fixed tick.
pub fn run_sim<M: TickModel>(
    model: &mut M,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::Snapshot>> {
    opts.validate()?;

    let mut t = 0.0;
    let mut t_record = vec![t];
    let mut x_record = vec![model.snapshot(t)];

    let mut step = 0;
    // Half-step slack so accumulated rounding does not add a trailing tick.
    while t + 0.5 * opts.dt < opts.t_end && step < opts.max_steps {
        model.tick(t, opts.dt)?;
        step += 1;
        t = step as f64 * opts.dt;

        if step % opts.record_every == 0 {
            t_record.push(t);
            x_record.push(model.snapshot(t));
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        t_record.push(t);
        x_record.push(model.snapshot(t));
    }

    debug!(steps = step, records = t_record.len(), "run finished");

    Ok(SimRecord {
        t: t_record,
        x: x_record,
        steps: step,
    })
}
