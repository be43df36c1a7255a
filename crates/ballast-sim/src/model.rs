//! TickModel trait for anything advanced by the fixed-step runner.

use crate::error::SimResult;

/// A discrete-time system advanced in fixed ticks.
///
/// A TickModel must implement:
/// - Snapshot type (Clone, recorded by the runner)
/// - A snapshot of the current state
/// - One tick of evolution
pub trait TickModel {
    /// Recorded state type (must be Clone).
    type Snapshot: Clone;

    /// Capture the observable state at time `t`.
    fn snapshot(&self, t: f64) -> Self::Snapshot;

    /// Advance from `t` to `t + dt`.
    ///
    /// Note: events scheduled in `[t, t + dt)` are expected to be applied before
    /// the devices tick.
    fn tick(&mut self, t: f64, dt: f64) -> SimResult<()>;
}
