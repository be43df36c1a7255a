//! Per-tick simulation of ballast pumps.
//!
//! Provides:
//! - The external contracts a pump consumes: [`Container`], [`PowerPort`] and the
//!   [`ActiveEffects`] hook
//! - [`PoweredDevice`] / [`Actuator`] capabilities the tick step is written against
//! - [`SimulationStep`], the tick that turns setpoint, voltage and container state
//!   into a volumetric transfer
//! - [`Pump`], the concrete device composing state, electrics and step
//! - A fixed-step runner for anything implementing [`TickModel`]

pub mod container;
pub mod effects;
pub mod error;
pub mod model;
pub mod power;
pub mod pump;
pub mod sim;
pub mod step;

// Re-exports for public API
pub use container::{Container, Tank};
pub use effects::{ActiveEffects, CountingEffects};
pub use error::{SimError, SimResult};
pub use model::TickModel;
pub use power::{Electrics, PowerPort, PoweredDevice};
pub use pump::{Pump, PumpConfig};
pub use sim::{SimOptions, SimRecord, run_sim};
pub use step::{Actuator, OVERFLOW_PRESSURE_STEP, SimulationStep, StepOutcome};
