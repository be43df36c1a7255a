//! Actuator state and control-signal handling for ballast pumps.
//!
//! This crate owns the authoritative record of a fluid-transfer actuator and the
//! local command path that mutates it. The tick step lives in `ballast-sim` and the
//! remote-authority path in `ballast-net`; both operate on the same
//! [`ActuatorState`].
//!
//! # Architecture
//!
//! - [`ActuatorState`] holds the setpoint, control mode, active flag and the
//!   per-tick derived quantities, guarded by validating setters
//! - [`ControlLine`] names the four logical inputs a pump listens on
//! - [`Command`] is the single typed command both logic signals and local
//!   operator actions are expressed as
//! - [`ControlSignalRouter`] turns commands (or raw line/payload pairs) into
//!   state mutations
//! - [`FillLevelController`] is the proportional law used in target-level mode

pub mod controller;
pub mod error;
pub mod router;
pub mod signal;
pub mod state;

pub use controller::FillLevelController;
pub use error::{ControlError, ControlResult};
pub use router::{ControlSignalRouter, RouteOutcome};
pub use signal::{Command, ControlLine, parse_payload};
pub use state::{ActuatorState, ControlMode, DEFAULT_CAPACITY_RATE};
