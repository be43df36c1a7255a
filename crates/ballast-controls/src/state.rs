//! Authoritative actuator record and its validating setters.

use crate::error::{ControlError, ControlResult};
use ballast_core::numeric::{
    PERCENT_MAX, PERCENT_MIN, clamp_percent, ensure_finite, ensure_in_range, round_to,
};
use serde::{Deserialize, Serialize};

/// Volume moved per tick at 100 % setpoint and unit power factor when nothing else
/// is configured.
pub const DEFAULT_CAPACITY_RATE: f64 = 80.0;

/// How the flow setpoint is decided each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ControlMode {
    /// The setpoint is whatever was last commanded.
    #[default]
    Manual,
    /// The setpoint is recomputed every tick to drive the container toward
    /// `target` percent full.
    TargetLevel { target: f64 },
}

impl ControlMode {
    /// Target fill level in percent, if in target-level mode.
    pub fn target(&self) -> Option<f64> {
        match self {
            Self::Manual => None,
            Self::TargetLevel { target } => Some(*target),
        }
    }
}

/// State of a fluid-transfer actuator.
///
/// Invariants held by the setters:
/// - `flow_setpoint` is always in `[-100, 100]`
/// - a target fill level, when present, is in `[0, 100]`
/// - `power_draw` is never negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredState")]
pub struct ActuatorState {
    flow_setpoint: f64,
    capacity_rate: f64,
    mode: ControlMode,
    active: bool,
    power_draw: f64,
    instantaneous_flow: f64,
    last_sync: f64,
    #[serde(skip)]
    sync_requested: bool,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self {
            flow_setpoint: 0.0,
            capacity_rate: DEFAULT_CAPACITY_RATE,
            mode: ControlMode::Manual,
            active: false,
            power_draw: 0.0,
            instantaneous_flow: 0.0,
            last_sync: 0.0,
            sync_requested: false,
        }
    }
}

/// Serialised form of [`ActuatorState`], checked against the setter invariants
/// before it becomes a state.
#[derive(Deserialize)]
struct StoredState {
    flow_setpoint: f64,
    capacity_rate: f64,
    mode: ControlMode,
    active: bool,
    #[serde(default)]
    power_draw: f64,
    #[serde(default)]
    instantaneous_flow: f64,
    #[serde(default)]
    last_sync: f64,
}

impl TryFrom<StoredState> for ActuatorState {
    type Error = ControlError;

    fn try_from(stored: StoredState) -> ControlResult<Self> {
        let mut state = Self::new(stored.capacity_rate)?;
        state.flow_setpoint = ensure_in_range(
            stored.flow_setpoint,
            PERCENT_MIN,
            PERCENT_MAX,
            "flow_setpoint",
        )?;
        if let Some(target) = stored.mode.target() {
            ensure_in_range(target, 0.0, PERCENT_MAX, "target fill level")?;
        }
        state.mode = stored.mode;
        state.active = stored.active;
        if stored.active {
            state.power_draw = ensure_in_range(stored.power_draw, 0.0, f64::MAX, "power_draw")?;
        }
        state.instantaneous_flow = ensure_finite(stored.instantaneous_flow, "instantaneous_flow")?;
        state.last_sync = stored.last_sync;
        Ok(state)
    }
}

impl ActuatorState {
    /// Create an idle actuator with the given capacity rate.
    ///
    /// # Errors
    ///
    /// Returns error if `capacity_rate` is negative or not finite.
    pub fn new(capacity_rate: f64) -> ControlResult<Self> {
        let capacity_rate = ensure_finite(capacity_rate, "capacity_rate")?;
        if capacity_rate < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "capacity_rate must be non-negative",
            });
        }
        Ok(Self {
            capacity_rate,
            ..Self::default()
        })
    }

    pub fn flow_setpoint(&self) -> f64 {
        self.flow_setpoint
    }

    pub fn capacity_rate(&self) -> f64 {
        self.capacity_rate
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn target_fill_level(&self) -> Option<f64> {
        self.mode.target()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn power_draw(&self) -> f64 {
        self.power_draw
    }

    /// Signed volume moved during the last tick.
    pub fn instantaneous_flow(&self) -> f64 {
        self.instantaneous_flow
    }

    /// Magnitude of the last tick's transfer, or zero while the pump is off.
    pub fn current_flow(&self) -> f64 {
        if !self.active {
            return 0.0;
        }
        self.instantaneous_flow.abs()
    }

    /// Highest send timestamp accepted from the network so far.
    pub fn last_sync(&self) -> f64 {
        self.last_sync
    }

    /// Set the flow setpoint, clamped to `[-100, 100]` and rounded to whole percent.
    ///
    /// Non-finite input is refused and leaves the stored value untouched. A valid
    /// input always replaces the stored value, even if the stored value is itself
    /// corrupt. Returns whether the value was applied.
    pub fn set_flow_setpoint(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.flow_setpoint = round_to(clamp_percent(value), 1.0);
        true
    }

    /// Set the flow setpoint clamped to `[-100, 100]` without rounding.
    ///
    /// Used by the `set_speed` line, which keeps fractional percentages.
    /// Infinite input saturates; `NaN` is refused.
    pub fn set_flow_setpoint_unrounded(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.flow_setpoint = clamp_percent(value);
        true
    }

    /// Enter target-level mode, clamping `target` to `[0, 100]`.
    ///
    /// `NaN` is refused; infinities saturate.
    pub fn set_target_fill_level(&mut self, target: f64) -> bool {
        if target.is_nan() {
            return false;
        }
        self.mode = ControlMode::TargetLevel {
            target: target.clamp(0.0, PERCENT_MAX),
        };
        true
    }

    /// Drop back to manual mode, keeping the current setpoint.
    pub fn clear_target(&mut self) {
        self.mode = ControlMode::Manual;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn toggle_active(&mut self) {
        self.active = !self.active;
    }

    /// Record the power the device draws this tick. Negative or non-finite values
    /// are stored as zero.
    pub fn set_power_draw(&mut self, draw: f64) {
        self.power_draw = if draw.is_finite() { draw.max(0.0) } else { 0.0 };
    }

    pub fn set_instantaneous_flow(&mut self, flow: f64) {
        self.instantaneous_flow = flow;
    }

    /// Zero the draw of an inactive device. No-op while active.
    pub fn enforce_idle_draw(&mut self) {
        if !self.active {
            self.power_draw = 0.0;
        }
    }

    /// Clear both per-tick derived quantities.
    pub fn reset_idle(&mut self) {
        self.instantaneous_flow = 0.0;
        self.power_draw = 0.0;
    }

    /// Whether a message sent at `sent_at` would be accepted.
    pub fn accepts_sync(&self, sent_at: f64) -> bool {
        sent_at >= self.last_sync
    }

    pub fn set_last_sync(&mut self, sent_at: f64) {
        self.last_sync = sent_at;
    }

    /// Flag the networked fields as changed by a local command.
    pub fn request_sync(&mut self) {
        self.sync_requested = true;
    }

    /// Return and clear the pending sync request.
    pub fn take_sync_request(&mut self) -> bool {
        std::mem::take(&mut self.sync_requested)
    }

    /// Operator-facing status text.
    pub fn status_line(&self) -> String {
        format!("Pumping speed: {} %", self.flow_setpoint.trunc() as i32)
    }
}
