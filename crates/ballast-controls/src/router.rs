//! Routing of control signals and operator commands into actuator state.

use crate::signal::{Command, ControlLine};
use crate::state::ActuatorState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Setpoint change applied by one nudge.
pub const NUDGE_STEP: f64 = 10.0;

/// What happened to a routed signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutcome {
    /// The command was applied.
    Applied,
    /// The payload did not parse; state is unchanged.
    Ignored,
    /// The line name is not one a pump listens on.
    Unrouted,
}

/// Interprets control lines and commands against an [`ActuatorState`].
///
/// Local commands that change the setpoint or the active flag raise the state's
/// sync request so the owner can broadcast the new values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlSignalRouter;

impl ControlSignalRouter {
    pub fn new() -> Self {
        Self
    }

    /// Handle a raw `line`/`payload` pair.
    ///
    /// Never fails: unknown lines and unparseable payloads leave the state
    /// untouched. An inactive device always ends with zero power draw.
    pub fn handle(&self, state: &mut ActuatorState, line: &str, payload: &str) -> RouteOutcome {
        let outcome = match line.parse::<ControlLine>() {
            Ok(line) => match Command::from_line(line, payload) {
                Some(cmd) => {
                    self.apply(state, cmd);
                    RouteOutcome::Applied
                }
                None => {
                    debug!(%line, payload, "ignoring unparseable control payload");
                    RouteOutcome::Ignored
                }
            },
            Err(_) => {
                debug!(line, "signal on unrouted control line");
                RouteOutcome::Unrouted
            }
        };
        state.enforce_idle_draw();
        outcome
    }

    /// Apply a typed command.
    pub fn apply(&self, state: &mut ActuatorState, cmd: Command) {
        let before = (state.flow_setpoint(), state.is_active());

        match cmd {
            Command::RemoteToggle => state.toggle_active(),
            Command::SetActive { active } => state.set_active(active),
            Command::SetSpeed { value } => {
                state.set_flow_setpoint_unrounded(value);
            }
            Command::SetTargetLevel { signal } => {
                // Shared [-100, 100] signal domain onto [0, 100] percent full.
                if state.set_target_fill_level((signal + 100.0) / 2.0) {
                    debug!(target = ?state.target_fill_level(), "target-level mode");
                }
            }
            Command::ManualOverrideToggle => {
                state.clear_target();
                state.toggle_active();
            }
            Command::NudgeIn => {
                state.set_flow_setpoint(state.flow_setpoint() + NUDGE_STEP);
            }
            Command::NudgeOut => {
                state.set_flow_setpoint(state.flow_setpoint() - NUDGE_STEP);
            }
        }

        state.enforce_idle_draw();
        if (state.flow_setpoint(), state.is_active()) != before {
            state.request_sync();
        }
    }
}
