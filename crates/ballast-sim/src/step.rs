//! The per-tick transfer step.

use crate::container::Container;
use crate::effects::ActiveEffects;
use crate::power::PoweredDevice;
use ballast_controls::{ActuatorState, FillLevelController};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Pressure added to a container each tick a pump leaves it over-full.
pub const OVERFLOW_PRESSURE_STEP: f64 = 0.5;

/// A powered device carrying actuator state.
pub trait Actuator: PoweredDevice {
    fn actuator(&self) -> &ActuatorState;

    fn actuator_mut(&mut self) -> &mut ActuatorState;
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The device is switched off and did not run.
    Inactive,
    /// Delivered voltage was below the operating threshold.
    PowerStarved,
    /// Powered, but there is nothing to pump into.
    NoContainer,
    /// Volume was moved. `overflowed` is set when the container ended above full.
    Transferred { flow: f64, overflowed: bool },
}

/// Advances a pump by one tick.
#[derive(Debug, Clone, Default)]
pub struct SimulationStep {
    pub controller: FillLevelController,
}

impl SimulationStep {
    /// Run one tick of `device` against an optional container.
    ///
    /// Steps, in order:
    /// 1. clear last tick's flow
    /// 2. in target-level mode, recompute the setpoint from the container's fill
    /// 3. derive power draw from `|setpoint|`
    /// 4. stop if under-voltage (no effects, no transfer)
    /// 5. run the effects hook, stop if there is no container
    /// 6. scale flow by delivered voltage unless the device draws nothing
    /// 7. add the flow to the container; over-full raises pressure by a fixed step
    /// 8. consume the delivered voltage
    pub fn advance(
        &self,
        device: &mut dyn Actuator,
        dt: f64,
        container: Option<&mut dyn Container>,
        effects: &mut dyn ActiveEffects,
    ) -> StepOutcome {
        let rated_power = device.rated_power();
        let state = device.actuator_mut();
        state.set_instantaneous_flow(0.0);

        if let Some(target) = state.target_fill_level() {
            let fill_pct = container.as_deref().map_or(0.0, |c| c.fill_percent());
            state.set_flow_setpoint(self.controller.setpoint(target, fill_pct));
        }

        let setpoint = state.flow_setpoint();
        let capacity_rate = state.capacity_rate();
        let draw = rated_power * (setpoint / 100.0).abs();
        state.set_power_draw(draw);

        let port = device.power_port_mut();
        if port.is_starved() {
            trace!(
                voltage = port.voltage(),
                min_voltage = port.min_voltage(),
                "under-voltage, idling"
            );
            return StepOutcome::PowerStarved;
        }

        effects.apply_active(dt);

        let Some(container) = container else {
            return StepOutcome::NoContainer;
        };

        let voltage = port.voltage();
        let power_factor = if draw == 0.0 { 1.0 } else { voltage };
        let flow = (setpoint / 100.0) * capacity_rate * power_factor;

        container.set_volume(container.volume() + flow);
        let overflowed = container.volume() > container.full_volume();
        if overflowed {
            container.add_pressure(OVERFLOW_PRESSURE_STEP);
        }

        port.consume();
        device.actuator_mut().set_instantaneous_flow(flow);

        trace!(setpoint, flow, overflowed, "transfer");
        StepOutcome::Transferred { flow, overflowed }
    }
}
