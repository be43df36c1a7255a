//! Pump device: actuator state, electrics and the tick step in one place.

use crate::container::Container;
use crate::effects::ActiveEffects;
use crate::error::SimResult;
use crate::power::{Electrics, PowerPort, PoweredDevice};
use crate::step::{Actuator, SimulationStep, StepOutcome};
use ballast_controls::{
    ActuatorState, Command, ControlSignalRouter, DEFAULT_CAPACITY_RATE, RouteOutcome,
};
use serde::{Deserialize, Serialize};

/// Static parameters of a pump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpConfig {
    /// Volume moved per tick at full setpoint and unit power factor.
    pub capacity_rate: f64,
    /// Power drawn at full setpoint.
    pub rated_power: f64,
    /// Voltage below which the pump idles.
    pub min_voltage: f64,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            capacity_rate: DEFAULT_CAPACITY_RATE,
            rated_power: 0.0,
            min_voltage: 0.5,
        }
    }
}

/// A fluid-transfer actuator.
#[derive(Debug, Clone)]
pub struct Pump {
    pub id: String,
    state: ActuatorState,
    electrics: Electrics,
    step: SimulationStep,
    router: ControlSignalRouter,
}

impl Pump {
    pub fn new(id: impl Into<String>, config: &PumpConfig) -> SimResult<Self> {
        Ok(Self {
            id: id.into(),
            state: ActuatorState::new(config.capacity_rate)?,
            electrics: Electrics::new(config.rated_power, config.min_voltage)?,
            step: SimulationStep::default(),
            router: ControlSignalRouter::new(),
        })
    }

    pub fn state(&self) -> &ActuatorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ActuatorState {
        &mut self.state
    }

    /// Deliver voltage for the next tick.
    pub fn supply(&mut self, voltage: f64) {
        self.electrics.port.supply(voltage);
    }

    /// Route a logic signal.
    pub fn receive_signal(&mut self, line: &str, payload: &str) -> RouteOutcome {
        self.router.handle(&mut self.state, line, payload)
    }

    /// Apply a typed command from any caller.
    pub fn apply(&mut self, cmd: Command) {
        self.router.apply(&mut self.state, cmd);
    }

    /// Advance one tick.
    ///
    /// A switched-off pump does not run the step at all: it reports no flow and no
    /// draw and leaves the container and its power budget alone.
    pub fn update(
        &mut self,
        dt: f64,
        container: Option<&mut dyn Container>,
        effects: &mut dyn ActiveEffects,
    ) -> StepOutcome {
        if !self.state.is_active() {
            self.state.reset_idle();
            return StepOutcome::Inactive;
        }
        let step = self.step.clone();
        step.advance(self, dt, container, effects)
    }
}

impl PoweredDevice for Pump {
    fn rated_power(&self) -> f64 {
        self.electrics.rated_power
    }

    fn power_port(&self) -> &PowerPort {
        &self.electrics.port
    }

    fn power_port_mut(&mut self) -> &mut PowerPort {
        &mut self.electrics.port
    }
}

impl Actuator for Pump {
    fn actuator(&self) -> &ActuatorState {
        &self.state
    }

    fn actuator_mut(&mut self) -> &mut ActuatorState {
        &mut self.state
    }
}
