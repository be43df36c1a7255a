//! Power capability of electrically driven devices.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Voltage delivered to a device for the current tick, plus its operating threshold.
///
/// The grid writes `voltage` before each tick; the device zeroes it once it has
/// used it, so an unsupplied tick reads as zero volts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerPort {
    voltage: f64,
    min_voltage: f64,
}

impl PowerPort {
    pub fn new(min_voltage: f64) -> SimResult<Self> {
        if !min_voltage.is_finite() || min_voltage < 0.0 {
            return Err(SimError::InvalidArg {
                what: "min_voltage must be non-negative",
            });
        }
        Ok(Self {
            voltage: 0.0,
            min_voltage,
        })
    }

    /// Deliver `voltage` for the coming tick. Non-finite or negative input counts
    /// as no supply.
    pub fn supply(&mut self, voltage: f64) {
        self.voltage = if voltage.is_finite() {
            voltage.max(0.0)
        } else {
            0.0
        };
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn min_voltage(&self) -> f64 {
        self.min_voltage
    }

    /// Delivered voltage is below the operating threshold.
    pub fn is_starved(&self) -> bool {
        self.voltage < self.min_voltage
    }

    /// Use up this tick's budget.
    pub fn consume(&mut self) {
        self.voltage = 0.0;
    }
}

/// Capability of anything that draws electrical power.
pub trait PoweredDevice {
    /// Draw at 100 % demand.
    fn rated_power(&self) -> f64;

    fn power_port(&self) -> &PowerPort;

    fn power_port_mut(&mut self) -> &mut PowerPort;
}

/// Rated power plus the port it is fed through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Electrics {
    pub rated_power: f64,
    pub port: PowerPort,
}

impl Electrics {
    pub fn new(rated_power: f64, min_voltage: f64) -> SimResult<Self> {
        if !rated_power.is_finite() || rated_power < 0.0 {
            return Err(SimError::InvalidArg {
                what: "rated_power must be non-negative",
            });
        }
        Ok(Self {
            rated_power,
            port: PowerPort::new(min_voltage)?,
        })
    }
}

impl PoweredDevice for Electrics {
    fn rated_power(&self) -> f64 {
        self.rated_power
    }

    fn power_port(&self) -> &PowerPort {
        &self.port
    }

    fn power_port_mut(&mut self) -> &mut PowerPort {
        &mut self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_and_consume() {
        let mut port = PowerPort::new(0.5).unwrap();
        assert!(port.is_starved());
        port.supply(1.0);
        assert!(!port.is_starved());
        port.consume();
        assert_eq!(port.voltage(), 0.0);
    }

    #[test]
    fn bad_supply_counts_as_none() {
        let mut port = PowerPort::new(0.0).unwrap();
        port.supply(f64::NAN);
        assert_eq!(port.voltage(), 0.0);
        port.supply(-3.0);
        assert_eq!(port.voltage(), 0.0);
    }

    #[test]
    fn invalid_parameters() {
        assert!(PowerPort::new(-0.1).is_err());
        assert!(Electrics::new(-1.0, 0.5).is_err());
        assert!(Electrics::new(10.0, f64::INFINITY).is_err());
    }
}
