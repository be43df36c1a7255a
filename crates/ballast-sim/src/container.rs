//! Fluid containers a pump transfers into or out of.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Contract a pump needs from the reservoir it acts on.
///
/// Volume contributions from several pumps are plain additions, so the order in
/// which pumps touch a container within a tick does not matter.
pub trait Container {
    /// Current fluid volume.
    fn volume(&self) -> f64;

    /// Overwrite the fluid volume.
    fn set_volume(&mut self, volume: f64);

    /// Volume at which the container is full.
    fn full_volume(&self) -> f64;

    /// Current pressure.
    fn pressure(&self) -> f64;

    /// Raise (or lower) the pressure by `delta`.
    fn add_pressure(&mut self, delta: f64);

    /// Fill level in percent. A container with no capacity reads as empty.
    fn fill_percent(&self) -> f64 {
        let full = self.full_volume();
        if full > 0.0 {
            self.volume() / full * 100.0
        } else {
            0.0
        }
    }
}

/// Simple closed tank.
///
/// Volume is stored exactly as written, so pump contributions stay additive even
/// when a tick drains past empty. There is no upper bound either; overfilling is
/// signalled through pressure by the pumps acting on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Name for diagnostics
    pub name: String,
    volume: f64,
    full_volume: f64,
    pressure: f64,
}

impl Tank {
    /// Create a new tank.
    pub fn new(name: impl Into<String>, full_volume: f64, volume: f64) -> SimResult<Self> {
        if !full_volume.is_finite() || full_volume <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "full_volume must be positive",
            });
        }
        if !volume.is_finite() || volume < 0.0 {
            return Err(SimError::NonPhysical {
                what: "volume must be non-negative",
            });
        }
        Ok(Self {
            name: name.into(),
            volume,
            full_volume,
            pressure: 0.0,
        })
    }

    /// Start from a given pressure instead of zero.
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }
}

impl Container for Tank {
    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn full_volume(&self) -> f64 {
        self.full_volume
    }

    fn pressure(&self) -> f64 {
        self.pressure
    }

    fn add_pressure(&mut self, delta: f64) {
        self.pressure += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tank_validation() {
        assert!(Tank::new("t", 0.0, 0.0).is_err());
        assert!(Tank::new("t", -5.0, 0.0).is_err());
        assert!(Tank::new("t", 100.0, -1.0).is_err());
        assert!(Tank::new("t", 100.0, f64::NAN).is_err());
        assert!(Tank::new("t", 100.0, 150.0).is_ok());
    }

    #[test]
    fn fill_percent() {
        let tank = Tank::new("t", 200.0, 50.0).unwrap();
        assert_eq!(tank.fill_percent(), 25.0);
    }

    #[test]
    fn set_volume_stores_value_unchanged() {
        let mut tank = Tank::new("t", 100.0, 10.0).unwrap();
        tank.set_volume(-4.0);
        assert_eq!(tank.volume(), -4.0);
        assert_eq!(tank.fill_percent(), -4.0);
    }

    #[test]
    fn pressure_is_additive() {
        let mut tank = Tank::new("t", 100.0, 10.0).unwrap().with_pressure(1.0);
        tank.add_pressure(0.5);
        tank.add_pressure(0.5);
        assert_eq!(tank.pressure(), 2.0);
    }
}
