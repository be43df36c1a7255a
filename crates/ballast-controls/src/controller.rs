//! Proportional fill-level controller used in target-level mode.

use ballast_core::numeric::{PERCENT_MAX, PERCENT_MIN};
use serde::{Deserialize, Serialize};

/// Proportional controller mapping fill error to a flow setpoint.
///
/// Output is `round(gain * (target - fill))`, clamped to the setpoint range. With
/// the default gain of 10 the output saturates once the fill error reaches ten
/// percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillLevelController {
    /// Proportional gain, setpoint percent per fill percent.
    pub kp: f64,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
}

impl Default for FillLevelController {
    fn default() -> Self {
        Self {
            kp: 10.0,
            out_min: PERCENT_MIN,
            out_max: PERCENT_MAX,
        }
    }
}

impl FillLevelController {
    /// Compute the setpoint for a container at `fill_pct` percent.
    ///
    /// # Arguments
    ///
    /// * `target` - Desired fill level (percent)
    /// * `fill_pct` - Measured fill level (percent)
    pub fn setpoint(&self, target: f64, fill_pct: f64) -> f64 {
        let error = target - fill_pct;
        (self.kp * error).round().clamp(self.out_min, self.out_max)
    }
}
