//! Serialisable run output.

use ballast_controls::RouteOutcome;
use ballast_net::MergeOutcome;
use ballast_sim::StepOutcome;
use serde::{Deserialize, Serialize};

/// Tank state at a recorded time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankRow {
    pub volume: f64,
    pub fill_percent: f64,
    pub pressure: f64,
}

/// One pump at a recorded time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpRow {
    pub id: String,
    pub active: bool,
    pub flow_setpoint: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_level: Option<f64>,
    pub power_draw: f64,
    pub flow: f64,
    pub last_step: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub t: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank: Option<TankRow>,
    pub pumps: Vec<PumpRow>,
}

/// How scheduled events were handled over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounters {
    pub signals_applied: usize,
    pub signals_ignored: usize,
    pub signals_unrouted: usize,
    pub panel_actions: usize,
    pub merges_applied: usize,
    pub merges_stale: usize,
    pub merges_malformed: usize,
}

impl EventCounters {
    pub fn count_route(&mut self, outcome: RouteOutcome) {
        match outcome {
            RouteOutcome::Applied => self.signals_applied += 1,
            RouteOutcome::Ignored => self.signals_ignored += 1,
            RouteOutcome::Unrouted => self.signals_unrouted += 1,
        }
    }

    pub fn count_merge(&mut self, outcome: &MergeOutcome) {
        match outcome {
            MergeOutcome::Applied { .. } => self.merges_applied += 1,
            MergeOutcome::Stale { .. } => self.merges_stale += 1,
            MergeOutcome::Malformed { .. } => self.merges_malformed += 1,
        }
    }
}

/// Per-pump totals over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpTotals {
    pub id: String,
    /// Ticks in which the pump ran powered.
    pub powered_ticks: u64,
    /// Net volume moved into the tank.
    pub volume_moved: f64,
    /// Records the pump asked to broadcast after local commands.
    pub broadcasts: usize,
    /// Last broadcast record, hex encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_record: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub steps: usize,
    pub elapsed_wall_s: f64,
    pub records: Vec<StationSnapshot>,
    pub events: EventCounters,
    pub pumps: Vec<PumpTotals>,
}

/// Lower-case hex rendering of a byte record.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
