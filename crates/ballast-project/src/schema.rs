//! Scenario schema definitions.

use ballast_controls::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tank the pumps act on. Without one, pumps run but move nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerDef>,
    #[serde(default)]
    pub pumps: Vec<PumpDef>,
    #[serde(default)]
    pub power: PowerDef,
    #[serde(default)]
    pub events: Vec<EventDef>,
    #[serde(default)]
    pub run: RunDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerDef {
    pub name: String,
    pub full_volume: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpDef {
    pub id: String,
    #[serde(default = "default_capacity_rate")]
    pub capacity_rate: f64,
    #[serde(default)]
    pub rated_power: f64,
    #[serde(default = "default_min_voltage")]
    pub min_voltage: f64,
    #[serde(default)]
    pub initial: InitialStateDef,
}

fn default_capacity_rate() -> f64 {
    ballast_controls::DEFAULT_CAPACITY_RATE
}

fn default_min_voltage() -> f64 {
    0.5
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub flow_setpoint: f64,
    /// Fill level in percent; present means the pump starts in level-hold mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level: Option<f64>,
}

/// Voltage delivered to every pump before each tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerDef {
    #[serde(default = "default_voltage")]
    pub voltage: f64,
    /// Windows `[start, end)` during which nothing is delivered.
    #[serde(default)]
    pub outages: Vec<OutageDef>,
}

fn default_voltage() -> f64 {
    1.0
}

impl Default for PowerDef {
    fn default() -> Self {
        Self {
            voltage: default_voltage(),
            outages: Vec::new(),
        }
    }
}

impl PowerDef {
    /// Voltage delivered at time `t`.
    pub fn voltage_at(&self, t: f64) -> f64 {
        if self.outages.iter().any(|o| o.contains(t)) {
            0.0
        } else {
            self.voltage
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutageDef {
    pub start: f64,
    pub end: f64,
}

impl OutageDef {
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDef {
    /// Time at which the event is applied (seconds).
    pub at: f64,
    /// Id of the pump the event targets.
    pub pump: String,
    pub action: ActionDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDef {
    /// Logic signal on a named control line.
    Signal { line: String, payload: String },
    /// Operator action on the pump's local panel.
    Panel { action: PanelAction },
    /// Inbound network record with its transport timestamp.
    Sync { sent_at: f64, record: RecordDef },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PanelAction {
    /// The panel's running switch: flips the pump and leaves level-hold mode.
    Toggle,
    NudgeIn,
    NudgeOut,
}

impl PanelAction {
    pub fn command(self) -> Command {
        match self {
            Self::Toggle => Command::ManualOverrideToggle,
            Self::NudgeIn => Command::NudgeIn,
            Self::NudgeOut => Command::NudgeOut,
        }
    }
}

/// Content of an inbound record: either state to encode, or raw bytes as received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordDef {
    State { flow_setpoint: f64, active: bool },
    Bytes { bytes: Vec<u8> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_t_end")]
    pub t_end: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

fn default_t_end() -> f64 {
    10.0
}

fn default_max_steps() -> usize {
    100_000
}

fn default_record_every() -> usize {
    10
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            t_end: default_t_end(),
            max_steps: default_max_steps(),
            record_every: default_record_every(),
        }
    }
}
