//! Runtime built from a scenario: pumps around one tank, fed by one supply.

use std::collections::HashMap;

use ballast_controls::ActuatorState;
use ballast_net::{NetworkSync, PumpSnapshot, codec};
use ballast_project::schema::{ActionDef, EventDef, PowerDef, PumpDef, RecordDef, Scenario};
use ballast_sim::{
    Container, CountingEffects, Pump, PumpConfig, SimResult, StepOutcome, Tank, TickModel,
};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::report::{EventCounters, PumpRow, PumpTotals, StationSnapshot, TankRow, to_hex};

struct StationPump {
    pump: Pump,
    effects: CountingEffects,
    last_step: StepOutcome,
    volume_moved: f64,
    broadcasts: usize,
    last_record: Option<Vec<u8>>,
}

struct ScheduledEvent {
    at: f64,
    pump: usize,
    action: ActionDef,
}

/// A set of pumps sharing one tank and one power supply.
///
/// Pumps tick in declaration order. Each receives the supply voltage just before
/// its own tick, so no pump starves another of the shared bus.
pub struct Station {
    pumps: Vec<StationPump>,
    tank: Option<Tank>,
    power: PowerDef,
    events: Vec<ScheduledEvent>,
    next_event: usize,
    sync: NetworkSync,
    counters: EventCounters,
}

impl Station {
    /// Build a station from a validated scenario.
    pub fn build(scenario: &Scenario) -> AppResult<Self> {
        let tank = match &scenario.container {
            Some(def) => Some(
                Tank::new(def.name.clone(), def.full_volume, def.volume)?
                    .with_pressure(def.pressure),
            ),
            None => None,
        };

        let mut index = HashMap::new();
        let mut pumps = Vec::with_capacity(scenario.pumps.len());
        for (i, def) in scenario.pumps.iter().enumerate() {
            index.insert(def.id.as_str(), i);
            pumps.push(StationPump {
                pump: build_pump(def)?,
                effects: CountingEffects::default(),
                last_step: StepOutcome::Inactive,
                volume_moved: 0.0,
                broadcasts: 0,
                last_record: None,
            });
        }

        let mut events = scenario
            .events
            .iter()
            .map(|e: &EventDef| {
                let pump = *index
                    .get(e.pump.as_str())
                    .ok_or_else(|| AppError::PumpNotFound(e.pump.clone()))?;
                Ok(ScheduledEvent {
                    at: e.at,
                    pump,
                    action: e.action.clone(),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        // Stable: events at the same time keep file order.
        events.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self {
            pumps,
            tank,
            power: scenario.power.clone(),
            events,
            next_event: 0,
            sync: NetworkSync::new(),
            counters: EventCounters::default(),
        })
    }

    pub fn pump(&self, id: &str) -> Option<&Pump> {
        self.pumps.iter().map(|p| &p.pump).find(|p| p.id == id)
    }

    pub fn tank(&self) -> Option<&Tank> {
        self.tank.as_ref()
    }

    pub fn counters(&self) -> &EventCounters {
        &self.counters
    }

    /// Per-pump totals so far.
    pub fn totals(&self) -> Vec<PumpTotals> {
        self.pumps
            .iter()
            .map(|p| PumpTotals {
                id: p.pump.id.clone(),
                powered_ticks: p.effects.activations,
                volume_moved: p.volume_moved,
                broadcasts: p.broadcasts,
                last_record: p.last_record.as_deref().map(to_hex),
                status: p.pump.state().status_line(),
            })
            .collect()
    }

    /// Apply every event due before `until`.
    fn apply_due_events(&mut self, until: f64) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.at >= until {
                break;
            }
            let target = &mut self.pumps[event.pump];
            match &event.action {
                ActionDef::Signal { line, payload } => {
                    let outcome = target.pump.receive_signal(line, payload);
                    debug!(
                        pump = %target.pump.id,
                        line = %line,
                        payload = %payload,
                        ?outcome,
                        "signal"
                    );
                    self.counters.count_route(outcome);
                }
                ActionDef::Panel { action } => {
                    target.pump.apply(action.command());
                    debug!(pump = %target.pump.id, ?action, "panel action");
                    self.counters.panel_actions += 1;
                }
                ActionDef::Sync { sent_at, record } => {
                    let bytes = match record {
                        RecordDef::State {
                            flow_setpoint,
                            active,
                        } => codec::encode(&PumpSnapshot::new(*flow_setpoint, *active)),
                        RecordDef::Bytes { bytes } => bytes.clone(),
                    };
                    let outcome = self.sync.merge(target.pump.state_mut(), &bytes, *sent_at);
                    debug!(pump = %target.pump.id, sent_at, ?outcome, "sync record");
                    self.counters.count_merge(&outcome);
                }
            }
            self.next_event += 1;
        }
    }
}

fn build_pump(def: &PumpDef) -> AppResult<Pump> {
    let config = PumpConfig {
        capacity_rate: def.capacity_rate,
        rated_power: def.rated_power,
        min_voltage: def.min_voltage,
    };
    let mut pump = Pump::new(def.id.clone(), &config)?;
    let state: &mut ActuatorState = pump.state_mut();
    state.set_active(def.initial.active);
    state.set_flow_setpoint(def.initial.flow_setpoint);
    if let Some(target) = def.initial.target_level {
        state.set_target_fill_level(target);
    }
    Ok(pump)
}

impl TickModel for Station {
    type Snapshot = StationSnapshot;

    fn snapshot(&self, t: f64) -> StationSnapshot {
        StationSnapshot {
            t,
            tank: self.tank.as_ref().map(|tank| TankRow {
                volume: tank.volume(),
                fill_percent: tank.fill_percent(),
                pressure: tank.pressure(),
            }),
            pumps: self
                .pumps
                .iter()
                .map(|p| {
                    let s = p.pump.state();
                    PumpRow {
                        id: p.pump.id.clone(),
                        active: s.is_active(),
                        flow_setpoint: s.flow_setpoint(),
                        target_level: s.target_fill_level(),
                        power_draw: s.power_draw(),
                        flow: s.instantaneous_flow(),
                        last_step: p.last_step,
                    }
                })
                .collect(),
        }
    }

    fn tick(&mut self, t: f64, dt: f64) -> SimResult<()> {
        self.apply_due_events(t + dt);

        let voltage = self.power.voltage_at(t);
        for p in &mut self.pumps {
            p.pump.supply(voltage);
            let container = self.tank.as_mut().map(|tank| tank as &mut dyn Container);
            p.last_step = p.pump.update(dt, container, &mut p.effects);
            if let StepOutcome::Transferred { flow, .. } = p.last_step {
                p.volume_moved += flow;
            }
            if p.pump.state_mut().take_sync_request() {
                p.broadcasts += 1;
                p.last_record = Some(self.sync.encode(p.pump.state()));
            }
        }
        Ok(())
    }
}
