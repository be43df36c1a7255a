//! End-to-end runs through the station runtime.

use std::path::PathBuf;

use ballast_app::{AppError, RunReport, run_path, run_scenario};
use ballast_project::schema::{
    ActionDef, ContainerDef, EventDef, InitialStateDef, PowerDef, PumpDef, RunDef, Scenario,
};
use ballast_sim::StepOutcome;

fn scenario_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.push("scenarios");
    path.push(name);
    path
}

fn pump(id: &str, active: bool, flow_setpoint: f64) -> PumpDef {
    PumpDef {
        id: id.to_string(),
        capacity_rate: 80.0,
        rated_power: 10.0,
        min_voltage: 0.5,
        initial: InitialStateDef {
            active,
            flow_setpoint,
            target_level: None,
        },
    }
}

fn scenario(
    container: Option<ContainerDef>,
    pumps: Vec<PumpDef>,
    events: Vec<EventDef>,
) -> Scenario {
    Scenario {
        version: 1,
        name: "inline".to_string(),
        description: None,
        container,
        pumps,
        power: PowerDef::default(),
        events,
        run: RunDef {
            dt: 0.5,
            t_end: 2.0,
            max_steps: 1000,
            record_every: 1,
        },
    }
}

fn tank(volume: f64) -> ContainerDef {
    ContainerDef {
        name: "tank".to_string(),
        full_volume: 1000.0,
        volume,
        pressure: 0.0,
    }
}

fn final_volume(report: &RunReport) -> f64 {
    report
        .records
        .last()
        .and_then(|s| s.tank.as_ref())
        .map(|t| t.volume)
        .unwrap()
}

#[test]
fn manual_drain_follows_commands() {
    let path = scenario_path("manual_drain.yaml");
    if !path.exists() {
        eprintln!("Skipping test: scenario not found at {:?}", path);
        return;
    }
    let report = run_path(&path).unwrap();

    assert_eq!(report.steps, 8);
    assert_eq!(report.records.len(), 9);
    assert_eq!(report.events.signals_applied, 1);
    assert_eq!(report.events.signals_ignored, 1);
    assert_eq!(report.events.panel_actions, 1);

    let bilge = &report.pumps[0];
    // Two ticks at full drain, four at -25.5 %, then switched off.
    assert_eq!(bilge.powered_ticks, 6);
    assert!((bilge.volume_moved - (-241.6)).abs() < 1e-9);
    assert!((final_volume(&report) - 208.4).abs() < 1e-9);
    // set_speed and the panel toggle each changed local state.
    assert_eq!(bilge.broadcasts, 2);
    // -25.5 % quantises to -30 %, inactive.
    assert_eq!(bilge.last_record.as_deref(), Some("38"));
    assert_eq!(bilge.status, "Pumping speed: -25 %");

    let last = report.records.last().unwrap();
    assert_eq!(last.pumps[0].last_step, StepOutcome::Inactive);
    assert_eq!(last.pumps[0].power_draw, 0.0);
}

#[test]
fn ballast_hold_counts_network_records() {
    let path = scenario_path("ballast_hold.yaml");
    if !path.exists() {
        eprintln!("Skipping test: scenario not found at {:?}", path);
        return;
    }
    let report = run_path(&path).unwrap();

    assert_eq!(report.events.signals_applied, 2);
    assert_eq!(report.events.panel_actions, 1);
    assert_eq!(report.events.merges_applied, 1);
    assert_eq!(report.events.merges_stale, 1);
    assert_eq!(report.events.merges_malformed, 1);

    // The accepted record set trim to +20 %; the stale one was dropped.
    let trim = report.records.last().unwrap().pumps[1].clone();
    assert_eq!(trim.flow_setpoint, 20.0);
    assert!(trim.active);

    let main = report.records.last().unwrap().pumps[0].clone();
    assert_eq!(main.target_level, Some(70.0));
}

#[test]
fn brown_out_starves_pumps() {
    let mut s = scenario(Some(tank(100.0)), vec![pump("p", true, 50.0)], vec![]);
    s.power.voltage = 0.2;
    let report = run_scenario(&s).unwrap();

    assert_eq!(report.pumps[0].powered_ticks, 0);
    assert_eq!(report.pumps[0].volume_moved, 0.0);
    assert_eq!(final_volume(&report), 100.0);
    let row = &report.records.last().unwrap().pumps[0];
    assert_eq!(row.last_step, StepOutcome::PowerStarved);
    // Draw is still derived from the setpoint.
    assert_eq!(row.power_draw, 5.0);
}

#[test]
fn pumps_without_tank_move_nothing() {
    let s = scenario(None, vec![pump("p", true, 100.0)], vec![]);
    let report = run_scenario(&s).unwrap();

    assert_eq!(report.pumps[0].powered_ticks, 4);
    assert_eq!(report.pumps[0].volume_moved, 0.0);
    assert_eq!(
        report.records.last().unwrap().pumps[0].last_step,
        StepOutcome::NoContainer
    );
}

#[test]
fn events_on_one_tick_apply_in_file_order() {
    let events = vec![
        EventDef {
            at: 0.0,
            pump: "p".to_string(),
            action: ActionDef::Signal {
                line: "set_speed".to_string(),
                payload: "30".to_string(),
            },
        },
        EventDef {
            at: 0.0,
            pump: "p".to_string(),
            action: ActionDef::Signal {
                line: "set_speed".to_string(),
                payload: "-10".to_string(),
            },
        },
    ];
    let s = scenario(Some(tank(500.0)), vec![pump("p", true, 0.0)], events);
    let report = run_scenario(&s).unwrap();

    // -10 % of 80 per tick over four ticks.
    assert!((final_volume(&report) - 468.0).abs() < 1e-9);
    // Each set_speed changed the setpoint, but one broadcast covers the tick.
    assert_eq!(report.pumps[0].broadcasts, 1);
}

#[test]
fn empty_pump_list_is_rejected() {
    let s = scenario(Some(tank(0.0)), vec![], vec![]);
    assert!(matches!(run_scenario(&s), Err(AppError::Validation(_))));
}

#[test]
fn report_serialises_to_json() {
    let s = scenario(Some(tank(10.0)), vec![pump("p", true, 40.0)], vec![]);
    let report = run_scenario(&s).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["scenario"], "inline");
    assert_eq!(json["steps"], 4);
    assert_eq!(
        json["records"][1]["pumps"][0]["last_step"]["outcome"],
        "transferred"
    );
    assert_eq!(json["pumps"][0]["status"], "Pumping speed: 40 %");
    assert!(json["pumps"][0].get("last_record").is_none());
}
