use std::path::PathBuf;

use ballast_project::schema::*;
use ballast_project::{ValidationError, load, validate_scenario};

fn scenarios_dir() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // go to crates
    dir.pop(); // go to repo root
    dir.push("scenarios");
    dir
}

#[test]
fn shipped_scenarios_validate() {
    let dir = scenarios_dir();
    if !dir.exists() {
        eprintln!("Skipping test: scenarios not found at {:?}", dir);
        return;
    }
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "json")
        ) {
            load(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        }
    }
}

fn base() -> Scenario {
    serde_yaml::from_str(
        r#"
version: 1
name: base
container: { name: t, full_volume: 100.0 }
pumps:
  - id: p1
  - id: p2
"#,
    )
    .unwrap()
}

#[test]
fn base_is_valid() {
    validate_scenario(&base()).unwrap();
}

#[test]
fn rejects_future_version() {
    let mut s = base();
    s.version = 99;
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::UnsupportedVersion { version: 99 })
    ));
}

#[test]
fn rejects_duplicate_pump() {
    let mut s = base();
    s.pumps[1].id = "p1".to_string();
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn rejects_event_for_missing_pump() {
    let mut s = base();
    s.events.push(EventDef {
        at: 0.0,
        pump: "nope".to_string(),
        action: ActionDef::Panel {
            action: PanelAction::NudgeIn,
        },
    });
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn rejects_unknown_line() {
    let mut s = base();
    s.events.push(EventDef {
        at: 0.0,
        pump: "p1".to_string(),
        action: ActionDef::Signal {
            line: "set_state".to_string(),
            payload: "1".to_string(),
        },
    });
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::UnknownLine { .. })
    ));
}

#[test]
fn rejects_bad_numbers() {
    let mut s = base();
    s.pumps[0].initial.flow_setpoint = 120.0;
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.pumps[0].initial.target_level = Some(-1.0);
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.container.as_mut().unwrap().full_volume = 0.0;
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.run.dt = 0.0;
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.power.outages.push(OutageDef {
        start: 2.0,
        end: 1.0,
    });
    assert!(validate_scenario(&s).is_err());
}
