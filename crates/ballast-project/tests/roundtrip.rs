use ballast_project::schema::*;
use ballast_project::{load, load_json, load_yaml, save_json, save_yaml, validate_scenario};

fn sample() -> Scenario {
    Scenario {
        version: 1,
        name: "Roundtrip".to_string(),
        description: None,
        container: Some(ContainerDef {
            name: "tank".to_string(),
            full_volume: 100.0,
            volume: 25.0,
            pressure: 0.0,
        }),
        pumps: vec![PumpDef {
            id: "p1".to_string(),
            capacity_rate: 40.0,
            rated_power: 12.0,
            min_voltage: 0.5,
            initial: InitialStateDef {
                active: true,
                flow_setpoint: 30.0,
                target_level: Some(60.0),
            },
        }],
        power: PowerDef::default(),
        events: vec![
            EventDef {
                at: 1.0,
                pump: "p1".to_string(),
                action: ActionDef::Signal {
                    line: "set_speed".to_string(),
                    payload: "-20".to_string(),
                },
            },
            EventDef {
                at: 2.0,
                pump: "p1".to_string(),
                action: ActionDef::Sync {
                    sent_at: 1.5,
                    record: RecordDef::Bytes { bytes: vec![0x74] },
                },
            },
        ],
        run: RunDef {
            dt: 0.25,
            t_end: 5.0,
            max_steps: 1000,
            record_every: 2,
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let scenario = sample();
    validate_scenario(&scenario).unwrap();

    let path = std::env::temp_dir().join("ballast_project_roundtrip.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json() {
    let scenario = sample();

    let path = std::env::temp_dir().join("ballast_project_roundtrip.json");
    save_json(&path, &scenario).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(scenario, loaded);
    assert_eq!(scenario, load_json(&path).unwrap());
}

#[test]
fn invalid_scenario_is_not_saved() {
    let mut scenario = sample();
    scenario.pumps[0].capacity_rate = -1.0;

    let path = std::env::temp_dir().join("ballast_project_invalid.yaml");
    assert!(save_yaml(&path, &scenario).is_err());
}
