//! Smoke test for the ballast-app service layer.

use std::path::{Path, PathBuf};

use ballast_app::{AppError, list_pumps, load_scenario, validate_scenario};

fn scenario_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("scenarios");
    path.push(name);
    path
}

#[test]
fn load_shipped_scenario() {
    let path = scenario_path("ballast_hold.yaml");
    if !path.exists() {
        eprintln!("Skipping test: scenario not found at {:?}", path);
        return;
    }

    let scenario = load_scenario(&path).expect("Failed to load scenario");
    validate_scenario(&scenario).expect("Validation should succeed");

    let pumps = list_pumps(&scenario);
    let ids: Vec<_> = pumps.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["main", "trim"]);
    assert_eq!(pumps[0].event_count, 2);
    assert_eq!(pumps[1].event_count, 4);
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = load_scenario(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
    match err {
        AppError::ScenarioFileRead { path, .. } => {
            assert_eq!(path, PathBuf::from("/nonexistent/scenario.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
