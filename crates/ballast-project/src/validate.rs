//! Scenario validation logic.

use crate::schema::{ActionDef, ContainerDef, PumpDef, RunDef, Scenario};
use ballast_controls::ControlLine;
use std::collections::HashSet;

/// Newest scenario format this build understands.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown control line: {line} in {context}")]
    UnknownLine { line: String, context: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if let Some(container) = &scenario.container {
        validate_container(container)?;
    }

    let mut pump_ids = HashSet::new();
    for pump in &scenario.pumps {
        if pump.id.is_empty() {
            return Err(invalid("pump id", "", "must not be empty"));
        }
        if !pump_ids.insert(pump.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: pump.id.clone(),
                context: "pumps".to_string(),
            });
        }
        validate_pump(pump)?;
    }

    non_negative("power voltage", scenario.power.voltage)?;
    for (i, outage) in scenario.power.outages.iter().enumerate() {
        non_negative(&format!("outage {i} start"), outage.start)?;
        if !outage.end.is_finite() || outage.end <= outage.start {
            return Err(invalid(
                &format!("outage {i} end"),
                outage.end,
                "must be finite and after start",
            ));
        }
    }

    for (i, event) in scenario.events.iter().enumerate() {
        let context = format!("event {i}");
        non_negative(&format!("{context} at"), event.at)?;
        if !pump_ids.contains(event.pump.as_str()) {
            return Err(ValidationError::MissingReference {
                id: event.pump.clone(),
                context,
            });
        }
        match &event.action {
            ActionDef::Signal { line, .. } => {
                if line.parse::<ControlLine>().is_err() {
                    return Err(ValidationError::UnknownLine {
                        line: line.clone(),
                        context,
                    });
                }
            }
            ActionDef::Panel { .. } => {}
            ActionDef::Sync { sent_at, .. } => {
                if !sent_at.is_finite() {
                    return Err(invalid(
                        &format!("{context} sent_at"),
                        sent_at,
                        "must be finite",
                    ));
                }
            }
        }
    }

    validate_run(&scenario.run)
}

fn validate_container(container: &ContainerDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("container '{}' {name}", container.name);
    if !container.full_volume.is_finite() || container.full_volume <= 0.0 {
        return Err(invalid(
            &field("full_volume"),
            container.full_volume,
            "must be positive and finite",
        ));
    }
    non_negative(&field("volume"), container.volume)?;
    if !container.pressure.is_finite() {
        return Err(invalid(&field("pressure"), container.pressure, "must be finite"));
    }
    Ok(())
}

fn validate_pump(pump: &PumpDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("pump '{}' {name}", pump.id);
    non_negative(&field("capacity_rate"), pump.capacity_rate)?;
    non_negative(&field("rated_power"), pump.rated_power)?;
    non_negative(&field("min_voltage"), pump.min_voltage)?;

    let sp = pump.initial.flow_setpoint;
    if !sp.is_finite() || !(-100.0..=100.0).contains(&sp) {
        return Err(invalid(
            &field("initial flow_setpoint"),
            sp,
            "must be within [-100, 100]",
        ));
    }
    if let Some(target) = pump.initial.target_level
        && (!target.is_finite() || !(0.0..=100.0).contains(&target))
    {
        return Err(invalid(
            &field("initial target_level"),
            target,
            "must be within [0, 100]",
        ));
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    if !run.dt.is_finite() || run.dt <= 0.0 {
        return Err(invalid("run dt", run.dt, "must be positive and finite"));
    }
    non_negative("run t_end", run.t_end)?;
    if run.max_steps == 0 {
        return Err(invalid("run max_steps", run.max_steps, "must be positive"));
    }
    if run.record_every == 0 {
        return Err(invalid("run record_every", run.record_every, "must be positive"));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, value, "must be non-negative and finite"));
    }
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
