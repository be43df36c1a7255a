use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ballast_app::report::to_hex;
use ballast_app::{AppError, AppResult, RunReport, project_service, run_service};
use ballast_controls::ActuatorState;
use ballast_net::{MergeOutcome, NetworkSync, PumpSnapshot, codec};

#[derive(Parser)]
#[command(name = "ballast")]
#[command(about = "Ballast CLI - Fluid-transfer pump simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// List pumps in a scenario
    Pumps {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario to completion
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one pump variable over a run as CSV
    ExportSeries {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Pump ID
        pump_id: String,
        /// Variable name (flow_setpoint, flow, power_draw, active, tank_volume)
        variable: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode a pump state as a network record
    Encode {
        /// Flow setpoint in percent
        #[arg(long, allow_negative_numbers = true)]
        flow: f64,
        /// Whether the pump is running
        #[arg(long)]
        active: bool,
    },
    /// Decode a hex network record
    Decode {
        /// Record bytes as hex, e.g. 74
        hex: String,
        /// Merge into a fresh pump as if sent at this time
        #[arg(long, allow_negative_numbers = true)]
        sent_at: Option<f64>,
        /// Send time of the last record that pump accepted
        #[arg(long, default_value_t = 0.0, requires = "sent_at")]
        last_sync: f64,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Pumps { scenario_path } => cmd_pumps(&scenario_path),
        Commands::Run {
            scenario_path,
            json,
            output,
        } => cmd_run(&scenario_path, json, output.as_deref()),
        Commands::ExportSeries {
            scenario_path,
            pump_id,
            variable,
            output,
        } => cmd_export_series(&scenario_path, &pump_id, &variable, output.as_deref()),
        Commands::Encode { flow, active } => cmd_encode(flow, active),
        Commands::Decode {
            hex,
            sent_at,
            last_sync,
        } => cmd_decode(&hex, sent_at, last_sync),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    project_service::validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_pumps(scenario_path: &Path) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let pumps = project_service::list_pumps(&scenario);

    if pumps.is_empty() {
        println!("No pumps found in scenario");
    } else {
        println!("Pumps in scenario:");
        for pump in pumps {
            println!(
                "  {} - capacity {} / tick, rated {} W ({} events)",
                pump.id, pump.capacity_rate, pump.rated_power, pump.event_count
            );
        }
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, json: bool, output: Option<&Path>) -> AppResult<()> {
    let report = run_service::run_path(scenario_path)?;

    if let Some(path) = output {
        std::fs::write(path, report_json(&report)?)?;
        println!("✓ Report written to {}", path.display());
    }

    if json {
        println!("{}", report_json(&report)?);
        return Ok(());
    }

    println!("✓ Ran scenario: {}", report.scenario);
    println!(
        "  Steps: {}, records: {}, wall time: {:.3} s",
        report.steps,
        report.records.len(),
        report.elapsed_wall_s
    );

    let e = &report.events;
    println!(
        "  Signals: {} applied, {} ignored, {} unrouted",
        e.signals_applied, e.signals_ignored, e.signals_unrouted
    );
    println!("  Panel actions: {}", e.panel_actions);
    println!(
        "  Network records: {} applied, {} stale, {} malformed",
        e.merges_applied, e.merges_stale, e.merges_malformed
    );

    if let Some(tank) = report.records.last().and_then(|s| s.tank.as_ref()) {
        println!(
            "  Tank: {:.2} ({:.1} % full, pressure {:.2})",
            tank.volume, tank.fill_percent, tank.pressure
        );
    }

    println!("\nPumps:");
    for pump in &report.pumps {
        println!("  {} - {}", pump.id, pump.status);
        println!(
            "    powered ticks: {}, moved: {:.2}, broadcasts: {}",
            pump.powered_ticks, pump.volume_moved, pump.broadcasts
        );
        if let Some(record) = &pump.last_record {
            println!("    last record: {}", record);
        }
    }

    Ok(())
}

fn report_json(report: &RunReport) -> AppResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| AppError::InvalidInput(e.to_string()))
}

fn cmd_export_series(
    scenario_path: &Path,
    pump_id: &str,
    variable: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let report = run_service::run_path(scenario_path)?;

    let mut series = Vec::with_capacity(report.records.len());
    for snapshot in &report.records {
        let value = if variable == "tank_volume" {
            snapshot.tank.as_ref().map_or(0.0, |t| t.volume)
        } else {
            let pump = snapshot
                .pumps
                .iter()
                .find(|p| p.id == pump_id)
                .ok_or_else(|| AppError::PumpNotFound(pump_id.to_string()))?;
            match variable {
                "flow_setpoint" => pump.flow_setpoint,
                "flow" => pump.flow,
                "power_draw" => pump.power_draw,
                "active" => f64::from(u8::from(pump.active)),
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "unknown variable '{other}'"
                    )));
                }
            }
        };
        series.push((snapshot.t, value));
    }

    // Build CSV
    let mut csv = String::from("time_s,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_encode(flow: f64, active: bool) -> AppResult<()> {
    if !flow.is_finite() {
        return Err(AppError::InvalidInput(format!("flow must be finite: {flow}")));
    }
    let snapshot = PumpSnapshot::new(flow, active);
    println!("{}", to_hex(&codec::encode(&snapshot)));
    println!(
        "  transmitted: {} %, active: {}",
        snapshot.flow_setpoint(),
        snapshot.active
    );
    Ok(())
}

fn cmd_decode(hex: &str, sent_at: Option<f64>, last_sync: f64) -> AppResult<()> {
    let bytes = parse_hex(hex)?;

    if let Some(sent_at) = sent_at {
        let mut state = ActuatorState::default();
        state.set_last_sync(last_sync);
        match NetworkSync::new().merge(&mut state, &bytes, sent_at) {
            MergeOutcome::Applied { .. } => {
                println!("✓ Applied");
                println!("  {}, active: {}", state.status_line(), state.is_active());
            }
            MergeOutcome::Stale { sent_at, last_sync } => {
                println!("✗ Stale: sent at {sent_at}, last accepted {last_sync}");
            }
            MergeOutcome::Malformed { error } => println!("✗ Malformed: {error}"),
        }
        return Ok(());
    }

    let snapshot = codec::decode(&bytes).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    println!("flow_setpoint: {} %", snapshot.flow_setpoint());
    println!("active: {}", snapshot.active);
    Ok(())
}

fn parse_hex(hex: &str) -> AppResult<Vec<u8>> {
    let hex = hex.trim().trim_start_matches("0x");
    if hex.len() % 2 != 0 {
        return Err(AppError::InvalidInput(format!(
            "hex record must have an even number of digits: {hex}"
        )));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| AppError::InvalidInput(format!("invalid hex record: {hex}")))
        })
        .collect()
}
