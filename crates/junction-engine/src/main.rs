//! Junction engine binary for the fuzzy junction controller.
//!
//! Runs a batch of four-lane scenarios through the controller and prints a
//! single JSON report on stdout. Logs go to stderr.
//!
//! # Run Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `junction-config.yaml` in the working directory
//! 2. Initialize structured logging (tracing) from `logging.*`
//! 3. Build the traffic controller
//! 4. Arbitrate every scenario, scoring lanes in parallel
//! 5. Compare each outcome with the static baseline and build the
//!    winner's countdown
//! 6. Sample the control surface
//! 7. Print the report

mod error;
mod report;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use junction_core::config::LoggingConfig;
use junction_core::{
    ControllerConfig, TrafficController, clearance_countdown, configured_scenarios,
    control_surface, run_scenarios_concurrent,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::{EngineReport, ScenarioRun};

/// Default configuration file name.
const CONFIG_FILE: &str = "junction-config.yaml";

/// Application entry point for the junction engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a scenario cannot be
/// evaluated, or the report cannot be written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    init_tracing(&config.logging);
    info!("junction-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    let report = run(&config).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).map_err(EngineError::from)?;
    writeln!(stdout).map_err(EngineError::from)?;

    info!(scenarios = report.scenarios.len(), "junction-engine finished");
    Ok(())
}

/// Load the config file if it exists, otherwise defaults.
///
/// The flag is `true` when the file was read.
fn load_config(path: &Path) -> Result<(ControllerConfig, bool), EngineError> {
    if path.exists() {
        Ok((ControllerConfig::from_file(path)?, true))
    } else {
        Ok((ControllerConfig::default(), false))
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Evaluate every configured scenario and sample the control surface.
async fn run(config: &ControllerConfig) -> Result<EngineReport, EngineError> {
    let controller = Arc::new(TrafficController::new()?);
    let scenarios = configured_scenarios(config);
    info!(count = scenarios.len(), "Running scenarios");

    let runs = run_scenarios_concurrent(&controller, config, scenarios)
        .await?
        .into_iter()
        .map(|report| {
            let countdown = clearance_countdown(
                report.decision.winner_result().state.density,
                report.decision.green_duration,
            );
            debug!(
                scenario = %report.scenario.name,
                countdown_seconds = countdown.len().saturating_sub(1),
                "Countdown built"
            );
            ScenarioRun { report, countdown }
        })
        .collect();

    let surface = control_surface(
        &controller,
        config.surface.density_steps,
        config.surface.wait_steps,
    )?;
    info!(samples = surface.len(), "Control surface sampled");

    Ok(EngineReport {
        scenarios: runs,
        surface,
    })
}
