//! Engine binary for the bistro simulation.
//!
//! Loads configuration, builds the restaurant, and runs the configured
//! number of service days against the stub kitchen.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `bistro-config.yaml` (or the path in
//!    `BISTRO_CONFIG`)
//! 3. Build the restaurant and the stub kitchen
//! 4. Create operator state, install the Ctrl-C stop handler, and start
//!    the stdin operator console
//! 5. Run each service day
//! 6. Log the day reports

mod console;
mod error;
mod event_log;

use std::path::PathBuf;
use std::sync::Arc;

use bistro_core::config::BistroConfig;
use bistro_core::kitchen::StubKitchen;
use bistro_core::operator::{DayEndReason, LoopCommand, OperatorState};
use bistro_core::{Restaurant, runner};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::event_log::EventLogCallback;

/// Ticks between floor summaries in the log.
const SUMMARY_EVERY_TICKS: u64 = 240;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, construction, or a service day
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("bistro-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        seed = config.simulation.seed,
        tick_secs = config.simulation.tick_secs,
        tick_interval_ms = config.simulation.tick_interval_ms,
        days = config.simulation.days,
        seats = config.floor.seats.len(),
        "Configuration loaded"
    );

    // 3. Build the restaurant.
    let mut restaurant = Restaurant::new(&config).map_err(EngineError::from)?;
    let mut kitchen = StubKitchen::new(config.kitchen.cook_secs);

    // 4. Operator state.
    let operator = Arc::new(OperatorState::new(
        config.simulation.tick_interval_ms,
        config.simulation.max_ticks_per_day,
    ));
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current tick");
                    operator.control(LoopCommand::Stop);
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    console::spawn_console(Arc::clone(&operator));

    let mut callback = EventLogCallback::new(SUMMARY_EVERY_TICKS);

    // 5. Run the service days.
    let mut reports = Vec::new();
    for day in 1..=config.simulation.days {
        let report = runner::run_service_day(
            day,
            &mut restaurant,
            &mut kitchen,
            &operator,
            &mut callback,
            config.simulation.tick_secs,
        )
        .await
        .map_err(EngineError::from)?;
        let stopped = report.end_reason == DayEndReason::OperatorStop;
        reports.push(report);
        if stopped {
            break;
        }
    }

    // 6. Log results.
    match serde_json::to_string(&reports) {
        Ok(json) => info!(reports = %json, "Day reports"),
        Err(e) => warn!(error = %e, "failed to serialize day reports"),
    }
    info!(
        days_run = reports.len(),
        total_earnings = restaurant.total_earnings(),
        uptime_secs = operator.elapsed_seconds(),
        "bistro-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `BISTRO_CONFIG` or `bistro-config.yaml`.
///
/// Falls back to defaults when the file does not exist.
fn load_config() -> Result<BistroConfig, EngineError> {
    let config_path = std::env::var_os("BISTRO_CONFIG")
        .map_or_else(|| PathBuf::from("bistro-config.yaml"), PathBuf::from);
    if config_path.exists() {
        let config = BistroConfig::from_file(&config_path)?;
        Ok(config)
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        Ok(BistroConfig::default())
    }
}
