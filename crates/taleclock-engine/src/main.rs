//! Engine binary for the Taleclock campaign clock.
//!
//! Wires the clock engine to its timestamp store and control API, then
//! serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `taleclock-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Select the timestamp store (Dragonfly, or in-memory when no URL)
//! 4. Restore the campaign's last saved timestamp
//! 5. Spawn the persist writer
//! 6. Build the clock driver (stopped)
//! 7. Serve the control API until `Ctrl-C`
//! 8. Pause the clock, drop the sink, and let the writer drain

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use taleclock_core::clock::SimulatedClock;
use taleclock_core::config::{LoggingConfig, TaleclockConfig};
use taleclock_core::driver::ClockDriver;
use taleclock_core::persist::{MemoryStore, TimestampStore, restore_from_store, spawn_persist_writer};
use taleclock_db::DragonflyStore;
use taleclock_observer::server::{ServerConfig, start_server};
use taleclock_observer::state::AppState;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "taleclock-config.yaml";

/// Longest wait for queued saves to reach the store at shutdown.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("taleclock-engine starting");
    info!(
        campaign = config.clock.campaign_id,
        start_date = %config.clock.start_date,
        fantasy_time_ratio = config.clock.fantasy_time_ratio,
        persistence_interval_ms = config.clock.persistence_interval_ms,
        refresh_interval_ms = config.clock.refresh_interval_ms,
        "Configuration loaded"
    );

    // 3. Select the timestamp store.
    let url = config.infrastructure.dragonfly_url.trim();
    if url.is_empty() {
        warn!("No Dragonfly URL configured, timestamps will not survive a restart");
        run(&config, MemoryStore::new()).await?;
    } else {
        let store = DragonflyStore::connect(url).await.map_err(EngineError::from)?;
        run(&config, store).await?;
    }

    info!("taleclock-engine stopped");
    Ok(())
}

/// Steps 4 through 8 of the startup sequence, for any store.
async fn run<S: TimestampStore>(
    config: &TaleclockConfig,
    store: S,
) -> Result<(), EngineError> {
    let campaign = config.clock.campaign();
    let settings = config.clock.settings()?;

    // 4. Restore.
    let stored = restore_from_store(&store, &campaign).await;

    // 5. Persist writer.
    let (sink, writer) = spawn_persist_writer(store, campaign.clone());

    // 6. Clock driver.
    let clock = SimulatedClock::restore(
        campaign,
        settings,
        config.clock.start_date,
        stored,
        sink,
    );
    let driver = Arc::new(ClockDriver::new(clock, config.clock.refresh_interval()));
    let state = driver.current_state().await;
    info!(
        timestamp = %state.timestamp,
        face = %state.timestamp.face().time_label,
        restored = stored.is_some(),
        "Clock ready"
    );

    // 7. Serve until Ctrl-C.
    let server_config = ServerConfig {
        host: config.infrastructure.observer_host.clone(),
        port: config.infrastructure.observer_port,
    };
    let app_state = Arc::new(AppState::new(Arc::clone(&driver)));
    let served = start_server(&server_config, app_state, shutdown_signal()).await;

    // 8. Pause (persists when running) and release the last sink.
    driver.shutdown().await;
    drop(driver);
    match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await {
        Ok(Ok(())) => info!("Persist writer drained"),
        Ok(Err(e)) => {
            return Err(EngineError::Writer {
                message: e.to_string(),
            });
        }
        Err(_) => warn!("Persist writer did not drain in time, latest save may be lost"),
    }

    served?;
    Ok(())
}

/// Resolve when the process receives `Ctrl-C`.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `path`, or defaults if the file is absent.
fn load_config(path: &Path) -> Result<TaleclockConfig, EngineError> {
    if path.exists() {
        Ok(TaleclockConfig::from_file(path)?)
    } else {
        let mut config = TaleclockConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
