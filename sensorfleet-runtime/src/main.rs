//! Entry point for the `sensorfleet` binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use sensorfleet_connectors::{MemorySink, TelemetrySink};
use sensorfleet_runtime::{Cli, FleetConfig, Scheduler};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = FleetConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let sink: Arc<dyn TelemetrySink> = if cli.dry_run {
        Arc::new(MemorySink::dry_run())
    } else {
        Arc::new(config.sink.http_sink()?)
    };

    let scheduler = Scheduler::from_config(&config, cli.cycles, sink)?;

    let shutdown = scheduler.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current cycle");
                shutdown.signal();
            }
            Err(e) => warn!("Ctrl-C handler unavailable: {e}"),
        }
    });

    let reports = scheduler.run().await?;
    for report in &reports {
        info!("{report}");
    }

    Ok(())
}
