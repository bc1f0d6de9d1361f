//! Command line arguments for the `sensorfleet` binary

use std::path::PathBuf;

use clap::Parser;

/// Simulate a fleet of environmental sensors and post their readings
#[derive(Debug, Parser)]
#[command(name = "sensorfleet", version, about)]
pub struct Cli {
    /// Fleet configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Override the number of cycles each sensor runs
    #[arg(long, value_name = "N")]
    pub cycles: Option<u32>,

    /// Log records instead of posting them
    #[arg(long)]
    pub dry_run: bool,
}
