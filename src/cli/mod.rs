//! Command-line interface definitions.

pub mod banner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// marketarb - cross-venue prediction-market arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "marketarb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scan loop and dashboard (foreground)
    Run(RunArgs),

    /// Print a one-shot summary of recent activity and exit
    Status(StatusArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Skip the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override the minimum profit threshold (cents)
    #[arg(long)]
    pub min_profit_cents: Option<Decimal>,

    /// Override the dashboard's listening port
    #[arg(long)]
    pub dashboard_port: Option<u16>,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Number of recent opportunities to list
    #[arg(short = 'n', long, default_value = "10")]
    pub lines: usize,
}
