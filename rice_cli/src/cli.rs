//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "rice_cli", version, about = "Rice dispenser valve controller")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/rice_config.toml")]
    pub config: PathBuf,

    /// Optional calibration CSV (strict header `raw,kg`)
    #[arg(long, value_name = "FILE")]
    pub calibration: Option<PathBuf>,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the controller loop until Ctrl-C
    Run {
        /// Stop after this many ticks (simulation and smoke tests)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Override loop.tick_ms
        #[arg(long, value_name = "MS")]
        tick_ms: Option<u64>,
        /// Open the valve right away instead of waiting for the loading delay
        #[arg(long, action = ArgAction::SetTrue)]
        skip_loading_delay: bool,
    },
    /// Read the scale once and report (hardware presence / sim ok)
    SelfCheck,
}
