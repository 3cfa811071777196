//! CLI interface for poly-updown
//!
//! Provides subcommands for:
//! - `run`: Continuous supervised trading
//! - `once`: A single trading cycle
//! - `analyze`: Windowed signal analysis without trading
//! - `config`: Show the effective configuration

mod analyze;
mod once;
mod run;

pub use analyze::AnalyzeArgs;
pub use once::OnceArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poly-updown")]
#[command(about = "Self-healing trading bot for Polymarket up/down markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run continuous supervised trading
    Run(RunArgs),
    /// Run a single trading cycle and exit
    Once(OnceArgs),
    /// Sample the best market over a window and report the signal
    Analyze(AnalyzeArgs),
    /// Show the effective configuration
    Config,
}
