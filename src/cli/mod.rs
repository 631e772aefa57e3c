//! CLI interface for alpha-desk
//!
//! Provides subcommands for:
//! - `scan`: Generate ranked signals for a set of symbols
//! - `risk`: Analyze portfolio risk from a snapshot export
//! - `status`: Show current state
//! - `config`: Show configuration

mod risk;
mod scan;

pub use risk::RiskArgs;
pub use scan::ScanArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "alpha-desk")]
#[command(about = "Strategy-driven trading signal and portfolio risk engine")]
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
    /// Generate ranked signals for a set of symbols
    Scan(ScanArgs),
    /// Analyze portfolio risk from a snapshot export
    Risk(RiskArgs),
    /// Show current state
    Status,
    /// Show configuration
    Config,
}
