//! Command-line interface definitions.

pub mod analyze;
pub mod config;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Repricer - Competitive price discovery and recommendation.
#[derive(Parser, Debug)]
#[command(name = "repricer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "repricer.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze competitor prices and recommend a price
    Analyze(AnalyzeArgs),

    /// Inspect or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Target product description
    #[arg(long)]
    pub product: String,

    /// Product cost (for margin math)
    #[arg(long)]
    pub cost: Decimal,

    /// Search-term variant; repeat for parallel queries (defaults to the product text)
    #[arg(long = "query")]
    pub queries: Vec<String>,

    /// Target profit margin percent (overrides the configured default)
    #[arg(long)]
    pub margin: Option<Decimal>,

    /// Target market percentile, 0-100 (overrides strategy selection)
    #[arg(long)]
    pub percentile: Option<Decimal>,

    /// Current selling price, for positioning context
    #[arg(long)]
    pub current_price: Option<Decimal>,

    /// Collection/filtering deadline in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Use the built-in sample offer set (offline, no network or API key)
    #[arg(long)]
    pub sample: bool,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Subcommands for `repricer config`
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file
    Validate,
    /// Show the effective configuration
    Show,
}
