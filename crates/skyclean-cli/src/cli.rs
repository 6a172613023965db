//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use skyclean::config::{DEFAULT_FLIGHTS_PATH, DEFAULT_LOYALTY_PATH, DEFAULT_OUTPUT_PATH};

/// skyclean: join and clean airline loyalty datasets
#[derive(Parser)]
#[command(name = "skyclean")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `clean` with the standard data paths
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full cleaning pipeline and export the cleaned table
    Clean(CleanArgs),

    /// Show the detected join key, correspondence and strategy without cleaning
    Plan(SourceArgs),
}

/// The two input datasets.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Flight activity file (CSV/TSV)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_FLIGHTS_PATH)]
    pub flights: PathBuf,

    /// Loyalty history file (CSV/TSV)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_LOYALTY_PATH)]
    pub loyalty: PathBuf,
}

impl Default for SourceArgs {
    fn default() -> Self {
        Self {
            flights: PathBuf::from(DEFAULT_FLIGHTS_PATH),
            loyalty: PathBuf::from(DEFAULT_LOYALTY_PATH),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output path for the cleaned table
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Also write the step-by-step run report as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Default for CleanArgs {
    fn default() -> Self {
        Self {
            sources: SourceArgs::default(),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            report: None,
        }
    }
}
