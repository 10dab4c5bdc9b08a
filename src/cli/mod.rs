//! Command-line parsing for the ordinal rating models.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! preparation and modeling code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_CSV_PATH, OutputFormat};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ordfit",
    version,
    about = "Ordinal logit models of coder ratings against prompt design factors"
)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read, validate and prepare the responses, then fit one model per outcome.
    Fit(FitArgs),
    /// Write a synthetic response CSV with known design effects.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Response CSV with design factors and coder ratings.
    #[arg(long, env = "ORDFIT_CSV", default_value = DEFAULT_CSV_PATH)]
    pub csv: PathBuf,

    /// Maximum BFGS iterations per model.
    #[arg(long, default_value_t = 500)]
    pub max_iters: u64,

    /// Gradient-norm convergence tolerance.
    #[arg(long, default_value_t = 1e-5)]
    pub gtol: f64,

    /// Output format for the fitted models.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// Destination CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of responses to generate.
    #[arg(short = 'n', long, default_value_t = 600)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability that the second coder's rating is left blank.
    #[arg(long, default_value_t = 0.05)]
    pub missing_rate: f64,
}
