//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the logger
//! - runs the pipeline and prints the fitted models
//! - writes synthetic datasets on request

use chrono::Local;
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, FitArgs, SimulateArgs};
use crate::data::{SynthConfig, write_synthetic_csv};
use crate::domain::{FitOptions, OutputFormat, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ordfit` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    crate::logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    info!("Fitting ordinal models from {}", config.csv_path.display());

    let run = pipeline::run_pipeline(&config)?;
    let source = run.source.display().to_string();

    match config.format {
        OutputFormat::Text => {
            print!(
                "{}",
                crate::report::format_dataset_summary(&source, run.n_rows, &run.factors)
            );
            let now = Local::now();
            for fit in &run.fits {
                print!("{}", crate::report::format_fit_summary(fit, now));
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                crate::report::render_json(&source, run.n_rows, &run.factors, &run.fits)?
            );
        }
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = SynthConfig {
        rows: args.rows,
        seed: args.seed,
        missing_rate: args.missing_rate,
    };
    let n = write_synthetic_csv(&args.out, &config)?;
    println!("Wrote {n} rows to {}", args.out.display());
    Ok(())
}

pub fn run_config_from_args(args: &FitArgs) -> RunConfig {
    RunConfig {
        csv_path: args.csv.clone(),
        fit: FitOptions {
            max_iters: args.max_iters,
            grad_tolerance: args.gtol,
        },
        format: args.format,
    }
}

/// Rewrite argv so `ordfit` defaults to `ordfit fit`.
///
/// Rules:
/// - `ordfit`                      -> `ordfit fit`
/// - `ordfit --csv x.csv ...`      -> `ordfit fit --csv x.csv ...`
/// - `ordfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "simulate");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_means_fit() {
        assert_eq!(rewrite_args(args(&["ordfit"])), args(&["ordfit", "fit"]));
        assert_eq!(
            rewrite_args(args(&["ordfit", "--csv", "a.csv"])),
            args(&["ordfit", "fit", "--csv", "a.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        for argv in [
            args(&["ordfit", "simulate", "--out", "x.csv"]),
            args(&["ordfit", "fit"]),
            args(&["ordfit", "--help"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn defaults_match_the_research_layout() {
        let cli = Cli::parse_from(rewrite_args(args(&["ordfit"])));
        let Command::Fit(fit) = cli.command else {
            panic!("expected fit");
        };
        let config = run_config_from_args(&fit);
        assert_eq!(config.fit.max_iters, 500);
        assert_eq!(config.format, OutputFormat::Text);
        // ORDFIT_CSV may be set in the environment; only check the default otherwise.
        if std::env::var_os("ORDFIT_CSV").is_none() {
            assert_eq!(
                config.csv_path,
                std::path::PathBuf::from("raw_data/responses_with_human_coding.csv")
            );
        }
    }

    #[test]
    fn simulate_arguments_parse() {
        let cli = Cli::parse_from(args(&["ordfit", "-v", "simulate", "--out", "s.csv", "-n", "50"]));
        assert!(cli.verbose);
        let Command::Simulate(sim) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(sim.rows, 50);
        assert_eq!(sim.seed, 42);
    }
}
