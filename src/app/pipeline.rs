//! The analysis pipeline shared by the binary and the tests.
//!
//! read -> validate -> recode -> aggregate -> fit (one model per outcome)
//!
//! Any failure aborts the run; there is no partial result.

use std::path::PathBuf;

use crate::domain::{FactorSummary, FitOptions, OrderedFit, Outcome, REQUIRED_COLUMNS, RunConfig};
use crate::error::AppError;
use crate::fit::fit_ordered_logit;
use crate::io::{RawTable, read_csv_file, validate_data};
use crate::models::ModelFrame;
use crate::prep::{FactorSet, MeanRatings, calculate_mean_ratings, categorize_columns};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: PathBuf,
    pub n_rows: usize,
    pub factors: Vec<FactorSummary>,
    pub fits: Vec<OrderedFit>,
}

/// Execute the full pipeline on the configured CSV.
pub fn run_pipeline(config: &RunConfig) -> Result<RunOutput, AppError> {
    let table = read_csv_file(&config.csv_path)?;
    run_pipeline_on_table(&table, &config.fit)
}

/// Execute the pipeline on an already-read table.
pub fn run_pipeline_on_table(table: &RawTable, opts: &FitOptions) -> Result<RunOutput, AppError> {
    validate_data(table, &REQUIRED_COLUMNS)?;

    let factors = categorize_columns(table)?;
    let ratings = calculate_mean_ratings(table)?;

    let fits = Outcome::ALL
        .iter()
        .map(|&outcome| build_and_fit_model(&factors, &ratings, outcome, opts))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RunOutput {
        source: table.path.clone(),
        n_rows: table.n_rows(),
        factors: factors.summaries(),
        fits,
    })
}

/// Fit the ordinal model for one outcome against all design factors.
pub fn build_and_fit_model(
    factors: &FactorSet,
    ratings: &MeanRatings,
    outcome: Outcome,
    opts: &FitOptions,
) -> Result<OrderedFit, AppError> {
    let frame = ModelFrame::build(factors, ratings.get(outcome), outcome.name())?;
    fit_ordered_logit(&frame, opts)
}
