//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during preparation and fitting
//! - rendered as text tables or JSON on stdout

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default input location, relative to the working directory.
pub const DEFAULT_CSV_PATH: &str = "raw_data/responses_with_human_coding.csv";

/// Columns that must be present before any modeling happens.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Prompt_n",
    "Temperature",
    "Role_n",
    "Shot_n",
    "Version",
    "consistency_coder_1",
    "consistency_coder_2",
    "decency_coder_1",
    "decency_coder_2",
];

/// How the categories of a factor are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Categories are fixed up front, in this order. Other values become missing.
    Fixed(&'static [&'static str]),
    /// Categories are the sorted unique values seen in the data.
    Observed,
}

/// Experimental design factor (model regressor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    Version,
    Prompt,
    Temperature,
    Role,
    Shot,
}

impl Factor {
    /// All factors in design-matrix column order.
    pub const ALL: [Factor; 5] = [
        Factor::Version,
        Factor::Prompt,
        Factor::Temperature,
        Factor::Role,
        Factor::Shot,
    ];

    /// CSV column holding this factor.
    pub fn column(self) -> &'static str {
        match self {
            Factor::Version => "Version",
            Factor::Prompt => "Prompt_n",
            Factor::Temperature => "Temperature",
            Factor::Role => "Role_n",
            Factor::Shot => "Shot_n",
        }
    }

    pub fn ordering(self) -> CategoryOrder {
        match self {
            Factor::Prompt => CategoryOrder::Fixed(&["Name", "Describe", "Simulate", "Example"]),
            Factor::Role => CategoryOrder::Fixed(&["Helpful", "Expert"]),
            Factor::Shot => CategoryOrder::Fixed(&["Zero", "One", "Few"]),
            Factor::Temperature | Factor::Version => CategoryOrder::Observed,
        }
    }
}

/// Composite rating measure modeled as an ordinal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Consistency,
    Decency,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Consistency, Outcome::Decency];

    pub fn name(self) -> &'static str {
        match self {
            Outcome::Consistency => "consistency",
            Outcome::Decency => "decency",
        }
    }

    /// The two independent rater columns averaged into this measure.
    pub fn coder_columns(self) -> [&'static str; 2] {
        match self {
            Outcome::Consistency => ["consistency_coder_1", "consistency_coder_2"],
            Outcome::Decency => ["decency_coder_1", "decency_coder_2"],
        }
    }
}

/// How fitted results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary tables.
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// Optimizer settings for a single ordinal fit.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Maximum BFGS iterations.
    pub max_iters: u64,
    /// Convergence threshold on the gradient norm of the mean negative log-likelihood.
    pub grad_tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iters: 500,
            grad_tolerance: 1e-5,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub csv_path: PathBuf,
    pub fit: FitOptions,
    pub format: OutputFormat,
}

/// Observed levels of one factor with their row counts.
#[derive(Debug, Clone, Serialize)]
pub struct FactorSummary {
    pub column: String,
    pub levels: Vec<LevelCount>,
    /// Rows whose value was missing or not a declared category.
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelCount {
    pub level: String,
    pub count: usize,
}

/// Fitted ordered-logit model for one outcome.
///
/// Parameter vectors are laid out as `[β_1..β_p, a_1..a_{K-1}]` where the
/// `a_j` are the raw threshold parameters (first cut-point, then log increments).
#[derive(Debug, Clone, Serialize)]
pub struct OrderedFit {
    pub target: String,
    /// Complete-case observations used in the fit.
    pub n_obs: usize,
    /// Rows dropped because the outcome or a factor was missing.
    pub n_dropped: usize,
    /// Sorted outcome values (ordinal levels).
    pub outcome_levels: Vec<f64>,
    /// Number of exog (β) parameters.
    pub k_exog: usize,
    pub param_names: Vec<String>,
    pub params: Vec<f64>,
    pub bse: Vec<f64>,
    pub zvalues: Vec<f64>,
    pub pvalues: Vec<f64>,
    /// Cut-points θ_j on the latent scale.
    pub cutpoints: Vec<f64>,
    pub llf: f64,
    pub llnull: f64,
    pub llr: f64,
    pub prsquared: f64,
    pub aic: f64,
    pub bic: f64,
    pub df_model: usize,
    pub df_resid: f64,
    pub iterations: u64,
    pub converged: bool,
    pub termination: String,
}

impl OrderedFit {
    /// Exog coefficient by design-column name.
    pub fn coef(&self, name: &str) -> Option<f64> {
        self.param_names[..self.k_exog]
            .iter()
            .position(|n| n == name)
            .map(|i| self.params[i])
    }
}
