//! Model frame assembly: complete cases, dummy coding and outcome levels.
//!
//! The frame is what the likelihood sees:
//! - `exog`: an `n × p` treatment-coded design matrix without intercept (the
//!   ordinal thresholds play that role)
//! - `endog`: outcome level index per row (`0..K`)
//! - `levels`: the sorted distinct outcome values

use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::prep::FactorSet;

#[derive(Debug, Clone)]
pub struct ModelFrame {
    pub target: String,
    pub exog: DMatrix<f64>,
    pub exog_names: Vec<String>,
    pub endog: Vec<usize>,
    pub levels: Vec<f64>,
    /// Rows removed because the outcome or a factor was missing.
    pub n_dropped: usize,
}

impl ModelFrame {
    /// Build the frame for one outcome.
    ///
    /// Rows with a missing outcome or any missing factor are dropped. For each
    /// factor the first level with observations is the reference; every other
    /// observed level gets a 0/1 column named `Column[T.level]`.
    pub fn build(factors: &FactorSet, outcome: &[Option<f64>], target: &str) -> Result<Self, AppError> {
        let rows: Vec<usize> = (0..outcome.len())
            .filter(|&i| outcome[i].is_some() && factors.iter().all(|(_, c)| c.codes[i].is_some()))
            .collect();
        let n_dropped = outcome.len() - rows.len();
        if n_dropped > 0 {
            warn!("{target}: dropping {n_dropped} row(s) with a missing outcome or design factor");
        }
        if rows.is_empty() {
            return Err(AppError::InsufficientData(format!(
                "no complete rows remain for target {target}"
            )));
        }

        // Columns: (factor index, level code) pairs, plus their names.
        let mut columns: Vec<(usize, usize)> = Vec::new();
        let mut exog_names = Vec::new();
        for (fi, (_, cat)) in factors.iter().enumerate() {
            let mut counts = vec![0usize; cat.levels.len()];
            for &i in &rows {
                if let Some(code) = cat.codes[i] {
                    counts[code] += 1;
                }
            }

            let unobserved: Vec<&str> = cat
                .levels
                .iter()
                .zip(&counts)
                .filter(|(_, n)| **n == 0)
                .map(|(l, _)| l.as_str())
                .collect();
            if !unobserved.is_empty() {
                warn!(
                    "{target}: column {} has no observations for level(s) [{}]",
                    cat.column,
                    unobserved.join(", ")
                );
            }

            let observed: Vec<usize> = (0..cat.levels.len()).filter(|&l| counts[l] > 0).collect();
            for &level in observed.iter().skip(1) {
                columns.push((fi, level));
                exog_names.push(format!("{}[T.{}]", cat.column, cat.levels[level]));
            }
        }

        let cats: Vec<_> = factors.iter().map(|(_, c)| c).collect();
        let exog = DMatrix::from_fn(rows.len(), columns.len(), |r, c| {
            let (fi, level) = columns[c];
            if cats[fi].codes[rows[r]] == Some(level) { 1.0 } else { 0.0 }
        });

        let values: Vec<f64> = rows.iter().filter_map(|&i| outcome[i]).collect();
        let mut levels = values.clone();
        levels.sort_by(f64::total_cmp);
        levels.dedup();
        if levels.len() < 2 {
            return Err(AppError::InsufficientData(format!(
                "target {target} has {} distinct value(s); an ordinal model needs at least 2",
                levels.len()
            )));
        }
        let endog: Vec<usize> = values
            .iter()
            .map(|v| levels.iter().position(|l| l == v).unwrap_or_default())
            .collect();

        let k_params = columns.len() + levels.len() - 1;
        if rows.len() <= k_params {
            return Err(AppError::InsufficientData(format!(
                "target {target} has {} complete row(s) for {k_params} parameters",
                rows.len()
            )));
        }

        debug!(
            outcome = target,
            n_obs = rows.len(),
            k_exog = columns.len(),
            k_levels = levels.len(),
            "model frame built"
        );

        Ok(Self {
            target: target.to_string(),
            exog,
            exog_names,
            endog,
            levels,
            n_dropped,
        })
    }

    pub fn n_obs(&self) -> usize {
        self.endog.len()
    }

    pub fn k_exog(&self) -> usize {
        self.exog.ncols()
    }

    pub fn k_levels(&self) -> usize {
        self.levels.len()
    }

    /// Observations per outcome level.
    pub fn level_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.levels.len()];
        for &k in &self.endog {
            counts[k] += 1;
        }
        counts
    }
}
