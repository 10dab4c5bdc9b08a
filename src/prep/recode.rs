//! Categorical recoding of the design factors.
//!
//! Each factor column becomes a `Categorical`: an ordered level list plus a
//! per-row level code. The level order matters downstream because the first
//! observed level is the reference category of the dummy coding.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::{CategoryOrder, Factor, FactorSummary, LevelCount};
use crate::error::AppError;
use crate::io::RawTable;

/// A recoded categorical column.
#[derive(Debug, Clone)]
pub struct Categorical {
    pub column: String,
    pub levels: Vec<String>,
    /// Level index per row; `None` when missing or not a declared category.
    pub codes: Vec<Option<usize>>,
    /// Present values that were not one of the declared categories.
    pub unrecognized: usize,
}

impl Categorical {
    /// Recode against a fixed category list. Unknown values become missing.
    pub fn with_categories(column: &str, values: &[Option<&str>], categories: &[&str]) -> Self {
        let mut unrecognized = 0usize;
        let codes = values
            .iter()
            .map(|v| {
                let v = (*v)?;
                let code = categories.iter().position(|c| *c == v);
                if code.is_none() {
                    unrecognized += 1;
                }
                code
            })
            .collect();

        Self {
            column: column.to_string(),
            levels: categories.iter().map(|c| c.to_string()).collect(),
            codes,
            unrecognized,
        }
    }

    /// Infer categories from the data: sorted unique values.
    ///
    /// When every value is numeric the sort is numeric and values equal as
    /// numbers share a level (labelled by first appearance); otherwise the sort
    /// is lexicographic.
    pub fn from_observed(column: &str, values: &[Option<&str>]) -> Self {
        let present: Vec<&str> = values.iter().flatten().copied().collect();
        let numeric: Option<Vec<f64>> = present.iter().map(|v| v.trim().parse::<f64>().ok()).collect();

        let (levels, codes): (Vec<String>, Vec<Option<usize>>) = match numeric {
            Some(nums) if nums.iter().all(|n| !n.is_nan()) => {
                let mut uniq: Vec<(f64, &str)> = Vec::new();
                for (&n, &label) in nums.iter().zip(present.iter()) {
                    if !uniq.iter().any(|(u, _)| *u == n) {
                        uniq.push((n, label));
                    }
                }
                uniq.sort_by(|a, b| a.0.total_cmp(&b.0));

                let codes = values
                    .iter()
                    .map(|v| {
                        let n = (*v)?.trim().parse::<f64>().ok()?;
                        uniq.iter().position(|(u, _)| *u == n)
                    })
                    .collect();
                let levels = uniq.iter().map(|(_, label)| label.to_string()).collect();
                (levels, codes)
            }
            _ => {
                let levels: Vec<String> = present
                    .iter()
                    .copied()
                    .collect::<BTreeSet<&str>>()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                let codes = values
                    .iter()
                    .map(|v| {
                        let v = (*v)?;
                        levels.iter().position(|l| l.as_str() == v)
                    })
                    .collect();
                (levels, codes)
            }
        };

        Self {
            column: column.to_string(),
            levels,
            codes,
            unrecognized: 0,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.codes.len()
    }

    /// Row count per level, in level order.
    pub fn level_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.levels.len()];
        for code in self.codes.iter().flatten() {
            counts[*code] += 1;
        }
        counts
    }

    pub fn summary(&self) -> FactorSummary {
        FactorSummary {
            column: self.column.clone(),
            levels: self
                .levels
                .iter()
                .zip(self.level_counts())
                .map(|(level, count)| LevelCount {
                    level: level.clone(),
                    count,
                })
                .collect(),
            missing: self.codes.iter().filter(|c| c.is_none()).count(),
        }
    }
}

/// All design factors of a table, in design-matrix order.
#[derive(Debug, Clone)]
pub struct FactorSet {
    factors: Vec<(Factor, Categorical)>,
}

impl FactorSet {
    pub fn get(&self, factor: Factor) -> &Categorical {
        // Built from `Factor::ALL`, so every factor is present.
        &self.factors[Factor::ALL.iter().position(|f| *f == factor).unwrap_or_default()].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, &Categorical)> {
        self.factors.iter().map(|(f, c)| (*f, c))
    }

    pub fn summaries(&self) -> Vec<FactorSummary> {
        self.factors.iter().map(|(_, c)| c.summary()).collect()
    }
}

/// Recode every design factor with its category ordering.
pub fn categorize_columns(table: &RawTable) -> Result<FactorSet, AppError> {
    let mut factors = Vec::with_capacity(Factor::ALL.len());

    for factor in Factor::ALL {
        let name = factor.column();
        let values = table
            .column(name)
            .ok_or_else(|| AppError::MissingColumns(vec![name.to_string()]))?;

        let cat = match factor.ordering() {
            CategoryOrder::Fixed(categories) => Categorical::with_categories(name, &values, categories),
            CategoryOrder::Observed => Categorical::from_observed(name, &values),
        };
        if cat.unrecognized > 0 {
            warn!(
                "{} value(s) in column {name} are not one of [{}] and are treated as missing",
                cat.unrecognized,
                cat.levels.join(", ")
            );
        }
        factors.push((factor, cat));
    }

    Ok(FactorSet { factors })
}
