//! Composite rating measures.
//!
//! Each outcome is the mean of two independent coder ratings, skipping missing
//! ratings, rounded to the nearest integer with ties going to the even value.

use crate::domain::Outcome;
use crate::error::AppError;
use crate::io::RawTable;

/// Mean of the available ratings, rounded half-to-even.
///
/// Returns `None` when neither rating is present.
pub fn mean_rating(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let present: Vec<f64> = [a, b].into_iter().flatten().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return None;
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    Some(mean.round_ties_even())
}

/// Rounded mean ratings per row, for every outcome.
#[derive(Debug, Clone)]
pub struct MeanRatings {
    pub consistency: Vec<Option<f64>>,
    pub decency: Vec<Option<f64>>,
}

impl MeanRatings {
    pub fn get(&self, outcome: Outcome) -> &[Option<f64>] {
        match outcome {
            Outcome::Consistency => &self.consistency,
            Outcome::Decency => &self.decency,
        }
    }
}

/// Derive the composite consistency and decency measures.
pub fn calculate_mean_ratings(table: &RawTable) -> Result<MeanRatings, AppError> {
    Ok(MeanRatings {
        consistency: outcome_ratings(table, Outcome::Consistency)?,
        decency: outcome_ratings(table, Outcome::Decency)?,
    })
}

fn outcome_ratings(table: &RawTable, outcome: Outcome) -> Result<Vec<Option<f64>>, AppError> {
    let [col_a, col_b] = outcome.coder_columns();
    let a = numeric_column(table, col_a)?;
    let b = numeric_column(table, col_b)?;
    Ok(a.into_iter().zip(b).map(|(a, b)| mean_rating(a, b)).collect())
}

fn numeric_column(table: &RawTable, name: &str) -> Result<Vec<Option<f64>>, AppError> {
    let cells = table
        .column(name)
        .ok_or_else(|| AppError::MissingColumns(vec![name.to_string()]))?;

    cells
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(text) => text.trim().parse::<f64>().map(Some).map_err(|_| {
                AppError::InvalidData(format!(
                    "column {name}, line {}: '{text}' is not a numeric rating",
                    table.line(row)
                ))
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_both_ratings() {
        assert_eq!(mean_rating(Some(3.0), Some(5.0)), Some(4.0));
        assert_eq!(mean_rating(Some(4.0), Some(4.0)), Some(4.0));
    }

    #[test]
    fn skips_missing_ratings() {
        assert_eq!(mean_rating(Some(3.0), None), Some(3.0));
        assert_eq!(mean_rating(None, Some(2.0)), Some(2.0));
        assert_eq!(mean_rating(Some(f64::NAN), Some(2.0)), Some(2.0));
        assert_eq!(mean_rating(None, None), None);
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(mean_rating(Some(2.0), Some(3.0)), Some(2.0));
        assert_eq!(mean_rating(Some(3.0), Some(4.0)), Some(4.0));
        assert_eq!(mean_rating(Some(1.0), Some(2.0)), Some(2.0));
        assert_eq!(mean_rating(Some(4.0), Some(5.0)), Some(4.0));
        assert_eq!(mean_rating(Some(3.2), Some(3.4)), Some(3.0));
    }

    #[test]
    fn derives_both_outcomes_from_table() {
        let csv = "Prompt_n,consistency_coder_1,consistency_coder_2,decency_coder_1,decency_coder_2\n\
                   Name,1,2,5,\n\
                   Name,NA,,4,3\n";
        let table = RawTable::from_reader(csv.as_bytes(), "t.csv").unwrap();
        let ratings = calculate_mean_ratings(&table).unwrap();
        assert_eq!(ratings.get(Outcome::Consistency), &[Some(2.0), None]);
        assert_eq!(ratings.get(Outcome::Decency), &[Some(5.0), Some(4.0)]);
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let csv = "consistency_coder_1,consistency_coder_2,decency_coder_1,decency_coder_2\n\
                   3,high,1,1\n";
        let table = RawTable::from_reader(csv.as_bytes(), "t.csv").unwrap();
        let err = calculate_mean_ratings(&table).unwrap_err();
        assert!(matches!(err, AppError::InvalidData(ref m) if m.contains("consistency_coder_2, line 2")));
    }
}
