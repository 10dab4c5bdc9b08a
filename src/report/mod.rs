//! Reporting: text summaries and the JSON rendering of a run.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::{FactorSummary, OrderedFit};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    input: &'a str,
    rows: usize,
    factors: &'a [FactorSummary],
    models: &'a [OrderedFit],
}

/// Render a whole run as pretty JSON. Non-finite numbers become `null`.
pub fn render_json(
    input: &str,
    rows: usize,
    factors: &[FactorSummary],
    models: &[OrderedFit],
) -> Result<String, AppError> {
    let report = JsonReport {
        input,
        rows,
        factors,
        models,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LevelCount;

    #[test]
    fn json_report_includes_factors() {
        let factors = vec![FactorSummary {
            column: "Role_n".into(),
            levels: vec![LevelCount {
                level: "Helpful".into(),
                count: 2,
            }],
            missing: 0,
        }];
        let json = render_json("in.csv", 2, &factors, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["factors"][0]["levels"][0]["level"], "Helpful");
        assert!(value["models"].as_array().unwrap().is_empty());
    }
}
