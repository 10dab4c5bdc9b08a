//! Synthetic survey responses with known design effects.
//!
//! Each row draws every design factor uniformly, computes a latent score from
//! fixed per-level effects plus standard logistic noise, and cuts it into a
//! 1–5 rating. The two coders agree most of the time; the second coder
//! sometimes disagrees by one point or leaves the rating blank.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::info;

use crate::domain::{Outcome, REQUIRED_COLUMNS};
use crate::error::AppError;

const VERSIONS: [&str; 2] = ["v1", "v2"];
const PROMPTS: [&str; 4] = ["Name", "Describe", "Simulate", "Example"];
const TEMPERATURES: [&str; 3] = ["0.0", "0.7", "1.0"];
const ROLES: [&str; 2] = ["Helpful", "Expert"];
const SHOTS: [&str; 3] = ["Zero", "One", "Few"];

/// Latent-scale cut-points between ratings 1|2, 2|3, 3|4 and 4|5.
const CUTS: [f64; 4] = [-0.5, 1.0, 2.5, 4.0];

/// Probability that the second coder's rating is off by one.
const DISAGREE_PROB: f64 = 0.2;

/// Generator settings.
#[derive(Debug, Clone, Copy)]
pub struct SynthConfig {
    pub rows: usize,
    pub seed: u64,
    /// Probability that the second coder's rating is missing.
    pub missing_rate: f64,
}

/// Per-level latent effects for one outcome (first level of each factor is 0).
#[derive(Debug, Clone, Copy)]
pub struct TrueEffects {
    pub version: [f64; 2],
    pub prompt: [f64; 4],
    pub temperature: [f64; 3],
    pub role: [f64; 2],
    pub shot: [f64; 3],
}

impl TrueEffects {
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Consistency => Self {
                version: [0.0, 0.4],
                prompt: [0.0, 0.5, 1.0, 1.5],
                temperature: [0.0, -0.3, -1.2],
                role: [0.0, 0.8],
                shot: [0.0, 0.4, 0.9],
            },
            Outcome::Decency => Self {
                version: [0.0, -0.5],
                prompt: [0.0, 0.2, -0.4, 0.6],
                temperature: [0.0, 0.0, -0.5],
                role: [0.0, 1.2],
                shot: [0.0, 0.1, 0.3],
            },
        }
    }

    fn latent(&self, idx: &[usize; 5]) -> f64 {
        self.version[idx[0]] + self.prompt[idx[1]] + self.temperature[idx[2]] + self.role[idx[3]] + self.shot[idx[4]]
    }
}

/// One generated response, as CSV cells in `REQUIRED_COLUMNS` order.
#[derive(Debug, Clone)]
pub struct SynthRow {
    pub cells: [String; 9],
}

/// Generate synthetic responses.
pub fn generate_responses(config: &SynthConfig) -> Result<Vec<SynthRow>, AppError> {
    if config.rows == 0 {
        return Err(AppError::InvalidData("row count must be > 0".to_string()));
    }
    if !(0.0..1.0).contains(&config.missing_rate) {
        return Err(AppError::InvalidData(format!(
            "missing rate must be in [0, 1), got {}",
            config.missing_rate
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let consistency = TrueEffects::for_outcome(Outcome::Consistency);
    let decency = TrueEffects::for_outcome(Outcome::Decency);

    let mut rows = Vec::with_capacity(config.rows);
    for _ in 0..config.rows {
        let idx = [
            rng.gen_range(0..VERSIONS.len()),
            rng.gen_range(0..PROMPTS.len()),
            rng.gen_range(0..TEMPERATURES.len()),
            rng.gen_range(0..ROLES.len()),
            rng.gen_range(0..SHOTS.len()),
        ];

        let [c1, c2] = coder_pair(&mut rng, consistency.latent(&idx), config.missing_rate);
        let [d1, d2] = coder_pair(&mut rng, decency.latent(&idx), config.missing_rate);

        rows.push(SynthRow {
            cells: [
                PROMPTS[idx[1]].to_string(),
                TEMPERATURES[idx[2]].to_string(),
                ROLES[idx[3]].to_string(),
                SHOTS[idx[4]].to_string(),
                VERSIONS[idx[0]].to_string(),
                c1,
                c2,
                d1,
                d2,
            ],
        });
    }

    Ok(rows)
}

/// Write rows as CSV with the input header.
pub fn write_csv<W: Write>(writer: W, rows: &[SynthRow]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(REQUIRED_COLUMNS)?;
    for row in rows {
        w.write_record(&row.cells)?;
    }
    w.flush()?;
    Ok(())
}

/// Generate a dataset and write it to `path`.
pub fn write_synthetic_csv(path: &Path, config: &SynthConfig) -> Result<usize, AppError> {
    let rows = generate_responses(config)?;
    let write_err = |message: String| AppError::Write {
        path: path.to_path_buf(),
        message,
    };

    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    write_csv(file, &rows).map_err(|e| write_err(e.to_string()))?;

    info!("Wrote {} synthetic responses to {}", rows.len(), path.display());
    Ok(rows.len())
}

fn coder_pair(rng: &mut StdRng, latent: f64, missing_rate: f64) -> [String; 2] {
    let u: f64 = rng.gen_range(f64::EPSILON..1.0);
    let y_star = latent + (u / (1.0 - u)).ln();
    let rating = 1 + CUTS.iter().filter(|&&c| y_star > c).count() as i64;

    let second = if rng.gen_bool(missing_rate) {
        String::new()
    } else if rng.gen_bool(DISAGREE_PROB) {
        let delta = if rng.gen_bool(0.5) { 1 } else { -1 };
        (rating + delta).clamp(1, 5).to_string()
    } else {
        rating.to_string()
    };

    [rating.to_string(), second]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RawTable;

    fn config(rows: usize, seed: u64) -> SynthConfig {
        SynthConfig {
            rows,
            seed,
            missing_rate: 0.1,
        }
    }

    #[test]
    fn same_seed_same_rows() {
        let a = generate_responses(&config(50, 7)).unwrap();
        let b = generate_responses(&config(50, 7)).unwrap();
        let a: Vec<_> = a.into_iter().map(|r| r.cells).collect();
        let b: Vec<_> = b.into_iter().map(|r| r.cells).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn ratings_stay_on_the_scale() {
        let rows = generate_responses(&config(500, 3)).unwrap();
        for row in &rows {
            for cell in &row.cells[5..] {
                if cell.is_empty() {
                    continue;
                }
                let v: i64 = cell.parse().unwrap();
                assert!((1..=5).contains(&v));
            }
        }
    }

    #[test]
    fn written_csv_reads_back_with_full_schema() {
        let rows = generate_responses(&config(20, 1)).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();

        let table = RawTable::from_reader(buf.as_slice(), "synth.csv").unwrap();
        assert_eq!(table.n_rows(), 20);
        for col in REQUIRED_COLUMNS {
            assert!(table.has_column(col), "{col}");
        }
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(generate_responses(&config(0, 1)).is_err());
        let bad = SynthConfig {
            rows: 10,
            seed: 1,
            missing_rate: 1.0,
        };
        assert!(generate_responses(&bad).is_err());
    }
}
