use std::io::Write;

use ordinal_ratings::app::pipeline::run_pipeline;
use ordinal_ratings::data::{SynthConfig, write_synthetic_csv};
use ordinal_ratings::domain::{FitOptions, OutputFormat, RunConfig};
use ordinal_ratings::error::AppError;
use ordinal_ratings::report::{format_fit_summary, render_json};
use tempfile::TempDir;

fn config_for(path: std::path::PathBuf) -> RunConfig {
    RunConfig {
        csv_path: path,
        fit: FitOptions::default(),
        format: OutputFormat::Text,
    }
}

#[test]
fn fits_both_outcomes_on_synthetic_responses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("responses.csv");
    let synth = SynthConfig {
        rows: 1500,
        seed: 11,
        missing_rate: 0.05,
    };
    assert_eq!(write_synthetic_csv(&path, &synth).unwrap(), 1500);

    let run = run_pipeline(&config_for(path)).unwrap();
    assert_eq!(run.n_rows, 1500);
    assert_eq!(run.factors.len(), 5);
    assert_eq!(run.fits.len(), 2);

    let consistency = &run.fits[0];
    let decency = &run.fits[1];
    assert_eq!(consistency.target, "consistency");
    assert_eq!(decency.target, "decency");

    for fit in &run.fits {
        assert!(fit.converged, "{}: {}", fit.target, fit.termination);
        assert_eq!(fit.n_obs + fit.n_dropped, 1500);
        assert!(fit.llf > fit.llnull);
        assert_eq!(fit.k_exog, 9);
        assert!(fit.bse.iter().all(|se| se.is_finite()));
        assert!(fit.cutpoints.windows(2).all(|w| w[0] < w[1]));
    }

    // Generating effects: Expert +0.8 / +1.2, high temperature -1.2 on consistency.
    assert!(consistency.coef("Role_n[T.Expert]").unwrap() > 0.3);
    assert!(decency.coef("Role_n[T.Expert]").unwrap() > 0.5);
    assert!(consistency.coef("Temperature[T.1.0]").unwrap() < -0.5);
    assert!(consistency.coef("Prompt_n[T.Example]").unwrap() > 0.5);

    let text = format_fit_summary(consistency, chrono::Local::now());
    assert!(text.contains("Shot_n[T.Few]"));
    let json = render_json("responses.csv", run.n_rows, &run.factors, &run.fits).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["models"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_required_column_is_rejected_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Prompt_n,Temperature,Role_n,Shot_n,consistency_coder_1,consistency_coder_2,decency_coder_1,decency_coder_2").unwrap();
    writeln!(file, "Name,0.7,Helpful,Zero,3,3,4,4").unwrap();
    drop(file);

    let err = run_pipeline(&config_for(path)).unwrap_err();
    match err {
        AppError::MissingColumns(cols) => assert_eq!(cols, vec!["Version".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_inputs_abort_the_run() {
    let dir = TempDir::new().unwrap();

    let err = run_pipeline(&config_for(dir.path().join("missing.csv"))).unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = run_pipeline(&config_for(dir.path().to_path_buf())).unwrap_err();
    assert!(matches!(
        err,
        AppError::Read { .. } | AppError::PermissionDenied { .. }
    ));
}
