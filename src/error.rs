//! Application error type.
//!
//! Every failure aborts the single linear run, so each variant carries the
//! process exit code the binary should report.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("The file {} was not found.", .path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied when reading the file {}.", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("An error occurred while reading the file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("The following required columns are missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not enough data: {0}")]
    InsufficientData(String),

    #[error("Model fitting failed for target {target}: {message}")]
    Fit { target: String, message: String },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::NotFound { .. }
            | AppError::PermissionDenied { .. }
            | AppError::Read { .. }
            | AppError::MissingColumns(_)
            | AppError::InvalidData(_)
            | AppError::Write { .. }
            | AppError::Json(_) => 2,
            AppError::InsufficientData(_) => 3,
            AppError::Fit { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_column() {
        let err = AppError::MissingColumns(vec!["Role_n".into(), "Shot_n".into()]);
        assert_eq!(
            err.to_string(),
            "The following required columns are missing: Role_n, Shot_n"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_codes_follow_failure_stage() {
        assert_eq!(AppError::InsufficientData("x".into()).exit_code(), 3);
        let fit = AppError::Fit {
            target: "decency".into(),
            message: "boom".into(),
        };
        assert_eq!(fit.exit_code(), 4);
    }
}
