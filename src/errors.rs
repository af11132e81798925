use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("error reading spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("missing required column `{column}` in {file}")]
    MissingColumn { file: String, column: String },

    #[error("error initializing Config: {0}")]
    ConfigError(String),

    #[error("error parsing env value: {0}")]
    EnvError(String),

    #[error("error building mail backend: {0}")]
    Mailer(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Failure to turn one load row into a record. Rows are 1-based with the
/// header on row 1, matching what the spreadsheet shows.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("row {row}: missing value for `{column}`")]
    MissingField { row: usize, column: String },

    #[error("row {row}: invalid value `{value}` for `{column}`")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
    },
}

impl RowError {
    pub fn row(&self) -> usize {
        match self {
            RowError::MissingField { row, .. } | RowError::InvalidField { row, .. } => *row,
        }
    }
}
