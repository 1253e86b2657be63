//! Error handling for IIS log analysis.
//!
//! Provides the error types surfaced by parsing, aggregation and export.
//! Optional tables that cannot be built are not errors; they are `None`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid IIS log format: {reason}")]
    Format { reason: String },

    #[error("Required columns not found in log data: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Export failed for {path} - {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl LogAnalyzerError {
    /// Create a format error
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    /// Create a missing columns error from the absent column names
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumns {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogAnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_columns() {
        let err = LogAnalyzerError::missing_columns(["sc-status", "time-taken"]);
        assert_eq!(
            err.to_string(),
            "Required columns not found in log data: sc-status, time-taken"
        );
    }

    #[test]
    fn test_format_error_message() {
        let err = LogAnalyzerError::format("no data found");
        assert_eq!(err.to_string(), "Invalid IIS log format: no data found");
    }
}
