//! Configuration management and validation.
//!
//! Provides the output settings used when writing analysis workbooks:
//! sheet file format, Parquet compression and terminal preview size.

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_PREVIEW_ROWS};
use crate::error::{LogAnalyzerError, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// File format used for each workbook sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One CSV file per sheet
    Csv,
    /// One Parquet file per sheet
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LogAnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(LogAnalyzerError::Configuration {
                message: format!("Unknown output format '{}' (expected csv or parquet)", other),
            }),
        }
    }
}

/// Supported compression algorithms for parquet sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = LogAnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(LogAnalyzerError::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Global configuration for IIS log analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory receiving one workbook per analysed log file
    pub output_dir: PathBuf,

    /// Sheet file format
    pub output_format: OutputFormat,

    /// Compression for parquet sheets
    pub compression: CompressionAlgorithm,

    /// Raw rows shown in the terminal preview (0 disables the preview)
    pub preview_rows: usize,

    /// Print the status distribution and hourly timeline after each file
    pub show_traffic: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_format: OutputFormat::Csv,
            compression: CompressionAlgorithm::Snappy,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            show_traffic: true,
        }
    }
}

impl AnalyzerConfig {
    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the sheet file format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the parquet compression algorithm
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Set the number of preview rows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Suppress the terminal report
    pub fn without_report(mut self) -> Self {
        self.preview_rows = 0;
        self.show_traffic = false;
        self
    }

    /// Check the configuration before any file is processed
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(LogAnalyzerError::Configuration {
                message: "Output directory must not be empty".to_string(),
            });
        }
        if self.output_dir.is_file() {
            return Err(LogAnalyzerError::Configuration {
                message: format!(
                    "Output directory {} is an existing file",
                    self.output_dir.display()
                ),
            });
        }
        Ok(())
    }
}
