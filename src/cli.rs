//! Command-line interface components.

use crate::config::{AnalyzerConfig, CompressionAlgorithm, OutputFormat};
use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_PREVIEW_ROWS};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "iis-log-analyzer")]
#[command(about = "Summarise IIS (W3C Extended) access logs into status, endpoint and error tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// IIS log file, or directory searched for .log files
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving one workbook per log file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Sheet file format (csv, parquet)
    #[arg(short, long, default_value = "csv")]
    pub format: String,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Raw data rows to preview after each file (0 disables the preview)
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview: usize,

    /// Skip the status distribution and hourly timeline
    #[arg(long)]
    pub no_traffic: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build the analyzer configuration from the arguments
    pub fn to_config(&self) -> crate::Result<AnalyzerConfig> {
        let format: OutputFormat = self.format.parse()?;
        let compression: CompressionAlgorithm = self.compression.parse()?;

        let mut config = AnalyzerConfig::default()
            .with_output_dir(self.output_dir.clone())
            .with_output_format(format)
            .with_compression(compression)
            .with_preview_rows(self.preview);
        config.show_traffic = !self.no_traffic;

        Ok(config)
    }
}
