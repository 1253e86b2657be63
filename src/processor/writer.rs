//! Workbook writing module for analysis results
//!
//! Persists a workbook as a directory holding one file per sheet. File
//! names carry the sheet position so the fixed sheet order survives a
//! directory listing: `1_StatusSummary.csv`, `2_RawData.csv`, ...

use crate::config::{AnalyzerConfig, CompressionAlgorithm, OutputFormat};
use crate::error::{LogAnalyzerError, Result};
use crate::export::{Workbook, WorkbookSink};

use polars::prelude::{CsvWriter, DataFrame, ParquetWriter as PolarsParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workbook writer producing CSV or Parquet sheets
#[derive(Debug, Clone)]
pub struct WorkbookWriter {
    output_dir: PathBuf,
    format: OutputFormat,
    compression: CompressionAlgorithm,
}

impl WorkbookWriter {
    /// Create a new workbook writer
    pub fn new(output_dir: PathBuf, format: OutputFormat) -> Self {
        Self {
            output_dir,
            format,
            compression: CompressionAlgorithm::Snappy,
        }
    }

    /// Create a writer from the analyzer configuration
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.output_dir.clone(), config.output_format)
            .with_compression(config.compression)
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Path of one sheet inside a workbook directory
    pub fn sheet_path(&self, workbook_dir: &Path, position: usize, sheet: &str) -> PathBuf {
        workbook_dir.join(format!(
            "{}_{}.{}",
            position + 1,
            sheet,
            self.format.extension()
        ))
    }

    fn write_sheet(&self, path: &Path, frame: &mut DataFrame) -> Result<()> {
        let file = File::create(path)?;

        match self.format {
            OutputFormat::Csv => {
                let mut file = file;
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .finish(frame)
                    .map_err(|e| LogAnalyzerError::Export {
                        path: path.to_path_buf(),
                        reason: format!("Failed to write CSV sheet: {}", e),
                    })?;
            }
            OutputFormat::Parquet => {
                PolarsParquetWriter::new(file)
                    .with_compression(self.compression.to_polars_compression())
                    .finish(frame)
                    .map_err(|e| LogAnalyzerError::Export {
                        path: path.to_path_buf(),
                        reason: format!("Failed to write parquet sheet: {}", e),
                    })?;
            }
        }

        Ok(())
    }

    /// Remove sheet files left by an earlier write, in either format
    fn clear_sheets(&self, workbook_dir: &Path) -> Result<()> {
        for entry in fs::read_dir(workbook_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() && is_sheet_file(&entry.path()) {
                debug!("Removing stale sheet {}", entry.path().display());
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

/// Whether a file name has the `<position>_<Sheet>.<csv|parquet>` shape
fn is_sheet_file(path: &Path) -> bool {
    let known_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            [OutputFormat::Csv, OutputFormat::Parquet]
                .iter()
                .any(|format| format.extension() == ext)
        });

    let positioned = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.split_once('_'))
        .is_some_and(|(position, sheet)| {
            !position.is_empty()
                && position.chars().all(|c| c.is_ascii_digit())
                && !sheet.is_empty()
        });

    known_extension && positioned
}

impl WorkbookSink for WorkbookWriter {
    fn write_workbook(&self, name: &Path, workbook: &mut Workbook) -> Result<PathBuf> {
        let workbook_dir = self.output_dir.join(name);
        fs::create_dir_all(&workbook_dir)?;
        self.clear_sheets(&workbook_dir)?;

        for (position, sheet) in workbook.sheets_mut().iter_mut().enumerate() {
            let path = self.sheet_path(&workbook_dir, position, sheet.name);
            self.write_sheet(&path, &mut sheet.frame)?;
            debug!(
                "Wrote sheet {} ({} rows) to {}",
                sheet.name,
                sheet.frame.height(),
                path.display()
            );
        }

        Ok(workbook_dir)
    }
}
