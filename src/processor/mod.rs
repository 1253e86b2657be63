//! Main processing engine with modular architecture.
//!
//! Runs the analysis pipeline (parse, coerce, aggregate, export) for one
//! log file or every log file below a directory. Files are analysed one at
//! a time and independently; nothing is merged across files.

pub mod discovery;
pub mod report;
pub mod writer;

use self::{discovery::FileDiscovery, writer::WorkbookWriter};

use crate::aggregation::{
    EndpointStatusPivot, ErrorRollup, StatusSummary, build_endpoint_status_pivot,
    build_error_rollup, build_status_summary,
};
use crate::coercion::{CoercedTable, coerce_table};
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::export::{Workbook, WorkbookSink};
use crate::models::{ParseStats, ProcessingStats};
use crate::parser::parse_log;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything derived from one log file
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub parse_stats: ParseStats,
    pub table: CoercedTable,
    pub summary: StatusSummary,
    pub pivot: Option<EndpointStatusPivot>,
    pub errors: Option<ErrorRollup>,
}

impl AnalysisReport {
    /// Assemble the export workbook in its fixed sheet order
    pub fn workbook(&self) -> Result<Workbook> {
        Workbook::from_tables(
            &self.summary,
            &self.table,
            self.pivot.as_ref(),
            self.errors.as_ref(),
        )
    }
}

/// Analyse the raw content of one log file
///
/// Fails when the content is not a usable W3C log or lacks the columns the
/// status summary needs. A missing pivot or error rollup is not a failure.
pub fn analyze_bytes(content: &[u8]) -> Result<AnalysisReport> {
    let parsed = parse_log(content)?;
    let table = coerce_table(&parsed.table);

    let summary = build_status_summary(&table)?;
    let pivot = build_endpoint_status_pivot(&table);
    let errors = build_error_rollup(&table);

    if pivot.is_none() {
        debug!("Pivot table skipped: sc-status or cs-uri-stem not in log");
    }

    Ok(AnalysisReport {
        parse_stats: parsed.stats,
        table,
        summary,
        pivot,
        errors,
    })
}

/// Read and analyse one log file
pub fn analyze_file(path: &Path) -> Result<AnalysisReport> {
    let content = std::fs::read(path)?;
    analyze_bytes(&content)
}

/// Main processor for IIS log analysis
#[derive(Debug)]
pub struct LogProcessor {
    input_path: PathBuf,
    config: AnalyzerConfig,
    file_discovery: FileDiscovery,
    writer: WorkbookWriter,
}

impl LogProcessor {
    /// Create a new processor for a log file or a directory of log files
    pub fn new(input_path: PathBuf, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            file_discovery: FileDiscovery::new(input_path.clone()),
            writer: WorkbookWriter::from_config(&config),
            input_path,
            config,
        })
    }

    /// Main processing entry point
    ///
    /// A single-file input propagates its failure. With a directory input a
    /// failing file is reported and counted, and the remaining files still run.
    pub fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let files = self.file_discovery.discover_log_files()?;
        let single_file = self.input_path.is_file();

        println!("{}", "Starting IIS log analysis".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.config.output_dir.display()
        );
        println!(
            "  {} {} log files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let mut stats = ProcessingStats::default();

        let progress = if files.len() > 1 {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        for file in &files {
            progress.set_message(file_label(file));

            match self.process_file(file) {
                Ok((analysis, output)) => {
                    stats.files_processed += 1;
                    stats.total_rows += analysis.table.row_count();
                    stats.malformed_lines += analysis.parse_stats.malformed_lines;
                    stats.outputs.push(output);

                    progress.suspend(|| report::print_report(file, &analysis, &self.config));
                }
                Err(error) if single_file => return Err(error),
                Err(error) => {
                    warn!("Failed to analyse {}: {}", file.display(), error);
                    progress.suspend(|| {
                        eprintln!(
                            "  {} {}: {}",
                            "Failed".bright_red(),
                            file.display(),
                            error
                        )
                    });
                    stats.files_failed += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_and_clear();
        stats.processing_time = start_time.elapsed();

        report::print_summary(&stats);

        Ok(stats)
    }

    /// Analyse one file and write its workbook
    pub fn process_file(&self, path: &Path) -> Result<(AnalysisReport, PathBuf)> {
        let report = analyze_file(path)?;
        let mut workbook = report.workbook()?;

        let name = workbook_name(&self.input_path, path);
        let output = self.writer.write_workbook(&name, &mut workbook)?;

        info!(
            "Analysed {}: {} rows, {} statuses, workbook at {}",
            path.display(),
            report.table.row_count(),
            report.summary.len(),
            output.display()
        );

        Ok((report, output))
    }
}

/// Workbook location for a log file, relative to the output directory
///
/// Mirrors the file's place below the input root and keeps its full file
/// name, so `logs/W3SVC1/u_ex240101.log` under `logs` becomes
/// `W3SVC1/u_ex240101.log`. Distinct input files never share a workbook.
pub fn workbook_name(input_root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(input_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("log")),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogAnalyzerError;
    use std::fs;
    use tempfile::TempDir;

    const LOG: &str = "#Software: Microsoft Internet Information Services 10.0\n\
#Fields: date time cs-uri-stem sc-status time-taken\n\
2024-01-01 00:00:00 /a 200 10\n\
2024-01-01 00:00:01 /a 500 20\n";

    fn config(temp_dir: &TempDir) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_output_dir(temp_dir.path().join("out"))
            .without_report()
    }

    #[test]
    fn test_analyze_bytes() {
        let report = analyze_bytes(LOG.as_bytes()).unwrap();
        assert_eq!(report.table.row_count(), 2);
        assert_eq!(report.summary.len(), 2);
        assert!(report.pivot.is_some());
        assert_eq!(report.errors.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_analyze_bytes_missing_columns_is_fatal() {
        let err = analyze_bytes(b"#Fields: cs-uri-stem\n/a\n").unwrap_err();
        assert!(matches!(err, LogAnalyzerError::MissingColumns { .. }));
    }

    #[test]
    fn test_process_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("u_ex240101.log");
        fs::write(&input, LOG).unwrap();

        let processor = LogProcessor::new(input, config(&temp_dir)).unwrap();
        let stats = processor.process().unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 0);
        assert_eq!(stats.total_rows, 2);
        assert_eq!(
            stats.outputs,
            vec![temp_dir.path().join("out").join("u_ex240101.log")]
        );
        assert!(stats.outputs[0].join("1_StatusSummary.csv").exists());
    }

    #[test]
    fn test_single_file_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("broken.log");
        fs::write(&input, "no directive here\n").unwrap();

        let processor = LogProcessor::new(input, config(&temp_dir)).unwrap();
        let err = processor.process().unwrap_err();
        assert!(matches!(err, LogAnalyzerError::Format { .. }));
    }

    #[test]
    fn test_directory_counts_failures() {
        let temp_dir = TempDir::new().unwrap();
        let logs = temp_dir.path().join("logs");
        fs::create_dir_all(logs.join("W3SVC1")).unwrap();
        fs::write(logs.join("W3SVC1").join("good.log"), LOG).unwrap();
        fs::write(logs.join("bad.log"), "#Fields: a b\n").unwrap();

        let processor = LogProcessor::new(logs, config(&temp_dir)).unwrap();
        let stats = processor.process().unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(
            stats.outputs,
            vec![temp_dir.path().join("out").join("W3SVC1").join("good.log")]
        );
    }

    #[test]
    fn test_workbook_name() {
        assert_eq!(
            workbook_name(Path::new("logs"), Path::new("logs/W3SVC1/u_ex240101.log")),
            PathBuf::from("W3SVC1/u_ex240101.log")
        );
        assert_eq!(
            workbook_name(Path::new("/in/u_ex1.log"), Path::new("/in/u_ex1.log")),
            PathBuf::from("u_ex1.log")
        );
        assert_eq!(
            workbook_name(Path::new("other"), Path::new("/var/log/u_ex2.log")),
            PathBuf::from("u_ex2.log")
        );
    }

    #[test]
    fn test_workbook_names_do_not_collide() {
        let root = Path::new("logs");
        assert_ne!(
            workbook_name(root, Path::new("logs/a_b.log")),
            workbook_name(root, Path::new("logs/a/b.log"))
        );
        assert_ne!(
            workbook_name(root, Path::new("logs/x.log")),
            workbook_name(root, Path::new("logs/x.LOG"))
        );
    }

    #[test]
    fn test_second_run_replaces_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("u_ex1.log");

        fs::write(&input, LOG).unwrap();
        let processor = LogProcessor::new(input.clone(), config(&temp_dir)).unwrap();
        processor.process().unwrap();

        fs::write(&input, "#Fields: sc-status time-taken\n200 10\n").unwrap();
        let stats = processor.process().unwrap();

        let mut written: Vec<String> = fs::read_dir(&stats.outputs[0])
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        written.sort();
        assert_eq!(written, vec!["1_StatusSummary.csv", "2_RawData.csv"]);
    }
}
