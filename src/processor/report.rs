//! Terminal reporting for analysed log files.

use super::AnalysisReport;
use crate::config::AnalyzerConfig;
use crate::models::ProcessingStats;
use crate::traffic::{hourly_requests, status_distribution};

use colored::*;
use std::path::Path;

/// Print the per-file report: tables written, traffic and previews
pub fn print_report(file: &Path, report: &AnalysisReport, config: &AnalyzerConfig) {
    println!("\n{} {}", "Analysed".bright_green().bold(), file.display());
    println!(
        "  {} {} ({} malformed lines skipped)",
        "Rows:".bright_cyan(),
        report.table.row_count().to_string().bright_white().bold(),
        report.parse_stats.malformed_lines
    );

    match &report.pivot {
        Some(pivot) => println!(
            "  {} {} endpoints x {} statuses",
            "Pivot table:".bright_cyan(),
            pivot.endpoint_count(),
            pivot.status_count()
        ),
        None => println!(
            "  {} {}",
            "Pivot table:".bright_cyan(),
            "not available (missing required columns)".bright_yellow()
        ),
    }

    match &report.errors {
        Some(errors) if !errors.is_empty() => println!(
            "  {} {} errors across {} endpoints",
            "Status >= 500:".bright_cyan(),
            errors.total_errors().to_string().bright_red().bold(),
            errors.len()
        ),
        _ => println!(
            "  {} {}",
            "Status >= 500:".bright_cyan(),
            "no errors found in the logs".bright_green()
        ),
    }

    if config.show_traffic {
        for line in traffic_lines(report) {
            println!("{}", line);
        }
    }

    if config.preview_rows > 0 {
        if let Ok(summary) = report.summary.to_dataframe() {
            println!("\n{}", "Status summary".bright_yellow());
            println!("{}", summary);
        }
        if let Ok(raw) = report.table.to_dataframe() {
            println!(
                "\n{} (first {} rows)",
                "Raw data".bright_yellow(),
                config.preview_rows
            );
            println!("{}", raw.head(Some(config.preview_rows)));
        }
    }
}

/// Status distribution and hourly timeline as report lines
pub fn traffic_lines(report: &AnalysisReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(distribution) = status_distribution(&report.table) {
        lines.push(format!("\n{}", "Status code distribution".bright_yellow()));
        for (status, count) in distribution {
            lines.push(format!("  {:>6}  {}", status.to_string(), count));
        }
    }

    if let Some(hourly) = hourly_requests(&report.table) {
        if !hourly.is_empty() {
            lines.push(format!("\n{}", "Requests per hour".bright_yellow()));
            for (hour, count) in hourly {
                lines.push(format!("  {}  {}", hour.format("%Y-%m-%d %H:00"), count));
            }
        }
    }

    lines
}

/// Print the totals for a processing run
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time.as_millis().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Total rows:".bright_cyan(),
        stats.total_rows.to_string().bright_white().bold()
    );
    for output in &stats.outputs {
        println!("  {} {}", "Workbook:".bright_cyan(), output.display());
    }
}
