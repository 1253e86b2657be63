//! IIS Log Analyzer Library
//!
//! A Rust library for summarising IIS access logs written in the W3C
//! Extended Log Format.
//!
//! This library provides tools for:
//! - Discovering the field schema from the `#Fields:` directive
//! - Parsing data lines into records, tolerating malformed lines
//! - Coercing numeric and temporal columns with null-on-failure semantics
//! - Summarising response times per status, per endpoint and status, and
//!   for server errors
//! - Writing the results as a workbook of named CSV or Parquet sheets

pub mod aggregation;
pub mod cli;
pub mod coercion;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod header;
pub mod models;
pub mod parser;
pub mod processor;
pub mod traffic;

// Re-export commonly used types
pub use aggregation::{
    EndpointStatusPivot, ErrorRollup, StatusSummary, build_endpoint_status_pivot,
    build_error_rollup, build_status_summary,
};
pub use coercion::{CoercedTable, coerce_table};
pub use config::AnalyzerConfig;
pub use error::{LogAnalyzerError, Result};
pub use export::{Workbook, WorkbookSink};
pub use models::{LogSchema, RawRecord, RawTable};
pub use parser::parse_log;
pub use processor::{AnalysisReport, LogProcessor, analyze_bytes, analyze_file};
