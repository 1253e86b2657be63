//! Application constants for the IIS log analyzer
//!
//! This module contains the directive markers, recognised column names,
//! output sheet names and default values used throughout the analyzer.

// =============================================================================
// W3C Extended Log Format
// =============================================================================

/// Directive line declaring the ordered field names of every data line
pub const FIELDS_DIRECTIVE: &str = "#Fields:";

/// Prefix shared by every directive and comment line
pub const COMMENT_PREFIX: char = '#';

/// File extension of IIS log files picked up by directory discovery
pub const LOG_FILE_EXTENSION: &str = "log";

// =============================================================================
// Column Name Constants
// =============================================================================

/// Field names as they appear in the `#Fields:` directive
pub mod columns {
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const S_PORT: &str = "s-port";
    pub const CS_URI_STEM: &str = "cs-uri-stem";
    pub const SC_STATUS: &str = "sc-status";
    pub const SC_SUBSTATUS: &str = "sc-substatus";
    pub const SC_WIN32_STATUS: &str = "sc-win32-status";
    pub const SC_BYTES: &str = "sc-bytes";
    pub const CS_BYTES: &str = "cs-bytes";
    pub const TIME_TAKEN: &str = "time-taken";

    /// Derived column joining `date` and `time`
    pub const DATETIME: &str = "datetime";

    /// Columns reinterpreted as numbers when present in the schema
    pub const NUMERIC: &[&str] = &[
        S_PORT,
        SC_STATUS,
        SC_SUBSTATUS,
        SC_WIN32_STATUS,
        SC_BYTES,
        CS_BYTES,
        TIME_TAKEN,
    ];
}

/// Column names of the exported summary tables
pub mod output_columns {
    pub const SC_STATUS: &str = "sc_status";
    pub const COUNT: &str = "count";
    pub const AVG_TIME_TAKEN: &str = "avg_time_taken";
    pub const MAX_TIME_TAKEN: &str = "max_time_taken";
    pub const MIN_TIME_TAKEN: &str = "min_time_taken";

    pub const ERROR_COUNT: &str = "error_count";
    pub const AVG_TIME: &str = "avg_time";
    pub const MAX_TIME: &str = "max_time";

    /// Aggregate prefixes of the flattened pivot, in column block order
    pub const PIVOT_COUNT: &str = "count";
    pub const PIVOT_MEAN: &str = "mean";
    pub const PIVOT_MAX: &str = "max";
}

// =============================================================================
// Aggregation
// =============================================================================

/// Lowest status code counted as a server error
pub const ERROR_STATUS_THRESHOLD: f64 = 500.0;

/// Layouts accepted for the joined `date time` value
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

// =============================================================================
// Workbook
// =============================================================================

/// Sheet names, listed in the order they are written
pub mod sheets {
    pub const STATUS_SUMMARY: &str = "StatusSummary";
    pub const RAW_DATA: &str = "RawData";
    pub const PIVOT_TABLE: &str = "PivotTable";
    pub const ERROR_SUMMARY: &str = "ErrorSummary";
}

/// Default number of raw rows shown in the terminal preview
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "iis_log_summary";
