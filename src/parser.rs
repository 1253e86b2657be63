//! Record parsing for W3C Extended (IIS) log files.
//!
//! Decodes the raw bytes, tracks the active `#Fields:` schema and splits
//! every data line into a record in a single pass. Lines whose token count
//! does not match the schema are dropped without error.

use crate::error::{LogAnalyzerError, Result};
use crate::header::{LineKind, SchemaTracker, classify_line};
use crate::models::{LogSchema, ParseStats, RawRecord, RawTable};
use tracing::debug;

/// Outcome of a successful parse pass
#[derive(Debug, Clone)]
pub struct ParsedLog {
    pub table: RawTable,
    pub stats: ParseStats,
}

/// Parse the raw content of one log file
///
/// Invalid UTF-8 sequences are replaced rather than rejected. Fails with a
/// format error when no `#Fields:` directive is present or no data line
/// matches the declared schema.
pub fn parse_log(content: &[u8]) -> Result<ParsedLog> {
    let text = String::from_utf8_lossy(content);
    parse_log_text(&text)
}

/// Parse already decoded log text
pub fn parse_log_text(text: &str) -> Result<ParsedLog> {
    let mut tracker = SchemaTracker::new();
    let mut records = Vec::new();
    let mut stats = ParseStats::default();

    for line in text.lines() {
        stats.total_lines += 1;

        match classify_line(line) {
            LineKind::Fields(schema) => {
                stats.directive_lines += 1;
                tracker.replace(schema);
            }
            LineKind::Comment => stats.comment_lines += 1,
            LineKind::Blank => stats.blank_lines += 1,
            LineKind::Data(line) => match tracker.current() {
                Some(schema) => match split_record(line, schema) {
                    Some(record) => records.push(record),
                    None => stats.malformed_lines += 1,
                },
                None => stats.orphan_lines += 1,
            },
        }
    }

    let schema = tracker.into_schema().ok_or_else(|| {
        LogAnalyzerError::format("no #Fields: directive found or no data found")
    })?;

    // Records accepted under an earlier directive must still fit the final one
    let before = records.len();
    records.retain(|record: &RawRecord| record.tokens().len() == schema.len());
    stats.malformed_lines += before - records.len();
    stats.accepted_rows = records.len();

    if records.is_empty() {
        return Err(LogAnalyzerError::format(
            "no #Fields: directive found or no data found",
        ));
    }

    debug!(
        "Parsed {} rows with {} fields ({} malformed, {} comment, {} blank lines)",
        stats.accepted_rows,
        schema.len(),
        stats.malformed_lines,
        stats.comment_lines,
        stats.blank_lines
    );

    Ok(ParsedLog {
        table: RawTable { schema, records },
        stats,
    })
}

/// Split a data line on whitespace into a record matching the schema
pub fn split_record(line: &str, schema: &LogSchema) -> Option<RawRecord> {
    let tokens = line.split_whitespace().map(str::to_string).collect();
    RawRecord::from_tokens(tokens, schema)
}
