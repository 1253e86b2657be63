//! Core data structures and types for IIS log analysis.
//!
//! Defines the discovered field schema, parsed records, the raw table
//! and the statistics reported while parsing and processing files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Ordered field names declared by a `#Fields:` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSchema {
    fields: Vec<String>,
}

impl LogSchema {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field in every data line, if declared
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

/// One data line split into tokens, one per schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    tokens: Vec<String>,
}

impl RawRecord {
    /// Build a record if the token count matches the schema
    pub fn from_tokens(tokens: Vec<String>, schema: &LogSchema) -> Option<Self> {
        (tokens.len() == schema.len()).then_some(Self { tokens })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Parsed records together with the schema that shaped them
#[derive(Debug, Clone)]
pub struct RawTable {
    pub schema: LogSchema,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// All values of a column in record order
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        let index = self.schema.position(name)?;
        Some(
            self.records
                .iter()
                .map(move |record| record.get(index).unwrap_or_default()),
        )
    }
}

/// Line accounting for a single parse pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub total_lines: usize,
    pub comment_lines: usize,
    pub directive_lines: usize,
    pub blank_lines: usize,
    /// Data lines seen before any `#Fields:` directive
    pub orphan_lines: usize,
    /// Data lines whose token count differed from the schema
    pub malformed_lines: usize,
    pub accepted_rows: usize,
}

/// Processing statistics for a batch of log files
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_rows: usize,
    pub malformed_lines: usize,
    pub outputs: Vec<PathBuf>,
    pub processing_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> LogSchema {
        LogSchema::new(vec!["date".into(), "cs-uri-stem".into(), "sc-status".into()])
    }

    #[test]
    fn test_schema_position() {
        let schema = schema();
        assert_eq!(schema.position("sc-status"), Some(2));
        assert_eq!(schema.position("time-taken"), None);
        assert!(schema.contains("date"));
    }

    #[test]
    fn test_record_requires_matching_token_count() {
        let schema = schema();
        let ok = RawRecord::from_tokens(vec!["a".into(), "b".into(), "c".into()], &schema);
        let short = RawRecord::from_tokens(vec!["a".into(), "b".into()], &schema);
        assert!(ok.is_some());
        assert!(short.is_none());
    }

    #[test]
    fn test_column_values() {
        let schema = schema();
        let record =
            RawRecord::from_tokens(vec!["2024-01-01".into(), "/a".into(), "200".into()], &schema)
                .unwrap();
        let table = RawTable {
            schema,
            records: vec![record],
        };

        let stems: Vec<_> = table.column_values("cs-uri-stem").unwrap().collect();
        assert_eq!(stems, vec!["/a"]);
        assert!(table.column_values("missing").is_none());
    }
}
