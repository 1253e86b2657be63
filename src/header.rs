//! W3C Extended Log Format directive handling.
//!
//! Recognises comment and directive lines and extracts the field schema
//! declared by `#Fields:`. A later directive replaces an earlier one.

use crate::constants::{COMMENT_PREFIX, FIELDS_DIRECTIVE};
use crate::models::LogSchema;
use tracing::debug;

/// Classification of a single line of log text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A `#Fields:` directive carrying the field names
    Fields(LogSchema),
    /// Any other `#` line
    Comment,
    Blank,
    Data(&'a str),
}

/// Classify a line of log text
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(COMMENT_PREFIX) {
        return match parse_fields_directive(line) {
            Some(schema) => LineKind::Fields(schema),
            None => LineKind::Comment,
        };
    }

    if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Data(line)
    }
}

/// Extract the field names from a `#Fields:` directive line
///
/// Returns `None` when the line is not a fields directive.
pub fn parse_fields_directive(line: &str) -> Option<LogSchema> {
    if !line.starts_with(FIELDS_DIRECTIVE) {
        return None;
    }

    let fields: Vec<String> = line
        .split_whitespace()
        .skip(1)
        .map(str::to_string)
        .collect();

    Some(LogSchema::new(fields))
}

/// Tracks the active schema across a parse pass
#[derive(Debug, Default)]
pub struct SchemaTracker {
    current: Option<LogSchema>,
    directives_seen: usize,
}

impl SchemaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a newly declared schema, replacing any previous one
    pub fn replace(&mut self, schema: LogSchema) {
        self.directives_seen += 1;
        if let Some(previous) = &self.current {
            if previous != &schema {
                debug!(
                    "Fields directive #{} replaces schema of {} fields with {} fields",
                    self.directives_seen,
                    previous.len(),
                    schema.len()
                );
            }
        }
        self.current = Some(schema);
    }

    pub fn current(&self) -> Option<&LogSchema> {
        self.current.as_ref()
    }

    pub fn directives_seen(&self) -> usize {
        self.directives_seen
    }

    pub fn into_schema(self) -> Option<LogSchema> {
        self.current
    }
}
