//! Traffic breakdowns for the terminal report.
//!
//! Status code distribution and requests per hour. These feed the report
//! printed after each file and are not written to the workbook.

use crate::aggregation::StatusCode;
use crate::coercion::CoercedTable;
use crate::constants::columns;
use chrono::{NaiveDateTime, Timelike};
use std::collections::BTreeMap;

/// Request count per status, most frequent first
///
/// Ties are broken by ascending status. Unreadable statuses are skipped.
/// Returns `None` without an `sc-status` column.
pub fn status_distribution(table: &CoercedTable) -> Option<Vec<(StatusCode, usize)>> {
    let statuses = table.numeric(columns::SC_STATUS)?;

    let mut counts: BTreeMap<StatusCode, usize> = BTreeMap::new();
    for status in statuses.iter().flatten() {
        *counts.entry(StatusCode::new(*status)).or_insert(0) += 1;
    }

    let mut distribution: Vec<(StatusCode, usize)> = counts.into_iter().collect();
    // Stable sort keeps ascending status order among equal counts
    distribution.sort_by(|a, b| b.1.cmp(&a.1));
    Some(distribution)
}

/// Requests per hour, ascending by hour
///
/// Rows without a readable timestamp are skipped. Returns `None` without a
/// derived `datetime` column.
pub fn hourly_requests(table: &CoercedTable) -> Option<Vec<(NaiveDateTime, usize)>> {
    let timestamps = table.timestamps(columns::DATETIME)?;

    let mut buckets: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for timestamp in timestamps.iter().flatten() {
        if let Some(hour) = floor_to_hour(timestamp) {
            *buckets.entry(hour).or_insert(0) += 1;
        }
    }

    Some(buckets.into_iter().collect())
}

fn floor_to_hour(timestamp: &NaiveDateTime) -> Option<NaiveDateTime> {
    timestamp.date().and_hms_opt(timestamp.hour(), 0, 0)
}
