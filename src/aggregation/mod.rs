//! Aggregation of coerced IIS log tables.
//!
//! Builds the per-status summary, the endpoint by status pivot and the
//! server error rollup. Every builder is a pure function of the coerced
//! table; null `time-taken` values are skipped explicitly by
//! [`Accumulator`] rather than by the dataframe library.

pub mod error_rollup;
pub mod pivot;
pub mod status_summary;

pub use error_rollup::{ErrorRollup, ErrorRollupRow, build_error_rollup};
pub use pivot::{EndpointStatusPivot, PivotCell, build_endpoint_status_pivot};
pub use status_summary::{StatusSummary, StatusSummaryRow, build_status_summary};

use std::cmp::Ordering;
use std::fmt;

/// Running count, mean, max and min over nullable values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    rows: usize,
    values: usize,
    sum: f64,
    max: Option<f64>,
    min: Option<f64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one row; a null value counts as a row but not as a value
    pub fn push(&mut self, value: Option<f64>) {
        self.rows += 1;

        let Some(value) = value else {
            return;
        };

        self.values += 1;
        self.sum += value;
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
    }

    /// Rows recorded, nulls included
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Non-null values recorded
    pub fn value_count(&self) -> usize {
        self.values
    }

    /// Arithmetic mean of the non-null values
    pub fn mean(&self) -> Option<f64> {
        (self.values > 0).then(|| self.sum / self.values as f64)
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }
}

/// Numeric `sc-status` value used as a grouping key
///
/// Ordered with `f64::total_cmp` so it can key ordered maps. Negative zero
/// is folded into zero so both spellings land in one group.
#[derive(Debug, Clone, Copy)]
pub struct StatusCode(f64);

impl StatusCode {
    pub fn new(value: f64) -> Self {
        Self(if value == 0.0 { 0.0 } else { value })
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_server_error(&self) -> bool {
        self.0 >= crate::constants::ERROR_STATUS_THRESHOLD
    }
}

impl PartialEq for StatusCode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StatusCode {}

impl PartialOrd for StatusCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StatusCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for StatusCode {
    // Integral codes print without a fractional part: 500 not 500.0
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Values of `time-taken`, or all nulls when the column is absent
pub(crate) fn time_taken_values(
    table: &crate::coercion::CoercedTable,
) -> impl Iterator<Item = Option<f64>> + '_ {
    let values = table.numeric(crate::constants::columns::TIME_TAKEN);
    (0..table.row_count()).map(move |row| values.and_then(|values| values[row]))
}
