//! Endpoint by status pivot of response times.
//!
//! Held as a nested mapping endpoint -> status -> accumulator and only
//! flattened to `{aggregate}_{status}` columns when exported. Combinations
//! never observed are filled with zero.

use super::{Accumulator, StatusCode, time_taken_values};
use crate::coercion::CoercedTable;
use crate::constants::{columns, output_columns};
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Zero-filled aggregates of one endpoint and status combination
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PivotCell {
    /// Number of non-null `time-taken` values
    pub count: usize,
    pub mean: f64,
    pub max: f64,
}

impl PivotCell {
    fn from_accumulator(acc: &Accumulator) -> Self {
        Self {
            count: acc.value_count(),
            mean: acc.mean().unwrap_or(0.0),
            max: acc.max().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointStatusPivot {
    cells: BTreeMap<String, BTreeMap<StatusCode, Accumulator>>,
    statuses: BTreeSet<StatusCode>,
}

impl EndpointStatusPivot {
    /// Endpoints in lexicographic order
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Statuses seen anywhere in the table, ascending
    pub fn statuses(&self) -> impl Iterator<Item = StatusCode> + '_ {
        self.statuses.iter().copied()
    }

    pub fn endpoint_count(&self) -> usize {
        self.cells.len()
    }

    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }

    /// Aggregates for a combination, zero when never observed
    pub fn cell(&self, endpoint: &str, status: f64) -> PivotCell {
        self.cells
            .get(endpoint)
            .and_then(|by_status| by_status.get(&StatusCode::new(status)))
            .map(PivotCell::from_accumulator)
            .unwrap_or_default()
    }

    /// Flattened column names: endpoint, then count, mean and max blocks
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![columns::CS_URI_STEM.to_string()];
        for aggregate in [
            output_columns::PIVOT_COUNT,
            output_columns::PIVOT_MEAN,
            output_columns::PIVOT_MAX,
        ] {
            names.extend(
                self.statuses
                    .iter()
                    .map(|status| format!("{}_{}", aggregate, status)),
            );
        }
        names
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let endpoints: Vec<&str> = self.endpoints().collect();
        let mut frame_columns = vec![Column::new(columns::CS_URI_STEM.into(), &endpoints)];

        for status in &self.statuses {
            let counts: Vec<u64> = endpoints
                .iter()
                .map(|endpoint| self.cell(endpoint, status.value()).count as u64)
                .collect();
            let name = format!("{}_{}", output_columns::PIVOT_COUNT, status);
            frame_columns.push(Column::new(name.into(), counts));
        }

        for status in &self.statuses {
            let means: Vec<f64> = endpoints
                .iter()
                .map(|endpoint| self.cell(endpoint, status.value()).mean)
                .collect();
            let name = format!("{}_{}", output_columns::PIVOT_MEAN, status);
            frame_columns.push(Column::new(name.into(), means));
        }

        for status in &self.statuses {
            let maxes: Vec<f64> = endpoints
                .iter()
                .map(|endpoint| self.cell(endpoint, status.value()).max)
                .collect();
            let name = format!("{}_{}", output_columns::PIVOT_MAX, status);
            frame_columns.push(Column::new(name.into(), maxes));
        }

        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Cross-tabulate `time-taken` by `cs-uri-stem` and `sc-status`
///
/// Returns `None` when either `sc-status` or `cs-uri-stem` is absent. Rows
/// with an unreadable status contribute their endpoint but no status column.
pub fn build_endpoint_status_pivot(table: &CoercedTable) -> Option<EndpointStatusPivot> {
    let statuses = table.numeric(columns::SC_STATUS)?;
    let endpoints = table.text(columns::CS_URI_STEM)?;

    let mut cells: BTreeMap<String, BTreeMap<StatusCode, Accumulator>> = BTreeMap::new();
    let mut seen = BTreeSet::new();

    for ((endpoint, status), time_taken) in endpoints
        .iter()
        .zip(statuses)
        .zip(time_taken_values(table))
    {
        let by_status = cells.entry(endpoint.clone()).or_default();
        if let Some(status) = status {
            let status = StatusCode::new(*status);
            seen.insert(status);
            by_status.entry(status).or_default().push(time_taken);
        }
    }

    Some(EndpointStatusPivot {
        cells,
        statuses: seen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::coerce_table;
    use crate::parser::parse_log;

    fn pivot(log: &str) -> Option<EndpointStatusPivot> {
        build_endpoint_status_pivot(&coerce_table(&parse_log(log.as_bytes()).unwrap().table))
    }

    const LOG: &str = "#Fields: cs-uri-stem sc-status time-taken\n\
/b 200 10\n\
/a 200 30\n\
/a 200 50\n\
/a 500 20\n\
/b 404 -\n";

    #[test]
    fn test_shape_matches_endpoints_and_statuses() {
        let pivot = pivot(LOG).unwrap();

        assert_eq!(pivot.endpoint_count(), 2);
        assert_eq!(pivot.status_count(), 3);

        let df = pivot.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 1 + 3 * 3);
    }

    #[test]
    fn test_column_naming() {
        let pivot = pivot(LOG).unwrap();
        assert_eq!(
            pivot.column_names(),
            vec![
                "cs-uri-stem",
                "count_200",
                "count_404",
                "count_500",
                "mean_200",
                "mean_404",
                "mean_500",
                "max_200",
                "max_404",
                "max_500",
            ]
        );

        let df = pivot.to_dataframe().unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, pivot.column_names());
    }

    #[test]
    fn test_observed_cells() {
        let pivot = pivot(LOG).unwrap();
        assert_eq!(
            pivot.cell("/a", 200.0),
            PivotCell {
                count: 2,
                mean: 40.0,
                max: 50.0
            }
        );
        assert_eq!(
            pivot.cell("/a", 500.0),
            PivotCell {
                count: 1,
                mean: 20.0,
                max: 20.0
            }
        );
    }

    #[test]
    fn test_unobserved_combinations_are_zero() {
        let pivot = pivot(LOG).unwrap();
        assert_eq!(pivot.cell("/b", 500.0), PivotCell::default());
        assert_eq!(pivot.cell("/a", 404.0), PivotCell::default());

        let df = pivot.to_dataframe().unwrap();
        let count_500 = df.column("count_500").unwrap().as_materialized_series().u64().unwrap().clone();
        assert_eq!(count_500.get(1), Some(0));
        assert_eq!(df.column("mean_500").unwrap().null_count(), 0);
    }

    #[test]
    fn test_observed_cell_without_values_is_zero() {
        // /b saw status 404 once, with no readable time-taken
        let pivot = pivot(LOG).unwrap();
        assert_eq!(pivot.cell("/b", 404.0), PivotCell::default());
    }

    #[test]
    fn test_endpoints_sorted() {
        let pivot = pivot(LOG).unwrap();
        let endpoints: Vec<&str> = pivot.endpoints().collect();
        assert_eq!(endpoints, vec!["/a", "/b"]);
    }

    #[test]
    fn test_negative_zero_status_shares_column() {
        let pivot = pivot("#Fields: cs-uri-stem sc-status time-taken\n/a 0 10\n/a -0 20\n").unwrap();
        assert_eq!(pivot.column_names(), vec!["cs-uri-stem", "count_0", "mean_0", "max_0"]);
        assert_eq!(pivot.cell("/a", 0.0).count, 2);
    }

    #[test]
    fn test_null_status_adds_no_column() {
        let pivot = pivot(
            "#Fields: cs-uri-stem sc-status time-taken\n\
/a 200 10\n\
/c - 10\n",
        )
        .unwrap();

        assert_eq!(pivot.status_count(), 1);
        assert_eq!(pivot.endpoint_count(), 2);
        assert_eq!(pivot.cell("/c", 200.0), PivotCell::default());
    }

    #[test]
    fn test_absent_without_uri_stem() {
        assert!(pivot("#Fields: sc-status time-taken\n200 10\n").is_none());
    }

    #[test]
    fn test_absent_without_status() {
        assert!(pivot("#Fields: cs-uri-stem time-taken\n/a 10\n").is_none());
    }

    #[test]
    fn test_missing_time_taken_gives_zero_counts() {
        let pivot = pivot("#Fields: cs-uri-stem sc-status\n/a 200\n").unwrap();
        assert_eq!(pivot.cell("/a", 200.0).count, 0);
        assert_eq!(pivot.status_count(), 1);
    }
}
