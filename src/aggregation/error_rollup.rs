//! Rollup of server errors (status 500 and above) per endpoint.

use super::{Accumulator, StatusCode, time_taken_values};
use crate::coercion::CoercedTable;
use crate::constants::{columns, output_columns};
use crate::error::Result;
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRollupRow {
    pub endpoint: String,
    pub error_count: usize,
    pub avg_time: Option<f64>,
    pub max_time: Option<f64>,
}

/// One row per endpoint with at least one server error, ordered by endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRollup {
    rows: Vec<ErrorRollupRow>,
}

impl ErrorRollup {
    pub fn rows(&self) -> &[ErrorRollupRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, endpoint: &str) -> Option<&ErrorRollupRow> {
        self.rows.iter().find(|row| row.endpoint == endpoint)
    }

    pub fn total_errors(&self) -> usize {
        self.rows.iter().map(|row| row.error_count).sum()
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let endpoints: Vec<&str> = self.rows.iter().map(|row| row.endpoint.as_str()).collect();
        let counts: Vec<u64> = self.rows.iter().map(|row| row.error_count as u64).collect();
        let avg: Vec<Option<f64>> = self.rows.iter().map(|row| row.avg_time).collect();
        let max: Vec<Option<f64>> = self.rows.iter().map(|row| row.max_time).collect();

        Ok(DataFrame::new(vec![
            Column::new(columns::CS_URI_STEM.into(), endpoints),
            Column::new(output_columns::ERROR_COUNT.into(), counts),
            Column::new(output_columns::AVG_TIME.into(), avg),
            Column::new(output_columns::MAX_TIME.into(), max),
        ])?)
    }
}

/// Summarise requests with a status of 500 or above per endpoint
///
/// Returns `None` when either `sc-status` or `cs-uri-stem` is absent.
/// Rows with an unreadable status are never counted as errors.
pub fn build_error_rollup(table: &CoercedTable) -> Option<ErrorRollup> {
    let statuses = table.numeric(columns::SC_STATUS)?;
    let endpoints = table.text(columns::CS_URI_STEM)?;

    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for ((endpoint, status), time_taken) in endpoints
        .iter()
        .zip(statuses)
        .zip(time_taken_values(table))
    {
        let is_error = status.is_some_and(|status| StatusCode::new(status).is_server_error());
        if is_error {
            groups.entry(endpoint.as_str()).or_default().push(time_taken);
        }
    }

    let rows = groups
        .into_iter()
        .map(|(endpoint, acc)| ErrorRollupRow {
            endpoint: endpoint.to_string(),
            error_count: acc.rows(),
            avg_time: acc.mean(),
            max_time: acc.max(),
        })
        .collect();

    Some(ErrorRollup { rows })
}
