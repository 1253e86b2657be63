//! Per-status summary of request counts and response times.

use super::{Accumulator, StatusCode, time_taken_values};
use crate::coercion::CoercedTable;
use crate::constants::{columns, output_columns};
use crate::error::{LogAnalyzerError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummaryRow {
    /// `None` groups the rows whose status could not be read
    pub status: Option<StatusCode>,
    pub count: usize,
    pub avg_time_taken: Option<f64>,
    pub max_time_taken: Option<f64>,
    pub min_time_taken: Option<f64>,
}

impl StatusSummaryRow {
    fn from_accumulator(status: Option<StatusCode>, acc: &Accumulator) -> Self {
        Self {
            status,
            count: acc.rows(),
            avg_time_taken: acc.mean(),
            max_time_taken: acc.max(),
            min_time_taken: acc.min(),
        }
    }
}

/// One row per distinct status, ascending, with the null group last
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary {
    rows: Vec<StatusSummaryRow>,
}

impl StatusSummary {
    pub fn rows(&self) -> &[StatusSummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a numeric status code
    pub fn get(&self, status: f64) -> Option<&StatusSummaryRow> {
        let key = StatusCode::new(status);
        self.rows.iter().find(|row| row.status == Some(key))
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let status: Vec<Option<f64>> = self
            .rows
            .iter()
            .map(|row| row.status.map(|s| s.value()))
            .collect();
        let count: Vec<u64> = self.rows.iter().map(|row| row.count as u64).collect();
        let avg: Vec<Option<f64>> = self.rows.iter().map(|row| row.avg_time_taken).collect();
        let max: Vec<Option<f64>> = self.rows.iter().map(|row| row.max_time_taken).collect();
        let min: Vec<Option<f64>> = self.rows.iter().map(|row| row.min_time_taken).collect();

        Ok(DataFrame::new(vec![
            Column::new(output_columns::SC_STATUS.into(), status),
            Column::new(output_columns::COUNT.into(), count),
            Column::new(output_columns::AVG_TIME_TAKEN.into(), avg),
            Column::new(output_columns::MAX_TIME_TAKEN.into(), max),
            Column::new(output_columns::MIN_TIME_TAKEN.into(), min),
        ])?)
    }
}

/// Group rows by `sc-status` and summarise `time-taken` in each group
///
/// Fails with `MissingColumns` unless both `sc-status` and `time-taken`
/// are present.
pub fn build_status_summary(table: &CoercedTable) -> Result<StatusSummary> {
    let missing: Vec<&str> = [columns::SC_STATUS, columns::TIME_TAKEN]
        .into_iter()
        .filter(|name| table.numeric(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(LogAnalyzerError::missing_columns(missing));
    }

    let statuses = table.numeric(columns::SC_STATUS).unwrap_or_default();

    let mut groups: BTreeMap<StatusCode, Accumulator> = BTreeMap::new();
    let mut unreadable: Option<Accumulator> = None;

    for (status, time_taken) in statuses.iter().zip(time_taken_values(table)) {
        let acc = match status {
            Some(status) => groups.entry(StatusCode::new(*status)).or_default(),
            None => unreadable.get_or_insert_with(Accumulator::new),
        };
        acc.push(time_taken);
    }

    let mut rows: Vec<StatusSummaryRow> = groups
        .iter()
        .map(|(status, acc)| StatusSummaryRow::from_accumulator(Some(*status), acc))
        .collect();
    if let Some(acc) = &unreadable {
        rows.push(StatusSummaryRow::from_accumulator(None, acc));
    }

    Ok(StatusSummary { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::coerce_table;
    use crate::parser::parse_log;

    fn summary(log: &str) -> Result<StatusSummary> {
        build_status_summary(&coerce_table(&parse_log(log.as_bytes()).unwrap().table))
    }

    #[test]
    fn test_groups_by_status() {
        let summary = summary(
            "#Fields: cs-uri-stem sc-status time-taken\n\
/a 200 10\n\
/b 200 30\n\
/a 500 20\n\
/c 404 5\n",
        )
        .unwrap();

        assert_eq!(summary.len(), 3);
        let statuses: Vec<_> = summary
            .rows()
            .iter()
            .map(|row| row.status.unwrap().value())
            .collect();
        assert_eq!(statuses, vec![200.0, 404.0, 500.0]);

        let ok = summary.get(200.0).unwrap();
        assert_eq!(ok.count, 2);
        assert_eq!(ok.avg_time_taken, Some(20.0));
        assert_eq!(ok.max_time_taken, Some(30.0));
        assert_eq!(ok.min_time_taken, Some(10.0));
    }

    #[test]
    fn test_null_status_forms_own_group() {
        let summary = summary(
            "#Fields: sc-status time-taken\n\
200 10\n\
- 40\n\
abc 60\n",
        )
        .unwrap();

        assert_eq!(summary.len(), 2);
        let last = summary.rows().last().unwrap();
        assert_eq!(last.status, None);
        assert_eq!(last.count, 2);
        assert_eq!(last.avg_time_taken, Some(50.0));
    }

    #[test]
    fn test_negative_zero_status_joins_zero_group() {
        let summary = summary(
            "#Fields: sc-status time-taken\n\
0 10\n\
-0 30\n",
        )
        .unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary.get(0.0).unwrap().count, 2);
        assert_eq!(summary.get(-0.0).unwrap().avg_time_taken, Some(20.0));
    }

    #[test]
    fn test_null_time_taken_is_counted_but_not_averaged() {
        let summary = summary(
            "#Fields: sc-status time-taken\n\
200 10\n\
200 -\n\
404 -\n",
        )
        .unwrap();

        let ok = summary.get(200.0).unwrap();
        assert_eq!(ok.count, 2);
        assert_eq!(ok.avg_time_taken, Some(10.0));
        assert_eq!(ok.min_time_taken, Some(10.0));

        let missing = summary.get(404.0).unwrap();
        assert_eq!(missing.count, 1);
        assert_eq!(missing.avg_time_taken, None);
        assert_eq!(missing.max_time_taken, None);
    }

    #[test]
    fn test_missing_time_taken_is_error() {
        let err = summary("#Fields: cs-uri-stem sc-status\n/a 200\n").unwrap_err();
        match err {
            LogAnalyzerError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["time-taken".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_both_columns_is_error() {
        let err = summary("#Fields: cs-uri-stem\n/a\n").unwrap_err();
        assert!(matches!(err, LogAnalyzerError::MissingColumns { ref columns } if columns.len() == 2));
    }

    #[test]
    fn test_to_dataframe_columns() {
        let summary = summary("#Fields: sc-status time-taken\n200 10\n500 20\n").unwrap();
        let df = summary.to_dataframe().unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["sc_status", "count", "avg_time_taken", "max_time_taken", "min_time_taken"]
        );
        assert_eq!(df.height(), 2);
    }
}
