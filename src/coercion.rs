//! Type coercion of parsed log columns.
//!
//! Converts the recognised numeric fields to nullable numbers and derives a
//! `datetime` column from `date` and `time`. Values that do not parse become
//! null; coercion never fails.

use crate::constants::{DATETIME_FORMATS, columns};
use crate::error::Result;
use crate::models::RawTable;
use chrono::NaiveDateTime;
use polars::prelude::*;
use tracing::debug;

/// Values of one coerced column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Text(Vec<String>),
    Numeric(Vec<Option<f64>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(values) => values.len(),
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Timestamp(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of null cells
    pub fn null_count(&self) -> usize {
        match self {
            ColumnValues::Text(_) => 0,
            ColumnValues::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Timestamp(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoercedColumn {
    pub name: String,
    pub values: ColumnValues,
}

/// The parsed table with numeric and temporal columns typed
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedTable {
    columns: Vec<CoercedColumn>,
    row_count: usize,
}

impl CoercedTable {
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[CoercedColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&CoercedColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Numeric values of a column, if present and numeric
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.values {
            ColumnValues::Numeric(values) => Some(values),
            _ => None,
        }
    }

    /// Text values of a column, if present and textual
    pub fn text(&self, name: &str) -> Option<&[String]> {
        match &self.column(name)?.values {
            ColumnValues::Text(values) => Some(values),
            _ => None,
        }
    }

    pub fn timestamps(&self, name: &str) -> Option<&[Option<NaiveDateTime>]> {
        match &self.column(name)?.values {
            ColumnValues::Timestamp(values) => Some(values),
            _ => None,
        }
    }

    /// Re-apply coercion to every column
    pub fn recoerce(self) -> Self {
        let columns = self
            .columns
            .into_iter()
            .map(|column| {
                let values = if columns::NUMERIC.contains(&column.name.as_str()) {
                    coerce_numeric(column.values)
                } else {
                    column.values
                };
                CoercedColumn {
                    name: column.name,
                    values,
                }
            })
            .collect();

        Self {
            columns,
            row_count: self.row_count,
        }
    }

    /// Materialise the table as a Polars DataFrame, columns in schema order
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut frame_columns = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            let name: PlSmallStr = column.name.as_str().into();
            let frame_column = match &column.values {
                ColumnValues::Text(values) => Column::new(name, values),
                ColumnValues::Numeric(values) => Column::new(name, values),
                ColumnValues::Timestamp(values) => {
                    let millis: Vec<Option<i64>> = values
                        .iter()
                        .map(|value| value.map(|dt| dt.and_utc().timestamp_millis()))
                        .collect();
                    let series = Series::new(name, millis)
                        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
                    Column::from(series)
                }
            };
            frame_columns.push(frame_column);
        }

        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Coerce a parsed table into typed columns
pub fn coerce_table(table: &RawTable) -> CoercedTable {
    let mut coerced = Vec::with_capacity(table.schema.len() + 1);

    for (index, name) in table.schema.fields().iter().enumerate() {
        let raw: Vec<String> = table
            .records
            .iter()
            .map(|record| record.get(index).unwrap_or_default().to_string())
            .collect();

        let values = if columns::NUMERIC.contains(&name.as_str()) {
            let values = coerce_numeric(ColumnValues::Text(raw));
            let nulls = values.null_count();
            if nulls > 0 {
                debug!("Column '{}': {} values could not be read as numbers", name, nulls);
            }
            values
        } else {
            ColumnValues::Text(raw)
        };

        coerced.push(CoercedColumn {
            name: name.clone(),
            values,
        });
    }

    if let (Some(dates), Some(times)) = (
        table.column_values(columns::DATE),
        table.column_values(columns::TIME),
    ) {
        let timestamps: Vec<Option<NaiveDateTime>> = dates
            .zip(times)
            .map(|(date, time)| parse_timestamp(&format!("{} {}", date, time)))
            .collect();

        let values = ColumnValues::Timestamp(timestamps);
        // A logged `datetime` field is overwritten where it stands
        match coerced
            .iter()
            .position(|column| column.name == columns::DATETIME)
        {
            Some(index) => coerced[index].values = values,
            None => coerced.push(CoercedColumn {
                name: columns::DATETIME.to_string(),
                values,
            }),
        }
    }

    CoercedTable {
        columns: coerced,
        row_count: table.row_count(),
    }
}

/// Reinterpret column values as numbers; numeric input is returned unchanged
pub fn coerce_numeric(values: ColumnValues) -> ColumnValues {
    match values {
        ColumnValues::Text(values) => {
            ColumnValues::Numeric(values.iter().map(|value| parse_number(value)).collect())
        }
        numeric @ ColumnValues::Numeric(_) => numeric,
        ColumnValues::Timestamp(values) => ColumnValues::Numeric(
            values
                .iter()
                .map(|value| value.map(|dt| dt.and_utc().timestamp_millis() as f64))
                .collect(),
        ),
    }
}

/// Best-effort numeric parse; NaN and unreadable tokens are null
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| !number.is_nan())
}

/// Best-effort calendar timestamp parse over the accepted layouts
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
