//! Workbook assembly for analysis results.
//!
//! Collects the finished tables as named sheets in their fixed order:
//! status summary, raw data, pivot (if built), error summary (if built).
//! How the sheets are persisted is left to a [`WorkbookSink`].

use crate::aggregation::{EndpointStatusPivot, ErrorRollup, StatusSummary};
use crate::coercion::CoercedTable;
use crate::constants::sheets;
use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

/// A named table within a workbook
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: &'static str,
    pub frame: DataFrame,
}

/// Ordered collection of sheets
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Assemble the workbook for one analysed log
    pub fn from_tables(
        summary: &StatusSummary,
        raw: &CoercedTable,
        pivot: Option<&EndpointStatusPivot>,
        errors: Option<&ErrorRollup>,
    ) -> Result<Self> {
        let mut workbook = Self::default();
        workbook.push(sheets::STATUS_SUMMARY, summary.to_dataframe()?);
        workbook.push(sheets::RAW_DATA, raw.to_dataframe()?);
        if let Some(pivot) = pivot {
            workbook.push(sheets::PIVOT_TABLE, pivot.to_dataframe()?);
        }
        if let Some(errors) = errors {
            workbook.push(sheets::ERROR_SUMMARY, errors.to_dataframe()?);
        }
        Ok(workbook)
    }

    fn push(&mut self, name: &'static str, frame: DataFrame) {
        self.sheets.push(Sheet { name, frame });
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> &mut [Sheet] {
        &mut self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&'static str> {
        self.sheets.iter().map(|sheet| sheet.name).collect()
    }
}

/// Destination for a finished workbook
pub trait WorkbookSink {
    /// Persist every sheet under `name`, returning the written artifact
    ///
    /// The artifact holds exactly the supplied sheets, replacing anything
    /// previously written under the same name.
    fn write_workbook(&self, name: &Path, workbook: &mut Workbook) -> Result<PathBuf>;
}
