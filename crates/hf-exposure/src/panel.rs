//! Daily factor panels.
//!
//! A panel holds the daily values of one factor, sorted by date and then by
//! instrument. Panels only grow at the end: rows dated at or before the
//! panel's watermark are rejected.

use crate::{ExposureError, Result};
use chrono::NaiveDate;
use hf_factors::{
    DailyFactorRow,
    frame::{rows_from_frame, rows_to_frame},
};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Per-instrument daily values of one factor.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyFactorPanel {
    factor: String,
    rows: Vec<DailyFactorRow>,
}

fn sort_rows(rows: &mut Vec<DailyFactorRow>) {
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.code.cmp(&b.code)));
    rows.dedup_by(|later, earlier| later.date == earlier.date && later.code == earlier.code);
}

impl DailyFactorPanel {
    /// An empty panel for `factor`.
    pub fn new(factor: impl Into<String>) -> Self {
        Self {
            factor: factor.into(),
            rows: Vec::new(),
        }
    }

    /// Build a panel from rows in any order. Duplicate (date, code) pairs keep the first row.
    pub fn from_rows(factor: impl Into<String>, mut rows: Vec<DailyFactorRow>) -> Self {
        sort_rows(&mut rows);
        Self {
            factor: factor.into(),
            rows,
        }
    }

    /// Name of the factor, also the value column name.
    pub fn factor(&self) -> &str {
        &self.factor
    }

    /// Rows sorted by date, then instrument.
    pub fn rows(&self) -> &[DailyFactorRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Latest date covered by the panel.
    pub fn watermark(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.date)
    }

    /// Distinct dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.rows.iter().map(|row| row.date).collect();
        dates.dedup();
        dates
    }

    /// Append rows dated strictly after the watermark.
    ///
    /// Nothing is appended when any row is too old.
    pub fn append(&mut self, mut rows: Vec<DailyFactorRow>) -> Result<usize> {
        if let Some(watermark) = self.watermark()
            && let Some(stale) = rows.iter().find(|row| row.date <= watermark)
        {
            return Err(ExposureError::NonMonotonicAppend {
                watermark,
                date: stale.date,
            });
        }
        sort_rows(&mut rows);
        let appended = rows.len();
        self.rows.extend(rows);
        Ok(appended)
    }

    /// Rows grouped by instrument, each group in date order.
    pub fn by_instrument(&self) -> BTreeMap<&str, Vec<&DailyFactorRow>> {
        let mut groups: BTreeMap<&str, Vec<&DailyFactorRow>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(row.code.as_str()).or_default().push(row);
        }
        groups
    }

    /// `code`, `date`, `<factor>` table in panel order.
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(rows_to_frame(&self.factor, &self.rows)?)
    }

    /// Read a panel from a `code`, `date`, `<factor>` table.
    pub fn from_frame(factor: impl Into<String>, df: &DataFrame) -> Result<Self> {
        let factor = factor.into();
        let rows = rows_from_frame(df, &factor)?;
        Ok(Self::from_rows(factor, rows))
    }
}
