//! Conversion between typed daily rows and polars tables.

use crate::{FactorError, Result, bars::columns};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Days between 0001-01-01 (CE) and the Unix epoch, the origin of polars dates.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One factor value for one instrument on one trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyFactorRow {
    /// Instrument identifier.
    pub code: String,
    /// Trading date.
    pub date: NaiveDate,
    /// Factor value; `None` when the formula's preconditions were not met.
    pub value: Option<f64>,
}

impl DailyFactorRow {
    /// Create a row.
    pub fn new(code: impl Into<String>, date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            code: code.into(),
            date,
            value,
        }
    }
}

/// Days since the Unix epoch, as stored in a polars `Date` column.
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Inverse of [`epoch_days`].
pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

/// Build a polars `Date` column.
pub fn build_date_column(name: &str, dates: impl IntoIterator<Item = NaiveDate>) -> Result<Column> {
    let days: Vec<i32> = dates.into_iter().map(epoch_days).collect();
    Ok(Column::new(name.into(), days).cast(&DataType::Date)?)
}

/// Read a date column stored either as a polars `Date` or as `YYYY-MM-DD` text.
pub fn date_column(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let column = df
        .column(name)
        .map_err(|_| FactorError::MissingColumn(name.to_string()))?;

    match column.dtype() {
        DataType::Date => {
            let days = column.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|d| d.and_then(from_epoch_days))
                .collect())
        }
        DataType::String => column
            .str()?
            .into_iter()
            .map(|s| {
                s.map(|s| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                        FactorError::InvalidColumn {
                            column: name.to_string(),
                            reason: format!("cannot parse {s:?} as a date: {e}"),
                        }
                    })
                })
                .transpose()
            })
            .collect(),
        other => Err(FactorError::InvalidColumn {
            column: name.to_string(),
            reason: format!("expected Date or String, found {other}"),
        }),
    }
}

/// Turn daily rows into a `code`, `date`, `value_column` table, keeping row order.
pub fn rows_to_frame(value_column: &str, rows: &[DailyFactorRow]) -> Result<DataFrame> {
    let codes: Vec<&str> = rows.iter().map(|row| row.code.as_str()).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|row| row.value).collect();

    Ok(DataFrame::new(vec![
        Column::new(columns::CODE.into(), codes),
        build_date_column(columns::DATE, rows.iter().map(|row| row.date))?,
        Column::new(value_column.into(), values),
    ])?)
}

/// Read daily rows back from a `code`, `date`, `value_column` table.
///
/// Rows with a null code or date are dropped.
pub fn rows_from_frame(df: &DataFrame, value_column: &str) -> Result<Vec<DailyFactorRow>> {
    let codes = df
        .column(columns::CODE)
        .map_err(|_| FactorError::MissingColumn(columns::CODE.to_string()))?
        .cast(&DataType::String)?;
    let values = df
        .column(value_column)
        .map_err(|_| FactorError::MissingColumn(value_column.to_string()))?
        .cast(&DataType::Float64)?;
    let dates = date_column(df, columns::DATE)?;

    Ok(codes
        .str()?
        .into_iter()
        .zip(dates)
        .zip(values.f64()?.into_iter())
        .filter_map(|((code, date), value)| {
            Some(DailyFactorRow::new(code?, date?, value.filter(|v| v.is_finite())))
        })
        .collect())
}
