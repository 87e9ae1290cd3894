//! Multi-frequency resampling of daily panels into exposure panels.
//!
//! In calendar mode the rows of each instrument are grouped into weeks
//! (starting Monday) or months and each bucket becomes one row keyed by its
//! first day. In days mode every daily row gets the statistic of the trailing
//! window made of its own and the instrument's previous rows. Rolling windows
//! need all of their rows present and non-null, otherwise the value is null.

pub mod config;

pub use config::{Frequency, Method, Mode, Pool, ResampleConfig};

use crate::{DailyFactorPanel, Result};
use chrono::{Datelike, Days, NaiveDate};
use hf_factors::{
    DailyFactorRow,
    frame::rows_to_frame,
    stats::{finite, mean, std_dev},
};
use polars::prelude::*;
use tracing::debug;

/// One exposure value for one instrument and period.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureRow {
    /// Instrument identifier.
    pub code: String,
    /// First day of the calendar bucket, or the daily date in days mode.
    pub period: NaiveDate,
    /// Exposure value.
    pub value: Option<f64>,
}

/// Resampled exposures of one factor, sorted by period then instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposurePanel {
    column: String,
    rows: Vec<ExposureRow>,
}

impl ExposurePanel {
    /// Exposure column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Rows sorted by period, then instrument.
    pub fn rows(&self) -> &[ExposureRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `code`, `date`, `<column>` table.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let rows: Vec<DailyFactorRow> = self
            .rows
            .iter()
            .map(|row| DailyFactorRow::new(row.code.clone(), row.period, row.value))
            .collect();
        Ok(rows_to_frame(&self.column, &rows)?)
    }
}

/// First day of the calendar bucket holding `date`.
pub fn bucket_start(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    let offset = match frequency {
        Frequency::Weekly => date.weekday().num_days_from_monday(),
        Frequency::Monthly => date.day0(),
        Frequency::Days(_) => 0,
    };
    date - Days::new(u64::from(offset))
}

/// Standard deviation that is exactly zero when every value is equal.
fn dispersion(values: &[f64], ddof: usize) -> Option<f64> {
    let std = std_dev(values, ddof)?;
    if values.windows(2).all(|pair| pair[0] == pair[1]) {
        Some(0.0)
    } else {
        Some(std)
    }
}

fn zscore(last: f64, values: &[f64], ddof: usize) -> Option<f64> {
    let std = dispersion(values, ddof).filter(|std| *std != 0.0)?;
    finite((last - mean(values)?) / std)
}

/// Calendar statistic over the non-null values of a bucket.
fn bucket_statistic(values: &[Option<f64>], method: Method) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    match method {
        Method::Last => present.last().copied(),
        Method::Mean => mean(&present),
        Method::ZScore => zscore(*present.last()?, &present, 1),
        Method::Std => dispersion(&present, 1),
    }
}

/// Rolling statistic over a full window of `size` values, population moments.
fn window_statistic(window: &[Option<f64>], size: usize, method: Method) -> Option<f64> {
    let full = || {
        (window.len() >= size)
            .then(|| window.iter().copied().collect::<Option<Vec<f64>>>())
            .flatten()
    };
    match method {
        Method::Last => *window.last()?,
        Method::Mean => mean(&full()?),
        Method::ZScore => {
            let values = full()?;
            zscore(*values.last()?, &values, 0)
        }
        Method::Std => dispersion(&full()?, 0),
    }
}

fn calendar_rows(
    code: &str,
    history: &[&DailyFactorRow],
    config: &ResampleConfig,
) -> Vec<ExposureRow> {
    let mut rows = Vec::new();
    let mut start = 0;
    while start < history.len() {
        let period = bucket_start(history[start].date, config.frequency());
        let end = start
            + history[start..]
                .iter()
                .take_while(|row| bucket_start(row.date, config.frequency()) == period)
                .count();
        let values: Vec<Option<f64>> = history[start..end].iter().map(|row| row.value).collect();
        rows.push(ExposureRow {
            code: code.to_string(),
            period,
            value: bucket_statistic(&values, config.method()),
        });
        start = end;
    }
    rows
}

fn rolling_rows(
    code: &str,
    history: &[&DailyFactorRow],
    size: usize,
    method: Method,
) -> Vec<ExposureRow> {
    let values: Vec<Option<f64>> = history.iter().map(|row| row.value).collect();
    history
        .iter()
        .enumerate()
        .map(|(i, row)| ExposureRow {
            code: code.to_string(),
            period: row.date,
            value: window_statistic(&values[(i + 1).saturating_sub(size)..=i], size, method),
        })
        .collect()
}

/// Resample a daily panel.
pub fn resample(panel: &DailyFactorPanel, config: &ResampleConfig) -> ExposurePanel {
    let column = config.column_name(panel.factor());
    let mut rows: Vec<ExposureRow> = Vec::new();

    for (code, history) in panel.by_instrument() {
        match (config.mode(), config.frequency()) {
            (Mode::Days, Frequency::Days(size)) => {
                rows.extend(rolling_rows(code, &history, size, config.method()));
            }
            _ => rows.extend(calendar_rows(code, &history, config)),
        }
    }
    rows.sort_by(|a, b| a.period.cmp(&b.period).then_with(|| a.code.cmp(&b.code)));

    debug!(%column, input = panel.len(), output = rows.len(), "Resampled panel");
    ExposurePanel { column, rows }
}
