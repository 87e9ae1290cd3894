//! Core trait definitions for factors.
//!
//! All aggregators implement the [`Factor`] trait, which turns a table of
//! minute bars into one value per instrument and trading day.

use crate::{
    DayBars, FactorCategory, Result,
    bars::{MINUTE_BAR_COLUMNS, group_minute_bars},
    frame::{DailyFactorRow, rows_to_frame},
    stats::finite,
};
use polars::prelude::*;

/// Outcome of evaluating a factor on one instrument-day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// A finite factor value.
    Value(f64),
    /// Row present with a null value.
    Null,
    /// No row for this instrument-day.
    Absent,
}

impl Reading {
    /// The value, if any.
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Null | Self::Absent => None,
        }
    }

    /// Whether the instrument-day should be dropped from the output.
    pub const fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        finite(value).map_or(Self::Null, Self::Value)
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::from)
    }
}

/// A factor computed from intraday minute bars.
///
/// Implementors only supply [`Factor::compute_day`]; grouping by instrument and
/// date and building the output table are shared.
pub trait Factor: Send + Sync + std::fmt::Debug {
    /// Unique identifier, `<family>_<name>`, also used as the value column name.
    fn name(&self) -> &str;

    /// Human-readable description of what this factor measures.
    fn description(&self) -> &str;

    /// Factor family.
    fn category(&self) -> FactorCategory;

    /// Columns required in the input DataFrame.
    fn required_columns(&self) -> &[&str] {
        &MINUTE_BAR_COLUMNS
    }

    /// Evaluate the formula on one instrument-day.
    fn compute_day(&self, day: &DayBars) -> Reading;

    /// Evaluate the formula on every group, dropping absent readings.
    fn compute_rows(&self, days: &[DayBars]) -> Vec<DailyFactorRow> {
        days.iter()
            .filter_map(|day| {
                let reading = self.compute_day(day);
                (!reading.is_absent())
                    .then(|| DailyFactorRow::new(day.code.clone(), day.date, reading.value()))
            })
            .collect()
    }

    /// Compute daily factor values from a minute-bar table.
    ///
    /// Returns a DataFrame with columns: `code`, `date`, and the factor name,
    /// sorted by code then date.
    fn compute(&self, data: &DataFrame) -> Result<DataFrame> {
        let days = group_minute_bars(data)?;
        rows_to_frame(self.name(), &self.compute_rows(&days))
    }
}

/// Marker trait for factor configuration types.
///
/// All config types should implement Default, Clone, Send, Sync, and Debug.
pub trait FactorConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

/// A factor that supports runtime configuration.
///
/// This trait extends `Factor` to allow customization of window lengths,
/// thresholds, and other parameters.
pub trait ConfigurableFactor: Factor {
    /// Configuration type for this factor.
    type Config: FactorConfig;

    /// Create a new factor with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Blanket implementation for any type that satisfies the trait bounds.
impl<T: Default + Clone + Send + Sync + std::fmt::Debug> FactorConfig for T {}

/// Signature of a per-day formula.
pub type DayKernel = fn(&DayBars) -> Reading;

/// A fixed formula with no parameters.
#[derive(Debug, Clone, Copy)]
pub struct KernelFactor {
    name: &'static str,
    description: &'static str,
    category: FactorCategory,
    kernel: DayKernel,
}

impl KernelFactor {
    /// Wrap a per-day formula.
    pub const fn new(
        name: &'static str,
        description: &'static str,
        category: FactorCategory,
        kernel: DayKernel,
    ) -> Self {
        Self {
            name,
            description,
            category,
            kernel,
        }
    }
}

impl Factor for KernelFactor {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn category(&self) -> FactorCategory {
        self.category
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        (self.kernel)(day)
    }
}
