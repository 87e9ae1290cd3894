//! Volume-weighted return of the closing bars.

use crate::{
    DayBars, Factor, FactorCategory,
    traits::{ConfigurableFactor, Reading},
};
use serde::{Deserialize, Serialize};

/// Configuration for [`ClosingReturnRatio`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingReturnRatioConfig {
    /// Number of bars counted back from the last bar of the day.
    pub bars: usize,
}

impl Default for ClosingReturnRatioConfig {
    fn default() -> Self {
        Self { bars: 20 }
    }
}

/// Volume-weighted return of the last `bars` bars of the day.
///
/// Each bar's return `close / open - 1` is weighted by its share of the window
/// volume. A window without volume weights every bar by its raw volume, which
/// scores zero.
#[derive(Debug, Clone)]
pub struct ClosingReturnRatio {
    config: ClosingReturnRatioConfig,
    name: String,
    description: String,
}

impl ClosingReturnRatio {
    /// The last twenty bars, `trade_bottom20retRatio`.
    pub fn new() -> Self {
        Self::with_config(ClosingReturnRatioConfig::default())
    }
}

impl Default for ClosingReturnRatio {
    fn default() -> Self {
        Self::new()
    }
}

impl Factor for ClosingReturnRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Trade
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        let window = day.tail(self.config.bars);
        if window.is_empty() {
            return Reading::Absent;
        }
        let volume: f64 = window.iter().map(|bar| bar.volume).sum();
        let denominator = if volume == 0.0 { 1.0 } else { volume };
        Reading::from(
            window
                .iter()
                .map(|bar| bar.volume / denominator * bar.ret())
                .sum::<f64>(),
        )
    }
}

impl ConfigurableFactor for ClosingReturnRatio {
    type Config = ClosingReturnRatioConfig;

    fn with_config(config: Self::Config) -> Self {
        Self {
            name: format!("trade_bottom{}retRatio", config.bars),
            description: format!(
                "Volume-weighted return of the last {} bars",
                config.bars
            ),
            config,
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
