//! Return per unit of volume share over the opening bars.
//!
//! Over the first `bars` bars of the day, each bar's return is divided by its
//! share of the window volume and the quotients are averaged. Bars without
//! volume are skipped, and a window without any volume is null. The positive
//! and negative variants keep only the upward or downward part of each return.

use crate::{
    DayBars, Factor, FactorCategory,
    stats::mean,
    traits::{ConfigurableFactor, Reading},
};
use serde::{Deserialize, Serialize};

/// Which part of each bar's return enters the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnSide {
    /// The signed return.
    All,
    /// `max(r, 0)`.
    Positive,
    /// `|min(r, 0)|`.
    Negative,
}

impl ReturnSide {
    fn part(self, ret: f64) -> f64 {
        match self {
            Self::All => ret,
            Self::Positive => ret.max(0.0),
            Self::Negative => ret.min(0.0).abs(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Positive => "Pos",
            Self::Negative => "Neg",
        }
    }
}

/// Configuration for [`OpeningReturnRatio`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningReturnRatioConfig {
    /// Number of bars counted from the first bar of the day.
    pub bars: usize,
    /// Part of the return to use.
    pub side: ReturnSide,
}

impl Default for OpeningReturnRatioConfig {
    fn default() -> Self {
        Self {
            bars: 20,
            side: ReturnSide::All,
        }
    }
}

/// Mean return per unit of volume share over the opening bars.
#[derive(Debug, Clone)]
pub struct OpeningReturnRatio {
    config: OpeningReturnRatioConfig,
    name: String,
}

impl OpeningReturnRatio {
    /// The first twenty bars with signed returns, `trade_top20retRatio`.
    pub fn new() -> Self {
        Self::with_config(OpeningReturnRatioConfig::default())
    }
}

impl Default for OpeningReturnRatio {
    fn default() -> Self {
        Self::new()
    }
}

impl Factor for OpeningReturnRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        match self.config.side {
            ReturnSide::All => "Mean opening-bar return per unit of volume share",
            ReturnSide::Positive => "Mean opening-bar upside return per unit of volume share",
            ReturnSide::Negative => "Mean opening-bar downside return per unit of volume share",
        }
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Trade
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        let window = day.head(self.config.bars);
        if window.is_empty() {
            return Reading::Absent;
        }
        let volume: f64 = window.iter().map(|bar| bar.volume).sum();
        if volume == 0.0 {
            return Reading::Null;
        }

        let quotients: Vec<f64> = window
            .iter()
            .filter(|bar| bar.volume != 0.0)
            .map(|bar| self.config.side.part(bar.ret()) / (bar.volume / volume))
            .collect();
        Reading::from(mean(&quotients))
    }
}

impl ConfigurableFactor for OpeningReturnRatio {
    type Config = OpeningReturnRatioConfig;

    fn with_config(config: Self::Config) -> Self {
        Self {
            name: format!("trade_top{}{}retRatio", config.side.label(), config.bars),
            config,
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
