//! Rolling high-on-low regression ("QRS") factors.
//!
//! For every bar, the trailing window holds the same day's bars whose trading
//! minute index lies in `(idx - window, idx]`. The index runs continuously
//! across the lunch break (09:30 is 0, 13:00 is 120), so a window can span both
//! sessions. Windows holding fewer than `window` bars are skipped.
//!
//! Within a window, with `x = low` and `y = high` and population moments:
//!
//! - `beta = cov(x, y) / var(x)`, or `mean(y) / mean(x)` when `var(x) = 0`
//! - `corr = cov / sqrt(var(x) var(y))` and `corr² = cov² / (var(x) var(y))`,
//!   both undefined when either variance is zero
//!
//! The day statistic summarises the sequence of windows. A day without any
//! qualifying window produces no row.

use crate::{
    DayBars, Factor, FactorCategory, MinuteBar,
    bars::session::trade_minute,
    stats::{covariance, mean, std_dev, variance},
    traits::{ConfigurableFactor, Reading},
};
use serde::{Deserialize, Serialize};

/// Day-level summary of the rolling regressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QrsStatistic {
    /// Mean beta.
    BetaMean,
    /// Mean correlation, zero when no window has one.
    CorrMean,
    /// Mean squared correlation, zero when no window has one.
    CorrSquareMean,
    /// Z-score of the last beta against the day's betas.
    BetaZscoreLast,
    /// Beta z-score scaled by the mean squared correlation.
    Qrs,
}

impl QrsStatistic {
    /// Every statistic, in registry order.
    pub const ALL: [Self; 5] = [
        Self::Qrs,
        Self::CorrSquareMean,
        Self::CorrMean,
        Self::BetaMean,
        Self::BetaZscoreLast,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::BetaMean => "mmt_ols_beta_mean",
            Self::CorrMean => "mmt_ols_corr_mean",
            Self::CorrSquareMean => "mmt_ols_corr_square_mean",
            Self::BetaZscoreLast => "mmt_ols_beta_zscore_last",
            Self::Qrs => "mmt_ols_qrs",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::BetaMean => "Mean slope of rolling 50-minute high-on-low regressions",
            Self::CorrMean => "Mean high/low correlation over rolling 50-minute windows",
            Self::CorrSquareMean => "Mean R-squared of rolling 50-minute high-on-low regressions",
            Self::BetaZscoreLast => "Z-score of the last rolling high-on-low slope",
            Self::Qrs => "Rolling high-on-low slope z-score weighted by mean R-squared",
        }
    }
}

/// Configuration for the rolling regression factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingQrsConfig {
    /// Window length in trading minutes, also the minimum bar count per window.
    pub window: usize,
    /// Which day statistic to report.
    pub statistic: QrsStatistic,
}

impl Default for RollingQrsConfig {
    fn default() -> Self {
        Self {
            window: 50,
            statistic: QrsStatistic::Qrs,
        }
    }
}

/// Rolling high-on-low regression factor.
#[derive(Debug, Clone)]
pub struct RollingQrs {
    config: RollingQrsConfig,
}

/// Regression results of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowFit {
    beta: f64,
    corr: Option<f64>,
    corr_square: Option<f64>,
}

fn fit(bars: &[MinuteBar]) -> Option<WindowFit> {
    let lows: Vec<f64> = bars.iter().map(|bar| bar.low).collect();
    let highs: Vec<f64> = bars.iter().map(|bar| bar.high).collect();
    let cov = covariance(&lows, &highs, 0)?;
    let var_x = variance(&lows, 0)?;
    let var_y = variance(&highs, 0)?;

    let beta = if var_x != 0.0 {
        cov / var_x
    } else {
        mean(&highs)? / mean(&lows)?
    };
    let product = var_x * var_y;
    let (corr, corr_square) = if product != 0.0 {
        (Some(cov / product.sqrt()), Some(cov * cov / product))
    } else {
        (None, None)
    };

    Some(WindowFit {
        beta,
        corr,
        corr_square,
    })
}

fn rolling_fits(day: &DayBars, window: usize) -> Vec<WindowFit> {
    let index: Vec<i64> = day.bars.iter().map(|bar| trade_minute(bar.time)).collect();
    let span = window as i64;
    let mut fits = Vec::new();
    let mut start = 0;

    for end in 0..day.bars.len() {
        while start < end && index[start] <= index[end] - span {
            start += 1;
        }
        let bars = &day.bars[start..=end];
        if bars.len() < window {
            continue;
        }
        if let Some(fit) = fit(bars) {
            fits.push(fit);
        }
    }
    fits
}

fn mean_or_zero(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let defined: Vec<f64> = values.flatten().collect();
    mean(&defined).unwrap_or(0.0)
}

impl RollingQrs {
    /// Creates the `mmt_ols_qrs` factor with a 50-minute window.
    pub fn new() -> Self {
        Self {
            config: RollingQrsConfig::default(),
        }
    }

    fn summarise(&self, fits: &[WindowFit]) -> Reading {
        let Some(last) = fits.last() else {
            return Reading::Absent;
        };
        let betas: Vec<f64> = fits.iter().map(|fit| fit.beta).collect();
        let Some(beta_mean) = mean(&betas) else {
            return Reading::Null;
        };
        let beta_std = std_dev(&betas, 1);

        match self.config.statistic {
            QrsStatistic::BetaMean => Reading::Value(beta_mean),
            QrsStatistic::CorrMean => Reading::from(mean_or_zero(fits.iter().map(|f| f.corr))),
            QrsStatistic::CorrSquareMean => {
                Reading::from(mean_or_zero(fits.iter().map(|f| f.corr_square)))
            }
            QrsStatistic::BetaZscoreLast => match beta_std {
                Some(std) if std > 0.0 => Reading::from((last.beta - beta_mean) / std),
                _ => Reading::Value(beta_mean),
            },
            QrsStatistic::Qrs => {
                let squares: Vec<f64> = fits.iter().filter_map(|f| f.corr_square).collect();
                match (beta_std, mean(&squares)) {
                    (Some(std), Some(r2)) if std != 0.0 => {
                        Reading::from(r2 * (last.beta - beta_mean) / std)
                    }
                    _ => Reading::Value(0.0),
                }
            }
        }
    }
}

impl Default for RollingQrs {
    fn default() -> Self {
        Self::new()
    }
}

impl Factor for RollingQrs {
    fn name(&self) -> &str {
        self.config.statistic.name()
    }

    fn description(&self) -> &str {
        self.config.statistic.description()
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Momentum
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        self.summarise(&rolling_fits(day, self.config.window))
    }
}

impl ConfigurableFactor for RollingQrs {
    type Config = RollingQrsConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
