//! Chip distribution factors - how the day's volume is spread over price
//!
//! Every bar deposits its share of the day's volume ("chip mass") at the price
//! level `close / close_last`, where `close_last` is the day's final close.
//! Masses at equal levels are summed. The factors then describe the shape and
//! concentration of that distribution. A day without volume has no
//! distribution and scores null everywhere.

pub mod concentration;
pub mod moments;
pub mod pdf;

pub use concentration::{ChipConcentration, ChipConcentrationConfig};
pub use moments::{doc_kurt, doc_skew, doc_std};
pub use pdf::{ChipPdf, ChipPdfConfig};

use crate::{
    DayBars, Factor, FactorCategory,
    traits::{ConfigurableFactor, DayKernel, KernelFactor},
};
use std::sync::Arc;

/// Each bar's price level and chip mass, in bar order.
pub(crate) fn bar_chips(day: &DayBars) -> Option<Vec<(f64, f64)>> {
    let close_last = day.bars.last()?.close;
    let shares = day.volume_shares()?;
    Some(
        day.bars
            .iter()
            .zip(shares)
            .map(|(bar, share)| (bar.close / close_last, share))
            .collect(),
    )
}

/// Chip mass summed per distinct level, ordered by level.
pub(crate) fn level_masses(day: &DayBars) -> Option<Vec<f64>> {
    let mut chips = bar_chips(day)?;
    chips.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut masses: Vec<f64> = Vec::with_capacity(chips.len());
    let mut previous: Option<f64> = None;
    for (level, mass) in chips {
        match (previous, masses.last_mut()) {
            (Some(p), Some(last)) if p == level => *last += mass,
            _ => masses.push(mass),
        }
        previous = Some(level);
    }
    Some(masses)
}

/// Every chip distribution aggregator with its default configurations.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let moments: [(&'static str, &'static str, DayKernel); 3] = [
        (
            "doc_kurt",
            "Excess kurtosis of chip mass across price levels",
            doc_kurt,
        ),
        (
            "doc_skew",
            "Skewness of chip mass across price levels",
            doc_skew,
        ),
        (
            "doc_std",
            "Standard deviation of chip mass across price levels",
            doc_std,
        ),
    ];
    let mut factors: Vec<Arc<dyn Factor>> = moments
        .into_iter()
        .map(|(name, description, kernel)| {
            Arc::new(KernelFactor::new(name, description, FactorCategory::Chip, kernel))
                as Arc<dyn Factor>
        })
        .collect();

    for threshold in ChipPdfConfig::THRESHOLDS {
        factors.push(Arc::new(ChipPdf::with_config(ChipPdfConfig { threshold })));
    }
    for levels in [5, 10, 50] {
        factors.push(Arc::new(ChipConcentration::with_config(
            ChipConcentrationConfig { levels },
        )));
    }

    factors
}
