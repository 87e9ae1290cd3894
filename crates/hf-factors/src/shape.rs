//! Higher-order shape factors - skewness and kurtosis of the intraday distribution
//!
//! The return variants describe the distribution of bar returns, the volume
//! variants that of each bar's share of the day's volume. Moments are the
//! biased (population) estimators and kurtosis is reported in excess of 3.

use crate::{
    DayBars, Factor, FactorCategory,
    stats::{kurtosis, skewness},
    traits::{DayKernel, KernelFactor, Reading},
};
use std::sync::Arc;

fn skew_over_kurt(xs: &[f64]) -> Reading {
    match (skewness(xs), kurtosis(xs)) {
        (Some(skew), Some(kurt)) if kurt != 0.0 => Reading::from(skew / kurt),
        _ => Reading::Null,
    }
}

/// Skewness of bar returns.
pub fn shape_skew(day: &DayBars) -> Reading {
    Reading::from(skewness(&day.returns()))
}

/// Excess kurtosis of bar returns.
pub fn shape_kurt(day: &DayBars) -> Reading {
    Reading::from(kurtosis(&day.returns()))
}

/// Return skewness over return kurtosis.
pub fn shape_skratio(day: &DayBars) -> Reading {
    skew_over_kurt(&day.returns())
}

/// Skewness of volume shares.
pub fn shape_skew_vol(day: &DayBars) -> Reading {
    Reading::from(day.volume_shares().and_then(|shares| skewness(&shares)))
}

/// Excess kurtosis of volume shares.
pub fn shape_kurt_vol(day: &DayBars) -> Reading {
    Reading::from(day.volume_shares().and_then(|shares| kurtosis(&shares)))
}

/// Volume-share skewness over volume-share kurtosis.
pub fn shape_skratio_vol(day: &DayBars) -> Reading {
    day.volume_shares()
        .map_or(Reading::Null, |shares| skew_over_kurt(&shares))
}

/// Every shape aggregator.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let kernels: [(&'static str, &'static str, DayKernel); 6] = [
        ("shape_skew", "Skewness of minute returns", shape_skew),
        ("shape_kurt", "Excess kurtosis of minute returns", shape_kurt),
        (
            "shape_skratio",
            "Skewness over kurtosis of minute returns",
            shape_skratio,
        ),
        ("shape_skewVol", "Skewness of minute volume shares", shape_skew_vol),
        (
            "shape_kurtVol",
            "Excess kurtosis of minute volume shares",
            shape_kurt_vol,
        ),
        (
            "shape_skratioVol",
            "Skewness over kurtosis of minute volume shares",
            shape_skratio_vol,
        ),
    ];

    kernels
        .into_iter()
        .map(|(name, description, kernel)| {
            Arc::new(KernelFactor::new(name, description, FactorCategory::Shape, kernel))
                as Arc<dyn Factor>
        })
        .collect()
}
