//! Volatility factors - dispersion of minute bars
//!
//! Intraday standard deviations of volume, high/low range and bar return, plus
//! upside and downside semi-volatility and their share of total volatility.

pub mod minute;
pub mod semi;

pub use minute::{vol_range1min, vol_return1min, vol_volume1min};
pub use semi::{vol_down_ratio, vol_down_vol, vol_up_ratio, vol_up_vol};

use crate::{
    Factor, FactorCategory,
    traits::{DayKernel, KernelFactor},
};
use std::sync::Arc;

/// Every volatility aggregator.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let kernels: [(&'static str, &'static str, DayKernel); 7] = [
        (
            "vol_volume1min",
            "Standard deviation of minute volume",
            vol_volume1min,
        ),
        (
            "vol_range1min",
            "Standard deviation of minute high/low ratio",
            vol_range1min,
        ),
        (
            "vol_return1min",
            "Standard deviation of minute returns",
            vol_return1min,
        ),
        (
            "vol_upVol",
            "Standard deviation of positive minute returns",
            vol_up_vol,
        ),
        (
            "vol_upRatio",
            "Upside volatility as a share of total minute volatility",
            vol_up_ratio,
        ),
        (
            "vol_downVol",
            "Standard deviation of negative minute returns",
            vol_down_vol,
        ),
        (
            "vol_downRatio",
            "Downside volatility as a share of total minute volatility",
            vol_down_ratio,
        ),
    ];

    kernels
        .into_iter()
        .map(|(name, description, kernel)| {
            Arc::new(KernelFactor::new(
                name,
                description,
                FactorCategory::Volatility,
                kernel,
            )) as Arc<dyn Factor>
        })
        .collect()
}
