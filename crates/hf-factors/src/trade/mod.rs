//! Trade timing factors - where in the day volume and return coincide
//!
//! These factors weight bar returns by volume over the opening and closing
//! bars of the day, and measure the share of volume traded in the first and
//! last half hours.

pub mod closing;
pub mod opening;
pub mod session_share;

pub use closing::{ClosingReturnRatio, ClosingReturnRatioConfig};
pub use opening::{OpeningReturnRatio, OpeningReturnRatioConfig, ReturnSide};
pub use session_share::{NO_VOLUME_SHARE, trade_head_ratio, trade_tail_ratio};

use crate::{
    Factor, FactorCategory,
    traits::{ConfigurableFactor, KernelFactor},
};
use std::sync::Arc;

/// Every trade timing aggregator with its default configurations.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let mut factors: Vec<Arc<dyn Factor>> = Vec::new();

    for bars in [20, 50] {
        factors.push(Arc::new(ClosingReturnRatio::with_config(
            ClosingReturnRatioConfig { bars },
        )));
    }

    factors.push(Arc::new(KernelFactor::new(
        "trade_headRatio",
        "Share of day volume traded up to 10:00",
        FactorCategory::Trade,
        trade_head_ratio,
    )));
    factors.push(Arc::new(KernelFactor::new(
        "trade_tailRatio",
        "Share of day volume traded from 14:30",
        FactorCategory::Trade,
        trade_tail_ratio,
    )));

    for side in [ReturnSide::All, ReturnSide::Positive, ReturnSide::Negative] {
        for bars in [20, 50] {
            factors.push(Arc::new(OpeningReturnRatio::with_config(
                OpeningReturnRatioConfig { bars, side },
            )));
        }
    }

    factors
}
