//! Liquidity factors - price impact and auction participation
//!
//! Liquidity factors relate price movement to traded volume and measure how
//! much of the day's volume trades around the opening and closing auctions.

pub mod amihud;
pub mod auction;

pub use amihud::liq_amihud_1min;
pub use auction::{
    liq_closeprevol, liq_closevol, liq_first_call_ratio, liq_last_call_ratio, liq_openvol,
};

use crate::{
    Factor, FactorCategory,
    traits::{DayKernel, KernelFactor},
};
use std::sync::Arc;

/// Every liquidity aggregator.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let kernels: [(&'static str, &'static str, DayKernel); 6] = [
        (
            "liq_amihud_1min",
            "Sum of absolute minute price change per unit volume",
            liq_amihud_1min,
        ),
        (
            "liq_closeprevol",
            "Volume traded before the 14:57 closing call",
            liq_closeprevol,
        ),
        (
            "liq_closevol",
            "Volume traded from the 14:57 closing call on",
            liq_closevol,
        ),
        (
            "liq_firstCallR",
            "First bar volume as a share of day volume",
            liq_first_call_ratio,
        ),
        (
            "liq_lastCallR",
            "Closing call volume as a share of day volume",
            liq_last_call_ratio,
        ),
        ("liq_openvol", "Volume of the first bar", liq_openvol),
    ];

    kernels
        .into_iter()
        .map(|(name, description, kernel)| {
            Arc::new(KernelFactor::new(
                name,
                description,
                FactorCategory::Liquidity,
                kernel,
            )) as Arc<dyn Factor>
        })
        .collect()
}
