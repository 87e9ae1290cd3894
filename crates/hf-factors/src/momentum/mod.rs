//! Momentum factors - intraday trend and reversal
//!
//! Momentum factors compare prices at the edges of a session window, regress
//! minute highs on lows over a trailing window, or compound the returns of the
//! heaviest and lightest traded minutes.

pub mod qrs;
pub mod session_window;
pub mod volume_rank;

pub use qrs::{QrsStatistic, RollingQrs, RollingQrsConfig};
pub use session_window::{mmt_am, mmt_between, mmt_last30, mmt_paratio, mmt_pm};
pub use volume_rank::{VolumeRankMomentum, VolumeRankMomentumConfig, VolumeSide};

use crate::{
    Factor, FactorCategory,
    traits::{ConfigurableFactor, KernelFactor},
};
use std::sync::Arc;

/// Every momentum aggregator with its default configuration.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let mut factors: Vec<Arc<dyn Factor>> = vec![
        Arc::new(KernelFactor::new(
            "mmt_am",
            "Morning momentum: 11:29 close over 09:30 open",
            FactorCategory::Momentum,
            mmt_am,
        )),
        Arc::new(KernelFactor::new(
            "mmt_pm",
            "Afternoon momentum: 14:59 close over 13:00 open",
            FactorCategory::Momentum,
            mmt_pm,
        )),
        Arc::new(KernelFactor::new(
            "mmt_last30",
            "Last half hour momentum: 14:59 close over 14:30 open",
            FactorCategory::Momentum,
            mmt_last30,
        )),
        Arc::new(KernelFactor::new(
            "mmt_between",
            "Momentum excluding the first and last 30 minutes",
            FactorCategory::Momentum,
            mmt_between,
        )),
        Arc::new(KernelFactor::new(
            "mmt_paratio",
            "Afternoon session return minus morning session return",
            FactorCategory::Momentum,
            mmt_paratio,
        )),
    ];

    for statistic in QrsStatistic::ALL {
        factors.push(Arc::new(RollingQrs::with_config(RollingQrsConfig {
            statistic,
            ..Default::default()
        })));
    }

    for side in [VolumeSide::Top, VolumeSide::Bottom] {
        for bars in [20, 50] {
            factors.push(Arc::new(VolumeRankMomentum::with_config(
                VolumeRankMomentumConfig { bars, side },
            )));
        }
    }

    factors
}
