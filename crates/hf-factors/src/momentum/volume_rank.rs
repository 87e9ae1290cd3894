//! Volume-ranked momentum.
//!
//! Compounds the gross returns (`close / open`) of the minutes with the highest
//! or lowest traded volume of the day. Ties at the cut-off volume are all kept,
//! so more than `bars` minutes may be compounded.

use crate::{
    DayBars, Factor, FactorCategory,
    traits::{ConfigurableFactor, Reading},
};
use serde::{Deserialize, Serialize};

/// Which end of the volume ranking to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeSide {
    /// Heaviest-traded minutes.
    Top,
    /// Lightest-traded minutes.
    Bottom,
}

/// Configuration for [`VolumeRankMomentum`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRankMomentumConfig {
    /// Number of minutes to select.
    pub bars: usize,
    /// Heaviest or lightest minutes.
    pub side: VolumeSide,
}

impl Default for VolumeRankMomentumConfig {
    fn default() -> Self {
        Self {
            bars: 20,
            side: VolumeSide::Top,
        }
    }
}

/// Momentum of the top or bottom K minutes by volume.
#[derive(Debug, Clone)]
pub struct VolumeRankMomentum {
    config: VolumeRankMomentumConfig,
    name: String,
    description: String,
}

impl VolumeRankMomentum {
    /// Top-20 volume momentum.
    pub fn new() -> Self {
        Self::with_config(VolumeRankMomentumConfig::default())
    }
}

impl Default for VolumeRankMomentum {
    fn default() -> Self {
        Self::new()
    }
}

impl Factor for VolumeRankMomentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Momentum
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        if day.is_empty() || self.config.bars == 0 {
            return Reading::Absent;
        }

        let mut volumes = day.volumes();
        match self.config.side {
            VolumeSide::Top => volumes.sort_by(|a, b| b.total_cmp(a)),
            VolumeSide::Bottom => volumes.sort_by(|a, b| a.total_cmp(b)),
        }
        let cutoff = volumes[self.config.bars.min(volumes.len()) - 1];

        let product: f64 = day
            .bars
            .iter()
            .filter(|bar| match self.config.side {
                VolumeSide::Top => bar.volume >= cutoff,
                VolumeSide::Bottom => bar.volume <= cutoff,
            })
            .map(|bar| bar.ratio())
            .product();
        Reading::from(product - 1.0)
    }
}

impl ConfigurableFactor for VolumeRankMomentum {
    type Config = VolumeRankMomentumConfig;

    fn with_config(config: Self::Config) -> Self {
        let (side, adjective) = match config.side {
            VolumeSide::Top => ("top", "highest"),
            VolumeSide::Bottom => ("bottom", "lowest"),
        };
        Self {
            name: format!("mmt_{side}{}VolumeRet", config.bars),
            description: format!(
                "Compounded return of the {} minutes with the {adjective} volume",
                config.bars
            ),
            config,
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
