//! Chip concentration: the mass held by the heaviest price levels.

use super::level_masses;
use crate::{
    DayBars, Factor, FactorCategory,
    traits::{ConfigurableFactor, Reading},
};
use serde::{Deserialize, Serialize};

/// Configuration for [`ChipConcentration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipConcentrationConfig {
    /// Number of heaviest price levels to sum.
    pub levels: usize,
}

impl Default for ChipConcentrationConfig {
    fn default() -> Self {
        Self { levels: 10 }
    }
}

/// Share of the day's volume traded at its `levels` heaviest price levels.
///
/// A day with fewer distinct levels sums all of them and scores 1.
#[derive(Debug, Clone)]
pub struct ChipConcentration {
    config: ChipConcentrationConfig,
    name: String,
}

impl ChipConcentration {
    /// The ten heaviest levels, `doc_vol10_ratio`.
    pub fn new() -> Self {
        Self::with_config(ChipConcentrationConfig::default())
    }
}

impl Default for ChipConcentration {
    fn default() -> Self {
        Self::new()
    }
}

impl Factor for ChipConcentration {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Chip mass held by the heaviest price levels"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Chip
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        let Some(mut masses) = level_masses(day) else {
            return Reading::Null;
        };
        masses.sort_by(|a, b| b.total_cmp(a));
        Reading::from(masses.iter().take(self.config.levels).sum::<f64>())
    }
}

impl ConfigurableFactor for ChipConcentration {
    type Config = ChipConcentrationConfig;

    fn with_config(config: Self::Config) -> Self {
        Self {
            name: format!("doc_vol{}_ratio", config.levels),
            config,
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bar, session_day};
    use approx::assert_relative_eq;

    #[test]
    fn test_top_levels() {
        // 240 distinct closes, volume i + 1: the top five hold 236..=240.
        let minutes =
            session_day(|i, time| bar(time, 10.0, 10.0 + i as f64 * 0.01, i as f64 + 1.0));
        let total: f64 = (1..=240).map(f64::from).sum();

        let top5 = ChipConcentration::with_config(ChipConcentrationConfig { levels: 5 });
        assert_eq!(top5.name(), "doc_vol5_ratio");
        assert_relative_eq!(
            top5.compute_day(&minutes).value().unwrap(),
            (236..=240).map(f64::from).sum::<f64>() / total,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_few_levels_sum_to_one() {
        let minutes = session_day(|i, time| {
            let close = if i % 2 == 0 { 10.0 } else { 11.0 };
            bar(time, 10.0, close, 1.0)
        });
        let top50 = ChipConcentration::with_config(ChipConcentrationConfig { levels: 50 });
        assert_relative_eq!(top50.compute_day(&minutes).value().unwrap(), 1.0, epsilon = 1e-12);
    }
}
