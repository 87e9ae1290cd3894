//! Chip distribution quantiles.
//!
//! Price levels are replaced by their average rank among the day's bars, so
//! ties share the mean of the ranks they span. Chip mass is summed per rank and
//! accumulated in ascending rank order. The factor is the first rank at which
//! the running mass exceeds the threshold, or null if it never does.

use super::bar_chips;
use crate::{
    DayBars, Factor, FactorCategory,
    stats::average_rank,
    traits::{ConfigurableFactor, Reading},
};
use serde::{Deserialize, Serialize};

/// Configuration for [`ChipPdf`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipPdfConfig {
    /// Cumulative mass that must be exceeded, in `(0, 1)`.
    pub threshold: f64,
}

impl ChipPdfConfig {
    /// Thresholds registered by default.
    pub const THRESHOLDS: [f64; 5] = [0.6, 0.7, 0.8, 0.9, 0.95];
}

impl Default for ChipPdfConfig {
    fn default() -> Self {
        Self { threshold: 0.6 }
    }
}

/// Rank at which the chip distribution's cumulative mass passes a threshold.
#[derive(Debug, Clone)]
pub struct ChipPdf {
    config: ChipPdfConfig,
    name: String,
    description: String,
}

impl ChipPdf {
    /// The 60% quantile, `doc_pdf60`.
    pub fn new() -> Self {
        Self::with_config(ChipPdfConfig::default())
    }
}

impl Default for ChipPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl Factor for ChipPdf {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Chip
    }

    fn compute_day(&self, day: &DayBars) -> Reading {
        let Some(chips) = bar_chips(day) else {
            return Reading::Null;
        };
        let levels: Vec<f64> = chips.iter().map(|(level, _)| *level).collect();
        let mut ranked: Vec<(f64, f64)> = average_rank(&levels)
            .into_iter()
            .zip(chips.iter().map(|(_, mass)| *mass))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut cumulative = 0.0;
        let mut i = 0;
        while i < ranked.len() {
            let rank = ranked[i].0;
            while i < ranked.len() && ranked[i].0 == rank {
                cumulative += ranked[i].1;
                i += 1;
            }
            if cumulative > self.config.threshold {
                return Reading::Value(rank);
            }
        }
        Reading::Null
    }
}

impl ConfigurableFactor for ChipPdf {
    type Config = ChipPdfConfig;

    fn with_config(config: Self::Config) -> Self {
        let percent = (config.threshold * 100.0).round() as i64;
        Self {
            name: format!("doc_pdf{percent}"),
            description: format!(
                "Price rank at which cumulative chip mass exceeds {percent}%"
            ),
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
    use crate::testing::{bar, day, session_times};
    use rstest::rstest;

    fn pdf(threshold: f64) -> ChipPdf {
        ChipPdf::with_config(ChipPdfConfig { threshold })
    }

    /// Levels 0.8, 0.9, 0.9, 1.0 with a quarter of the volume each.
    fn staircase() -> DayBars {
        let times = session_times();
        day(vec![
            bar(times[0], 8.0, 8.0, 1.0),
            bar(times[1], 9.0, 9.0, 1.0),
            bar(times[2], 9.0, 9.0, 1.0),
            bar(times[3], 10.0, 10.0, 1.0),
        ])
    }

    // Ranks 1, 2.5, 4 accumulate 0.25, 0.75, 1.0.
    #[rstest]
    #[case(0.05, 1.0)]
    #[case(0.5, 2.5)]
    #[case(0.75, 4.0)]
    #[case(0.95, 4.0)]
    fn test_quantile_ranks(#[case] threshold: f64, #[case] expected: f64) {
        assert_eq!(pdf(threshold).compute_day(&staircase()), Reading::Value(expected));
    }

    #[test]
    fn test_unreachable_threshold_is_null() {
        assert_eq!(pdf(1.0).compute_day(&staircase()), Reading::Null);
    }

    #[test]
    fn test_names() {
        let names: Vec<String> = ChipPdfConfig::THRESHOLDS
            .iter()
            .map(|&threshold| pdf(threshold).name().to_string())
            .collect();
        assert_eq!(names, ["doc_pdf60", "doc_pdf70", "doc_pdf80", "doc_pdf90", "doc_pdf95"]);
    }
}
