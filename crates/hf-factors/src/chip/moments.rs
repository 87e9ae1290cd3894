//! Moments of the chip distribution.

use super::level_masses;
use crate::{
    DayBars,
    stats::{kurtosis, skewness, std_dev},
    traits::Reading,
};

/// Excess kurtosis of the per-level chip masses.
pub fn doc_kurt(day: &DayBars) -> Reading {
    Reading::from(level_masses(day).and_then(|masses| kurtosis(&masses)))
}

/// Skewness of the per-level chip masses.
pub fn doc_skew(day: &DayBars) -> Reading {
    Reading::from(level_masses(day).and_then(|masses| skewness(&masses)))
}

/// Sample standard deviation of the per-level chip masses.
pub fn doc_std(day: &DayBars) -> Reading {
    Reading::from(level_masses(day).and_then(|masses| std_dev(&masses, 1)))
}
