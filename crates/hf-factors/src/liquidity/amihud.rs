//! Intraday Amihud illiquidity.

use crate::{DayBars, stats::pct_change, traits::Reading};

/// Minute-level Amihud illiquidity.
///
/// Sums the ratio of absolute close-to-close change to traded volume over the
/// day's bars. This measures the price impact per share traded, a proxy for
/// intraday illiquidity.
///
/// # Interpretation
///
/// - **Higher values**: prices move more per unit of volume, less liquid
/// - **Lower values**: prices absorb volume with little movement, more liquid
///
/// # Computation
///
/// 1. `pct_t = close_t / close_{t-1} - 1`
/// 2. `illiq_t = |pct_t| / volume_t`
/// 3. Sum over the day's bars
///
/// The first bar has no previous close and contributes zero, as does every bar
/// without volume. A day with no volume at all therefore scores zero.
pub fn liq_amihud_1min(day: &DayBars) -> Reading {
    let changes = pct_change(&day.closes());
    let illiq: f64 = day
        .bars
        .iter()
        .zip(changes)
        .filter_map(|(bar, pct)| match pct {
            Some(pct) if bar.volume != 0.0 => Some(pct.abs() / bar.volume),
            _ => None,
        })
        .sum();
    Reading::from(illiq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bar, day, session_times};
    use approx::assert_relative_eq;

    #[test]
    fn test_amihud() {
        let times = session_times();
        let minutes = day(vec![
            bar(times[0], 10.0, 10.0, 500.0),
            bar(times[1], 10.0, 11.0, 100.0),
            bar(times[2], 11.0, 9.9, 0.0),
            bar(times[3], 9.9, 9.9, 50.0),
        ]);

        // Only the second bar moves with volume: 0.1 / 100.
        assert_relative_eq!(
            liq_amihud_1min(&minutes).value().unwrap(),
            0.001,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_volume_day() {
        let times = session_times();
        let minutes = day(vec![
            bar(times[0], 10.0, 10.0, 0.0),
            bar(times[1], 10.0, 12.0, 0.0),
        ]);
        assert_eq!(liq_amihud_1min(&minutes), Reading::Value(0.0));
    }
}
