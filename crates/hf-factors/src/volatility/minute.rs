//! Minute-level dispersion.

use crate::{DayBars, MinuteBar, stats::std_dev, traits::Reading};

fn sample_std(values: &[f64]) -> Reading {
    Reading::from(std_dev(values, 1))
}

/// Standard deviation of minute volume.
pub fn vol_volume1min(day: &DayBars) -> Reading {
    sample_std(&day.volumes())
}

/// Standard deviation of the minute high/low ratio.
pub fn vol_range1min(day: &DayBars) -> Reading {
    let ranges: Vec<f64> = day.bars.iter().map(MinuteBar::range).collect();
    sample_std(&ranges)
}

/// Standard deviation of minute returns.
pub fn vol_return1min(day: &DayBars) -> Reading {
    sample_std(&day.returns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bar, day, session_times};
    use approx::assert_relative_eq;

    #[test]
    fn test_minute_std() {
        let times = session_times();
        let minutes = day(vec![
            bar(times[0], 10.0, 11.0, 100.0),
            bar(times[1], 10.0, 9.0, 300.0),
        ]);

        // returns 0.1 and -0.1: sample std = sqrt(0.02)
        assert_relative_eq!(
            vol_return1min(&minutes).value().unwrap(),
            0.02_f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            vol_volume1min(&minutes).value().unwrap(),
            20_000.0_f64.sqrt(),
            epsilon = 1e-9
        );
        // ranges 1.1 and 10/9
        let ranges = [11.0 / 10.0, 10.0 / 9.0];
        let expected = std_dev(&ranges, 1).unwrap();
        assert_relative_eq!(vol_range1min(&minutes).value().unwrap(), expected);
    }

    #[test]
    fn test_single_bar_is_null() {
        let minutes = day(vec![bar(session_times()[0], 10.0, 11.0, 100.0)]);
        assert_eq!(vol_return1min(&minutes), Reading::Null);
    }
}
