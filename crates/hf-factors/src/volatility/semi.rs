//! Upside and downside semi-volatility.
//!
//! The conditional standard deviation only uses returns strictly above (or
//! below) zero and is zero when that sub-population cannot produce one. The
//! ratio factors divide it by the standard deviation of all returns and are
//! null when that is zero or undefined.

use crate::{DayBars, stats::std_dev, traits::Reading};

fn conditional_std(returns: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let subset: Vec<f64> = returns.iter().copied().filter(|r| keep(*r)).collect();
    std_dev(&subset, 1).unwrap_or(0.0)
}

fn share_of_total(returns: &[f64], conditional: f64) -> Reading {
    match std_dev(returns, 1) {
        Some(total) if total != 0.0 => Reading::from(conditional / total),
        _ => Reading::Null,
    }
}

/// Standard deviation of positive minute returns.
pub fn vol_up_vol(day: &DayBars) -> Reading {
    Reading::from(conditional_std(&day.returns(), |r| r > 0.0))
}

/// Standard deviation of negative minute returns.
pub fn vol_down_vol(day: &DayBars) -> Reading {
    Reading::from(conditional_std(&day.returns(), |r| r < 0.0))
}

/// Upside volatility over total volatility.
pub fn vol_up_ratio(day: &DayBars) -> Reading {
    let returns = day.returns();
    share_of_total(&returns, conditional_std(&returns, |r| r > 0.0))
}

/// Downside volatility over total volatility.
pub fn vol_down_ratio(day: &DayBars) -> Reading {
    let returns = day.returns();
    share_of_total(&returns, conditional_std(&returns, |r| r < 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bar, day, session_times};
    use approx::assert_relative_eq;

    #[test]
    fn test_semi_volatility() {
        let times = session_times();
        let minutes = day(vec![
            bar(times[0], 10.0, 11.0, 1.0),
            bar(times[1], 10.0, 12.0, 1.0),
            bar(times[2], 10.0, 9.0, 1.0),
        ]);

        let up = vol_up_vol(&minutes).value().unwrap();
        assert_relative_eq!(up, std_dev(&[0.1, 0.2], 1).unwrap(), epsilon = 1e-12);

        // A single negative return has no sample deviation.
        assert_eq!(vol_down_vol(&minutes), Reading::Value(0.0));
        assert_eq!(vol_down_ratio(&minutes), Reading::Value(0.0));

        let total = std_dev(&minutes.returns(), 1).unwrap();
        assert_relative_eq!(vol_up_ratio(&minutes).value().unwrap(), up / total, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_day() {
        let times = session_times();
        let minutes = day(vec![
            bar(times[0], 10.0, 10.0, 1.0),
            bar(times[1], 10.0, 10.0, 1.0),
        ]);

        assert_eq!(vol_up_vol(&minutes), Reading::Value(0.0));
        assert_eq!(vol_up_ratio(&minutes), Reading::Null);
        assert_eq!(vol_down_ratio(&minutes), Reading::Null);
    }
}
