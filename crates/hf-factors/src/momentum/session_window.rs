//! Session-window momentum.
//!
//! Each factor is the gross return between the first open and the last close
//! inside a fixed clock window of the trading day:
//!
//! | Factor | Window |
//! |---|---|
//! | `mmt_am` | 09:30 - 11:29 |
//! | `mmt_pm` | 13:00 - 14:59 |
//! | `mmt_last30` | 14:30 - 14:59 |
//! | `mmt_between` | 10:00 - 14:29 |
//!
//! A day with no bar inside the window produces no row.

use crate::{
    DayBars, MinuteBar,
    bars::session::{
        AM_CLOSE, AM_LAST, CLOSE_HALF_HOUR, OPEN, OPEN_HALF_HOUR, PM_LAST, PM_OPEN,
        PRE_CLOSE_HALF_HOUR,
    },
    traits::Reading,
};

fn window_momentum(day: &DayBars, start: i64, end: i64) -> Reading {
    match day.between(start, end) {
        [] => Reading::Absent,
        bars => Reading::from(bars[bars.len() - 1].close / bars[0].open),
    }
}

/// Morning momentum.
pub fn mmt_am(day: &DayBars) -> Reading {
    window_momentum(day, OPEN, AM_LAST)
}

/// Afternoon momentum.
pub fn mmt_pm(day: &DayBars) -> Reading {
    window_momentum(day, PM_OPEN, PM_LAST)
}

/// Momentum of the last half hour.
pub fn mmt_last30(day: &DayBars) -> Reading {
    window_momentum(day, CLOSE_HALF_HOUR, PM_LAST)
}

/// Momentum with the first and last half hours removed.
pub fn mmt_between(day: &DayBars) -> Reading {
    window_momentum(day, OPEN_HALF_HOUR, PRE_CLOSE_HALF_HOUR)
}

fn half_return(bars: &[MinuteBar]) -> Option<f64> {
    Some(bars.last()?.close / bars.first()?.open - 1.0)
}

/// Afternoon return minus morning return.
///
/// Bars up to 11:30 belong to the morning. A day trading in only one half
/// scores zero.
pub fn mmt_paratio(day: &DayBars) -> Reading {
    let (am, pm) = day.bars.split_at(day.until(AM_CLOSE).len());
    match (half_return(am), half_return(pm)) {
        (Some(am), Some(pm)) => Reading::from(pm - am),
        (Some(_), None) | (None, Some(_)) => Reading::Value(0.0),
        (None, None) => Reading::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::session::clock;
    use crate::testing::{bar, day, session_day};
    use approx::assert_relative_eq;

    #[test]
    fn test_mmt_am_is_pure_ratio() {
        // Open 10 at 09:30, close drifts to 10.5 by 11:29.
        let day = session_day(|i, time| {
            let close = if i == 119 { 10.5 } else { 10.0 + i as f64 * 0.001 };
            bar(time, if i == 0 { 10.0 } else { 10.2 }, close, 100.0)
        });

        assert_eq!(mmt_am(&day), Reading::Value(10.5 / 10.0));
    }

    #[test]
    fn test_window_momentum_edges() {
        let day = session_day(|i, time| bar(time, 10.0 + i as f64, 11.0 + i as f64, 1.0));

        // 13:00 is index 120, 14:59 index 239, 14:30 index 210, 10:00 index 30, 14:29 index 209.
        assert_relative_eq!(mmt_pm(&day).value().unwrap(), 250.0 / 130.0);
        assert_relative_eq!(mmt_last30(&day).value().unwrap(), 250.0 / 220.0);
        assert_relative_eq!(mmt_between(&day).value().unwrap(), 220.0 / 40.0);
    }

    #[test]
    fn test_window_without_bars_is_absent() {
        let afternoon = day(vec![bar(clock(13, 5), 10.0, 11.0, 1.0)]);
        assert_eq!(mmt_am(&afternoon), Reading::Absent);
        assert_eq!(mmt_last30(&afternoon), Reading::Absent);
        assert!(mmt_pm(&afternoon).value().is_some());
    }

    #[test]
    fn test_mmt_paratio() {
        let both = day(vec![
            bar(clock(9, 30), 10.0, 10.0, 1.0),
            bar(clock(11, 30), 10.0, 11.0, 1.0),
            bar(clock(13, 0), 11.0, 11.0, 1.0),
            bar(clock(14, 59), 11.0, 12.1, 1.0),
        ]);
        // am: 11/10 - 1 = 0.1, pm: 12.1/11 - 1 = 0.1
        assert_relative_eq!(mmt_paratio(&both).value().unwrap(), 0.0, epsilon = 1e-12);

        let morning_only = day(vec![bar(clock(9, 30), 10.0, 12.0, 1.0)]);
        assert_eq!(mmt_paratio(&morning_only), Reading::Value(0.0));
    }
}
