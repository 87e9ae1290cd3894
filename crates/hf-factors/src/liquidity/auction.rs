//! Auction and closing-window volume.
//!
//! The first bar of the day stands in for the opening call auction and bars
//! from 14:57 on for the closing call auction.

use crate::{DayBars, MinuteBar, bars::session::CLOSING_CALL, traits::Reading};

fn summed_volume(bars: &[MinuteBar]) -> Reading {
    if bars.is_empty() {
        return Reading::Absent;
    }
    Reading::from(bars.iter().map(|bar| bar.volume).sum::<f64>())
}

fn share_of_day(day: &DayBars, volume: f64) -> Reading {
    let total = day.total_volume();
    if total == 0.0 {
        Reading::Null
    } else {
        Reading::from(volume / total)
    }
}

/// Volume traded before the closing call.
pub fn liq_closeprevol(day: &DayBars) -> Reading {
    summed_volume(day.before(CLOSING_CALL))
}

/// Volume traded in the closing call window.
pub fn liq_closevol(day: &DayBars) -> Reading {
    summed_volume(day.from_time(CLOSING_CALL))
}

/// Share of the day's volume in the first bar.
pub fn liq_first_call_ratio(day: &DayBars) -> Reading {
    match day.bars.first() {
        Some(first) => share_of_day(day, first.volume),
        None => Reading::Absent,
    }
}

/// Share of the day's volume in the closing call window.
pub fn liq_last_call_ratio(day: &DayBars) -> Reading {
    if day.is_empty() {
        return Reading::Absent;
    }
    let closing: f64 = day.from_time(CLOSING_CALL).iter().map(|bar| bar.volume).sum();
    share_of_day(day, closing)
}

/// Volume of the first bar.
pub fn liq_openvol(day: &DayBars) -> Reading {
    day.bars
        .first()
        .map_or(Reading::Absent, |first| Reading::from(first.volume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::session::clock;
    use crate::testing::{bar, day};
    use rstest::rstest;

    fn closing_day() -> DayBars {
        day(vec![
            bar(clock(9, 30), 10.0, 10.0, 400.0),
            bar(clock(10, 0), 10.0, 10.0, 100.0),
            bar(clock(14, 56), 10.0, 10.0, 100.0),
            bar(clock(14, 57), 10.0, 10.0, 150.0),
            bar(clock(15, 0), 10.0, 10.0, 250.0),
        ])
    }

    #[rstest]
    #[case(liq_closeprevol, 600.0)]
    #[case(liq_closevol, 400.0)]
    #[case(liq_first_call_ratio, 0.4)]
    #[case(liq_last_call_ratio, 0.4)]
    #[case(liq_openvol, 400.0)]
    fn test_closing_day(#[case] kernel: fn(&DayBars) -> Reading, #[case] expected: f64) {
        assert_eq!(kernel(&closing_day()), Reading::Value(expected));
    }

    #[test]
    fn test_missing_side_is_absent() {
        let morning = day(vec![bar(clock(9, 30), 10.0, 10.0, 10.0)]);
        assert_eq!(liq_closevol(&morning), Reading::Absent);
        assert_eq!(liq_closeprevol(&morning), Reading::Value(10.0));
        assert_eq!(liq_last_call_ratio(&morning), Reading::Value(0.0));
    }

    #[test]
    fn test_zero_volume_ratios_are_null() {
        let quiet = day(vec![
            bar(clock(9, 30), 10.0, 10.0, 0.0),
            bar(clock(14, 58), 10.0, 10.0, 0.0),
        ]);
        assert_eq!(liq_first_call_ratio(&quiet), Reading::Null);
        assert_eq!(liq_last_call_ratio(&quiet), Reading::Null);
        assert_eq!(liq_openvol(&quiet), Reading::Value(0.0));
    }
}
