//! Shared fixtures for unit tests.

use crate::{DayBars, MinuteBar, bars::session::clock};
use chrono::NaiveDate;

pub(crate) fn trade_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// The 240 continuous-trading minutes, 09:30-11:29 and 13:00-14:59.
pub(crate) fn session_times() -> Vec<i64> {
    let morning = (0..120).map(|i| clock(9 + (30 + i) / 60, (30 + i) % 60));
    let afternoon = (0..120).map(|i| clock(13 + i / 60, i % 60));
    morning.chain(afternoon).collect()
}

pub(crate) fn bar(time: i64, open: f64, close: f64, volume: f64) -> MinuteBar {
    MinuteBar {
        time,
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume,
    }
}

pub(crate) fn day(bars: Vec<MinuteBar>) -> DayBars {
    DayBars::new("000001", trade_date(), bars)
}

/// A full session built bar by bar from `(index, time)`.
pub(crate) fn session_day(make: impl Fn(usize, i64) -> MinuteBar) -> DayBars {
    day(session_times()
        .into_iter()
        .enumerate()
        .map(|(i, time)| make(i, time))
        .collect())
}

#[test]
fn test_session_times() {
    let times = session_times();
    assert_eq!(times.len(), 240);
    assert_eq!(times[0], clock(9, 30));
    assert_eq!(times[119], clock(11, 29));
    assert_eq!(times[120], clock(13, 0));
    assert_eq!(times[239], clock(14, 59));
}
