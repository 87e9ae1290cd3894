//! Opening and closing half-hour volume shares.

use crate::{
    DayBars, MinuteBar,
    bars::session::{CLOSE_HALF_HOUR, OPEN_HALF_HOUR},
    traits::Reading,
};

/// Share reported for a day that traded nothing.
pub const NO_VOLUME_SHARE: f64 = 0.125;

fn share(day: &DayBars, part: &[MinuteBar]) -> Reading {
    let total = day.total_volume();
    if total > 0.0 {
        Reading::from(part.iter().map(|bar| bar.volume).sum::<f64>() / total)
    } else {
        Reading::Value(NO_VOLUME_SHARE)
    }
}

/// Share of the day's volume traded up to 10:00.
pub fn trade_head_ratio(day: &DayBars) -> Reading {
    share(day, day.until(OPEN_HALF_HOUR))
}

/// Share of the day's volume traded from 14:30 on.
pub fn trade_tail_ratio(day: &DayBars) -> Reading {
    share(day, day.from_time(CLOSE_HALF_HOUR))
}
