//! Minute-bar table model.
//!
//! Aggregators never work on the raw polars table directly. The table is read
//! once into typed [`DayBars`] groups, one per (instrument, trading day), with
//! bars sorted by time of day. Every formula is then a reduction over one group.

use crate::{FactorError, Result, frame::date_column};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Column names of a minute-bar table.
pub mod columns {
    /// Instrument identifier.
    pub const CODE: &str = "code";
    /// Trading date.
    pub const DATE: &str = "date";
    /// Time of day as an `HHMMSSmmm` integer.
    pub const TIME: &str = "time";
    /// Bar open price.
    pub const OPEN: &str = "open";
    /// Bar high price.
    pub const HIGH: &str = "high";
    /// Bar low price.
    pub const LOW: &str = "low";
    /// Bar close price.
    pub const CLOSE: &str = "close";
    /// Bar traded volume.
    pub const VOLUME: &str = "volume";
}

/// Every column a minute-bar table must carry.
pub const MINUTE_BAR_COLUMNS: [&str; 8] = [
    columns::CODE,
    columns::DATE,
    columns::TIME,
    columns::OPEN,
    columns::HIGH,
    columns::LOW,
    columns::CLOSE,
    columns::VOLUME,
];

/// Session clock helpers for `HHMMSSmmm` encoded times.
pub mod session {
    /// Encode an hour and minute as `HHMMSSmmm`.
    pub const fn clock(hour: i64, minute: i64) -> i64 {
        hour * 10_000_000 + minute * 100_000
    }

    /// 09:30:00, first continuous-trading bar.
    pub const OPEN: i64 = clock(9, 30);
    /// 10:00:00, end of the opening half hour.
    pub const OPEN_HALF_HOUR: i64 = clock(10, 0);
    /// 11:29:00, last full morning bar.
    pub const AM_LAST: i64 = clock(11, 29);
    /// 11:30:00, morning close.
    pub const AM_CLOSE: i64 = clock(11, 30);
    /// 13:00:00, afternoon open.
    pub const PM_OPEN: i64 = clock(13, 0);
    /// 14:29:00, last bar before the closing half hour.
    pub const PRE_CLOSE_HALF_HOUR: i64 = clock(14, 29);
    /// 14:30:00, start of the closing half hour.
    pub const CLOSE_HALF_HOUR: i64 = clock(14, 30);
    /// 14:57:00, start of the closing call auction.
    pub const CLOSING_CALL: i64 = clock(14, 57);
    /// 14:59:00, last continuous-trading bar.
    pub const PM_LAST: i64 = clock(14, 59);

    /// Minutes since midnight, dropping seconds and milliseconds.
    pub const fn minute_of_day(time: i64) -> i64 {
        time / 10_000_000 * 60 + time % 10_000_000 / 100_000
    }

    /// Continuous trading-minute index with the lunch break removed.
    ///
    /// 09:30 maps to 0 and 13:00 maps to 120.
    pub const fn trade_minute(time: i64) -> i64 {
        let minute = minute_of_day(time);
        if minute < 720 { minute - 570 } else { minute - 660 }
    }
}

/// One minute of trading for one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinuteBar {
    /// Time of day, `HHMMSSmmm`.
    pub time: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl MinuteBar {
    /// Bar return, `close / open - 1`.
    pub fn ret(&self) -> f64 {
        self.close / self.open - 1.0
    }

    /// Gross bar return, `close / open`.
    pub fn ratio(&self) -> f64 {
        self.close / self.open
    }

    /// High over low.
    pub fn range(&self) -> f64 {
        self.high / self.low
    }
}

/// All minute bars of one instrument on one trading day, sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBars {
    /// Instrument identifier.
    pub code: String,
    /// Trading date.
    pub date: NaiveDate,
    /// Bars sorted by time, unique per time.
    pub bars: Vec<MinuteBar>,
}

impl DayBars {
    /// Build a day from unsorted bars. Duplicate times keep the first bar seen.
    pub fn new(code: impl Into<String>, date: NaiveDate, mut bars: Vec<MinuteBar>) -> Self {
        bars.sort_by_key(|bar| bar.time);
        bars.dedup_by_key(|bar| bar.time);
        Self {
            code: code.into(),
            date,
            bars,
        }
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the day has no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Total traded volume.
    pub fn total_volume(&self) -> f64 {
        self.bars.iter().map(|bar| bar.volume).sum()
    }

    /// Bars with `start <= time <= end`.
    pub fn between(&self, start: i64, end: i64) -> &[MinuteBar] {
        let lo = self.bars.partition_point(|bar| bar.time < start);
        let hi = self.bars.partition_point(|bar| bar.time <= end);
        &self.bars[lo..hi.max(lo)]
    }

    /// Bars with `time < cutoff`.
    pub fn before(&self, cutoff: i64) -> &[MinuteBar] {
        &self.bars[..self.bars.partition_point(|bar| bar.time < cutoff)]
    }

    /// Bars with `time <= cutoff`.
    pub fn until(&self, cutoff: i64) -> &[MinuteBar] {
        &self.bars[..self.bars.partition_point(|bar| bar.time <= cutoff)]
    }

    /// Bars with `time >= cutoff`.
    pub fn from_time(&self, cutoff: i64) -> &[MinuteBar] {
        &self.bars[self.bars.partition_point(|bar| bar.time < cutoff)..]
    }

    /// First `n` bars of the day.
    pub fn head(&self, n: usize) -> &[MinuteBar] {
        &self.bars[..n.min(self.bars.len())]
    }

    /// Last `n` bars of the day.
    pub fn tail(&self, n: usize) -> &[MinuteBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    /// Bar returns in time order.
    pub fn returns(&self) -> Vec<f64> {
        self.bars.iter().map(MinuteBar::ret).collect()
    }

    /// Volumes in time order.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }

    /// Closes in time order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Each bar's share of the day's volume, or `None` when nothing traded.
    pub fn volume_shares(&self) -> Option<Vec<f64>> {
        let total = self.total_volume();
        (total > 0.0).then(|| self.bars.iter().map(|bar| bar.volume / total).collect())
    }
}

fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| FactorError::MissingColumn(name.to_string()))
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = required(df, name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn time_values(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    let column = required(df, columns::TIME)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

fn code_values(df: &DataFrame) -> Result<Vec<Option<String>>> {
    let column = required(df, columns::CODE)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|code| code.map(str::to_string))
        .collect())
}

/// Split a minute-bar table into per-(instrument, date) groups.
///
/// Groups come back sorted by code, then date. Rows with a null code, date,
/// time or price are skipped; a null volume counts as zero.
pub fn group_minute_bars(df: &DataFrame) -> Result<Vec<DayBars>> {
    let codes = code_values(df)?;
    let dates = date_column(df, columns::DATE)?;
    let times = time_values(df)?;
    let opens = f64_values(df, columns::OPEN)?;
    let highs = f64_values(df, columns::HIGH)?;
    let lows = f64_values(df, columns::LOW)?;
    let closes = f64_values(df, columns::CLOSE)?;
    let volumes = f64_values(df, columns::VOLUME)?;

    let mut groups: BTreeMap<(String, NaiveDate), Vec<MinuteBar>> = BTreeMap::new();
    for i in 0..df.height() {
        let (Some(code), Some(date), Some(time)) = (&codes[i], dates[i], times[i]) else {
            continue;
        };
        let (Some(open), Some(high), Some(low), Some(close)) = (opens[i], highs[i], lows[i], closes[i])
        else {
            continue;
        };
        groups
            .entry((code.clone(), date))
            .or_default()
            .push(MinuteBar {
                time,
                open,
                high,
                low,
                close,
                volume: volumes[i].unwrap_or(0.0),
            });
    }

    Ok(groups
        .into_iter()
        .map(|((code, date), bars)| DayBars::new(code, date, bars))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, volume: f64) -> MinuteBar {
        MinuteBar {
            time,
            open: 10.0,
            high: 10.2,
            low: 9.9,
            close: 10.1,
            volume,
        }
    }

    #[test]
    fn test_trade_minute_skips_lunch_break() {
        assert_eq!(session::trade_minute(session::OPEN), 0);
        assert_eq!(session::trade_minute(session::AM_LAST), 119);
        assert_eq!(session::trade_minute(session::PM_OPEN), 120);
        assert_eq!(session::trade_minute(session::PM_LAST), 239);
        assert_eq!(session::trade_minute(93_045_500), 0);
    }

    #[test]
    fn test_day_bars_sorted_and_sliced() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let day = DayBars::new(
            "000001",
            date,
            vec![
                bar(session::clock(9, 32), 3.0),
                bar(session::clock(9, 30), 1.0),
                bar(session::clock(9, 31), 2.0),
                bar(session::clock(9, 31), 9.0),
            ],
        );

        assert_eq!(day.len(), 3);
        assert_eq!(day.volumes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(day.between(session::clock(9, 31), session::clock(9, 40)).len(), 2);
        assert_eq!(day.before(session::clock(9, 31)).len(), 1);
        assert_eq!(day.until(session::clock(9, 31)).len(), 2);
        assert_eq!(day.from_time(session::clock(9, 32)).len(), 1);
        assert_eq!(day.head(10).len(), 3);
        assert_eq!(day.tail(2)[0].volume, 2.0);
        assert_eq!(day.volume_shares().unwrap(), vec![1.0 / 6.0, 2.0 / 6.0, 3.0 / 6.0]);
    }

    #[test]
    fn test_volume_shares_none_without_volume() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let day = DayBars::new("000001", date, vec![bar(session::OPEN, 0.0)]);
        assert!(day.volume_shares().is_none());
    }

    #[test]
    fn test_group_minute_bars() {
        let df = df![
            "code" => ["B", "A", "A", "A"],
            "date" => ["2024-01-02", "2024-01-02", "2024-01-02", "2024-01-03"],
            "time" => [93000000i64, 93100000, 93000000, 93000000],
            "open" => [1.0, 2.0, 3.0, 4.0],
            "high" => [1.0, 2.0, 3.0, 4.0],
            "low" => [1.0, 2.0, 3.0, 4.0],
            "close" => [1.0, 2.0, 3.0, 4.0],
            "volume" => [Some(10.0), None, Some(30.0), Some(40.0)],
        ]
        .unwrap();

        let days = group_minute_bars(&df).unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].code, "A");
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(days[0].bars[0].open, 3.0);
        assert_eq!(days[0].bars[1].volume, 0.0);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(days[2].code, "B");
    }

    #[test]
    fn test_group_minute_bars_missing_column() {
        let df = df![
            "code" => ["A"],
            "date" => ["2024-01-02"],
        ]
        .unwrap();

        let err = group_minute_bars(&df).unwrap_err();
        assert!(matches!(err, FactorError::MissingColumn(_)));
    }
}
