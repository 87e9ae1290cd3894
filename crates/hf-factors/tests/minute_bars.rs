//! End-to-end tests from a minute-bar table to daily factor tables.

use approx::assert_relative_eq;
use hf_factors::{FactorError, FactorRegistry, bars::session::clock};
use polars::prelude::*;

/// The 240 continuous-trading minutes of a session.
fn session_times() -> Vec<i64> {
    let morning = (0..120).map(|i| clock(9 + (30 + i) / 60, (30 + i) % 60));
    let afternoon = (0..120).map(|i| clock(13 + i / 60, i % 60));
    morning.chain(afternoon).collect()
}

struct Bars {
    code: Vec<&'static str>,
    date: Vec<&'static str>,
    time: Vec<i64>,
    open: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl Bars {
    fn new() -> Self {
        Self {
            code: Vec::new(),
            date: Vec::new(),
            time: Vec::new(),
            open: Vec::new(),
            close: Vec::new(),
            volume: Vec::new(),
        }
    }

    fn push(
        &mut self,
        code: &'static str,
        date: &'static str,
        time: i64,
        open: f64,
        close: f64,
        volume: f64,
    ) {
        self.code.push(code);
        self.date.push(date);
        self.time.push(time);
        self.open.push(open);
        self.close.push(close);
        self.volume.push(volume);
    }

    fn frame(self) -> DataFrame {
        let high: Vec<f64> = self.open.iter().zip(&self.close).map(|(o, c)| o.max(*c)).collect();
        let low: Vec<f64> = self.open.iter().zip(&self.close).map(|(o, c)| o.min(*c)).collect();
        df![
            "code" => self.code,
            "date" => self.date,
            "time" => self.time,
            "open" => self.open,
            "high" => high,
            "low" => low,
            "close" => self.close,
            "volume" => self.volume,
        ]
        .unwrap()
    }
}

/// Two instruments over one session: `000002` drifts up, `000001` is flat.
fn two_instruments() -> DataFrame {
    let mut bars = Bars::new();
    for (i, time) in session_times().into_iter().enumerate() {
        let drift = 10.0 + i as f64 * 0.01;
        bars.push("000002", "2024-01-02", time, drift, drift + 0.01, 100.0 + i as f64);
        bars.push("000001", "2024-01-02", time, 10.0, 10.0, 50.0);
    }
    bars.frame()
}

fn value(frame: &DataFrame, column: &str, row: usize) -> Option<f64> {
    frame.column(column).unwrap().f64().unwrap().get(row)
}

#[test]
fn test_single_factor_output_shape() {
    let registry = FactorRegistry::with_defaults();
    let factor = registry.get("mmt_am").unwrap();
    let out = factor.compute(&two_instruments()).unwrap();

    assert_eq!(out.height(), 2);
    assert_eq!(out.get_column_names_str(), ["code", "date", "mmt_am"]);
    assert_eq!(out.column("date").unwrap().dtype(), &DataType::Date);

    // Sorted by code: the flat instrument comes first.
    assert_eq!(value(&out, "mmt_am", 0), Some(1.0));
    // 11:29 is bar 119: close 10 + 1.19 + 0.01 over the 10.0 open.
    assert_relative_eq!(value(&out, "mmt_am", 1).unwrap(), 11.2 / 10.0, epsilon = 1e-9);
}

#[test]
fn test_zero_volume_day_fallbacks() {
    let mut bars = Bars::new();
    for time in session_times() {
        bars.push("000003", "2024-01-03", time, 10.0, 10.1, 0.0);
    }
    let frame = bars.frame();
    let registry = FactorRegistry::with_defaults();

    let compute = |name: &str| {
        let out = registry.get(name).unwrap().compute(&frame).unwrap();
        assert_eq!(out.height(), 1, "{name} should keep the instrument-day");
        value(&out, name, 0)
    };

    assert_eq!(compute("liq_amihud_1min"), Some(0.0));
    assert_eq!(compute("trade_headRatio"), Some(0.125));
    assert_eq!(compute("trade_tailRatio"), Some(0.125));
    assert_eq!(compute("liq_firstCallR"), None);
    assert_eq!(compute("doc_std"), None);
    assert_eq!(compute("trade_top20retRatio"), None);
}

#[test]
fn test_absent_windows_drop_rows() {
    let mut bars = Bars::new();
    for time in session_times().into_iter().skip(120) {
        bars.push("000004", "2024-01-04", time, 10.0, 10.0, 1.0);
    }
    let frame = bars.frame();
    let registry = FactorRegistry::with_defaults();

    let morning = registry.get("mmt_am").unwrap().compute(&frame).unwrap();
    assert_eq!(morning.height(), 0);

    // 120 afternoon bars are enough for the rolling regressions.
    let qrs = registry.get("mmt_ols_beta_mean").unwrap().compute(&frame).unwrap();
    assert_eq!(qrs.height(), 1);
}

#[test]
fn test_compute_all_is_wide() {
    let registry = FactorRegistry::with_defaults();
    let out = registry.compute_all(&two_instruments()).unwrap();

    assert_eq!(out.height(), 2);
    assert_eq!(out.width(), 2 + registry.len());

    let names = out.get_column_names_str();
    let mut factor_columns: Vec<&str> = names[2..].to_vec();
    factor_columns.sort_unstable();
    assert_eq!(factor_columns, registry.names());
}

#[test]
fn test_missing_column_is_reported() {
    let frame = df![
        "code" => ["000001"],
        "date" => ["2024-01-02"],
        "time" => [93_000_000_i64],
    ]
    .unwrap();

    let registry = FactorRegistry::with_defaults();
    let err = registry.get("vol_return1min").unwrap().compute(&frame).unwrap_err();
    assert!(matches!(err, FactorError::MissingColumn(_)));
}
