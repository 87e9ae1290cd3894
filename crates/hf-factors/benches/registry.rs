//! Benchmarks for minute-bar aggregation.

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hf_factors::{DayBars, Factor, FactorRegistry, MinuteBar, bars::session::clock};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_days(instruments: usize, seed: u64) -> Vec<DayBars> {
    let mut rng = StdRng::seed_from_u64(seed);
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let times: Vec<i64> = (0..120)
        .map(|i| clock(9 + (30 + i) / 60, (30 + i) % 60))
        .chain((0..120).map(|i| clock(13 + i / 60, i % 60)))
        .collect();

    (0..instruments)
        .map(|n| {
            let mut price = 10.0;
            let bars = times
                .iter()
                .map(|&time| {
                    let open = price;
                    price *= 1.0 + rng.gen_range(-0.002..0.002);
                    MinuteBar {
                        time,
                        open,
                        high: open.max(price) * 1.001,
                        low: open.min(price) * 0.999,
                        close: price,
                        volume: rng.gen_range(0.0..10_000.0_f64).floor(),
                    }
                })
                .collect();
            DayBars::new(format!("{n:06}"), date, bars)
        })
        .collect()
}

fn benchmark_factors(c: &mut Criterion) {
    let days = random_days(100, 42);
    let registry = FactorRegistry::with_defaults();

    for name in ["mmt_ols_qrs", "doc_pdf80", "corr_prvr", "liq_amihud_1min"] {
        let Some(factor) = registry.get(name) else {
            continue;
        };
        c.bench_function(name, |b| b.iter(|| factor.compute_rows(black_box(&days))));
    }

    c.bench_function("all_factors_100_instruments", |b| {
        b.iter(|| {
            for name in registry.names() {
                if let Some(factor) = registry.get(name) {
                    black_box(factor.compute_rows(&days));
                }
            }
        })
    });
}

criterion_group!(benches, benchmark_factors);
criterion_main!(benches);
