//! Price-volume correlation factors
//!
//! Pearson correlations between minute prices (or price changes) and minute
//! volumes (or volume changes) within a day. Pairs with a missing side, such as
//! the first bar's change or the shifted-out end of a lagged series, are
//! dropped. A day with fewer than two complete pairs, or with a constant
//! series, is null.

use crate::{
    DayBars, Factor, FactorCategory,
    stats::{pct_change, pearson, shift},
    traits::{DayKernel, KernelFactor, Reading},
};
use std::sync::Arc;

fn present(xs: &[f64]) -> Vec<Option<f64>> {
    xs.iter().copied().map(Some).collect()
}

/// Bars that traded, as `(closes, volumes)`.
fn traded(day: &DayBars) -> (Vec<f64>, Vec<f64>) {
    day.bars
        .iter()
        .filter(|bar| bar.volume != 0.0)
        .map(|bar| (bar.close, bar.volume))
        .unzip()
}

/// Close-to-close change against volume.
pub fn corr_prv(day: &DayBars) -> Reading {
    Reading::from(pearson(&pct_change(&day.closes()), &present(&day.volumes())))
}

/// Close-to-close change against volume change, over bars that traded.
pub fn corr_prvr(day: &DayBars) -> Reading {
    let (closes, volumes) = traded(day);
    Reading::from(pearson(&pct_change(&closes), &pct_change(&volumes)))
}

/// Close against synchronous volume.
pub fn corr_pv(day: &DayBars) -> Reading {
    Reading::from(pearson(&present(&day.closes()), &present(&day.volumes())))
}

/// Close against the previous bar's volume.
pub fn corr_pvd(day: &DayBars) -> Reading {
    Reading::from(pearson(&present(&day.closes()), &shift(&day.volumes(), 1)))
}

/// Close against the next bar's volume.
pub fn corr_pvl(day: &DayBars) -> Reading {
    Reading::from(pearson(&present(&day.closes()), &shift(&day.volumes(), -1)))
}

/// Close against volume change, over bars that traded.
pub fn corr_pvr(day: &DayBars) -> Reading {
    let (closes, volumes) = traded(day);
    Reading::from(pearson(&present(&closes), &pct_change(&volumes)))
}

/// Every price-volume correlation aggregator.
pub fn factors() -> Vec<Arc<dyn Factor>> {
    let kernels: [(&'static str, &'static str, DayKernel); 6] = [
        ("corr_prv", "Correlation of minute return and volume", corr_prv),
        (
            "corr_prvr",
            "Correlation of minute return and volume change",
            corr_prvr,
        ),
        ("corr_pv", "Correlation of minute close and volume", corr_pv),
        (
            "corr_pvd",
            "Correlation of minute close and lagged volume",
            corr_pvd,
        ),
        (
            "corr_pvl",
            "Correlation of minute close and leading volume",
            corr_pvl,
        ),
        (
            "corr_pvr",
            "Correlation of minute close and volume change",
            corr_pvr,
        ),
    ];

    kernels
        .into_iter()
        .map(|(name, description, kernel)| {
            Arc::new(KernelFactor::new(
                name,
                description,
                FactorCategory::Correlation,
                kernel,
            )) as Arc<dyn Factor>
        })
        .collect()
}
