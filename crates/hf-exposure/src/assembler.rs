//! Incremental daily panel assembly.
//!
//! The assembler computes one factor over every minute-bar day newer than a
//! panel's watermark. Days are independent tasks run on a bounded rayon pool;
//! a day that fails to load or aggregate is logged, reported and left out.
//! The watermark is the latest date in the panel, so a failed day is only
//! retried by a later run when no newer day succeeded in the same run.

use crate::{DailyFactorPanel, ExposureError, MinuteBarSource, PanelStore, Result};
use chrono::NaiveDate;
use hf_factors::{DailyFactorRow, Factor, group_minute_bars};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroUsize, sync::Arc};
use tracing::{debug, info, warn};

/// Assembler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Worker threads computing days in parallel.
    pub workers: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

/// A day left out of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDay {
    /// Trading day.
    pub date: NaiveDate,
    /// Error message.
    pub reason: String,
}

/// Outcome of one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    /// The extended panel.
    pub panel: DailyFactorPanel,
    /// Days computed and appended, ascending.
    pub processed: Vec<NaiveDate>,
    /// Days that failed, ascending.
    pub skipped: Vec<SkippedDay>,
    /// Rows appended to the panel.
    pub appended: usize,
}

/// Callback invoked once per finished day, from worker threads.
pub type ProgressHook = Arc<dyn Fn(NaiveDate) + Send + Sync>;

/// Builds and extends daily factor panels.
#[derive(Clone, Default)]
pub struct PanelAssembler {
    config: AssemblerConfig,
    progress: Option<ProgressHook>,
}

impl fmt::Debug for PanelAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelAssembler")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Days strictly after the panel's watermark, or every day without a panel.
pub fn frontier(panel: Option<&DailyFactorPanel>, available: &[NaiveDate]) -> Vec<NaiveDate> {
    let watermark = panel.and_then(DailyFactorPanel::watermark);
    available
        .iter()
        .copied()
        .filter(|day| watermark.is_none_or(|watermark| *day > watermark))
        .collect()
}

/// Compute `factor` over the minute bars of one day.
///
/// Rows dated other than `day` are dropped.
fn compute_day(
    factor: &dyn Factor,
    source: &dyn MinuteBarSource,
    day: NaiveDate,
) -> Result<Vec<DailyFactorRow>> {
    let bars = source.load(day)?;
    let days = group_minute_bars(&bars)?;
    let mut rows = factor.compute_rows(&days);
    rows.retain(|row| row.date == day);
    Ok(rows)
}

impl PanelAssembler {
    /// Create an assembler.
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Invoke `hook` after each day finishes, whether it succeeded or not.
    pub fn with_progress(mut self, hook: impl Fn(NaiveDate) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(hook));
        self
    }

    /// Settings in use.
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Extend `existing` (or a new panel) with every frontier day of `source`.
    pub fn assemble(
        &self,
        factor: &dyn Factor,
        existing: Option<DailyFactorPanel>,
        source: &dyn MinuteBarSource,
    ) -> Result<AssemblyReport> {
        if self.config.workers == 0 {
            return Err(ExposureError::config("workers", self.config.workers));
        }
        if let Some(panel) = &existing
            && panel.factor() != factor.name()
        {
            return Err(ExposureError::PanelMismatch {
                expected: factor.name().to_string(),
                found: panel.factor().to_string(),
            });
        }

        let available = source.list_available_days()?;
        let candidates = frontier(existing.as_ref(), &available);
        debug!(
            factor = factor.name(),
            available = available.len(),
            candidates = candidates.len(),
            watermark = ?existing.as_ref().and_then(DailyFactorPanel::watermark),
            "Computed frontier"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()?;
        let outcomes: Vec<(NaiveDate, Result<Vec<DailyFactorRow>>)> = pool.install(|| {
            candidates
                .par_iter()
                .map(|&day| {
                    let outcome = compute_day(factor, source, day);
                    if let Some(progress) = &self.progress {
                        progress(day);
                    }
                    (day, outcome)
                })
                .collect()
        });

        let mut rows = Vec::new();
        let mut processed = Vec::new();
        let mut skipped = Vec::new();
        for (day, outcome) in outcomes {
            match outcome {
                Ok(day_rows) => {
                    rows.extend(day_rows);
                    processed.push(day);
                }
                Err(e) => {
                    warn!(factor = factor.name(), %day, error = %e, "Skipping day");
                    skipped.push(SkippedDay {
                        date: day,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut panel = existing.unwrap_or_else(|| DailyFactorPanel::new(factor.name()));
        let appended = panel.append(rows)?;
        info!(
            factor = factor.name(),
            processed = processed.len(),
            skipped = skipped.len(),
            appended,
            "Assembled daily panel"
        );

        Ok(AssemblyReport {
            panel,
            processed,
            skipped,
            appended,
        })
    }

    /// Load the stored panel of `factor`, extend it and store it back.
    ///
    /// The store is written once, and only when rows were appended.
    pub fn update_panel(
        &self,
        store: &dyn PanelStore,
        source: &dyn MinuteBarSource,
        factor: &dyn Factor,
    ) -> Result<AssemblyReport> {
        let existing = store.load_panel(factor.name())?;
        let report = self.assemble(factor, existing, source)?;
        if report.appended > 0 {
            store.save_panel(&report.panel)?;
        }
        Ok(report)
    }
}
