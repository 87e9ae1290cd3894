//! Persisted daily panels.

use crate::{DailyFactorPanel, Result};
use polars::prelude::*;
use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use tracing::debug;

/// Storage holding one daily panel per factor name.
pub trait PanelStore: Send + Sync {
    /// The stored panel for `factor`, if any.
    fn load_panel(&self, factor: &str) -> Result<Option<DailyFactorPanel>>;

    /// Replace the stored panel for `panel.factor()`.
    fn save_panel(&self, panel: &DailyFactorPanel) -> Result<()>;
}

/// Panels stored as `<dir>/<factor>.parquet`.
#[derive(Debug, Clone)]
pub struct ParquetPanelStore {
    dir: PathBuf,
}

impl ParquetPanelStore {
    /// Store panels under `dir`, created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding the panel of `factor`.
    pub fn path(&self, factor: &str) -> PathBuf {
        self.dir.join(format!("{factor}.parquet"))
    }

    /// Directory holding the panels.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PanelStore for ParquetPanelStore {
    fn load_panel(&self, factor: &str) -> Result<Option<DailyFactorPanel>> {
        let path = self.path(factor);
        if !path.exists() {
            return Ok(None);
        }
        let df = ParquetReader::new(File::open(&path)?).finish()?;
        let panel = DailyFactorPanel::from_frame(factor, &df)?;
        debug!(?path, rows = panel.len(), "Loaded panel");
        Ok(Some(panel))
    }

    fn save_panel(&self, panel: &DailyFactorPanel) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(panel.factor());
        let staging = self.dir.join(format!(".{}.parquet.tmp", panel.factor()));

        let mut df = panel.to_frame()?;
        let mut file = File::create(&staging)?;
        ParquetWriter::new(&mut file).finish(&mut df)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&staging, &path)?;

        debug!(?path, rows = panel.len(), "Saved panel");
        Ok(())
    }
}

/// Panels held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    panels: Mutex<HashMap<String, DailyFactorPanel>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful [`PanelStore::save_panel`] calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl PanelStore for MemoryStore {
    fn load_panel(&self, factor: &str) -> Result<Option<DailyFactorPanel>> {
        let panels = self.panels.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(panels.get(factor).cloned())
    }

    fn save_panel(&self, panel: &DailyFactorPanel) -> Result<()> {
        let mut panels = self.panels.lock().unwrap_or_else(PoisonError::into_inner);
        panels.insert(panel.factor().to_string(), panel.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
