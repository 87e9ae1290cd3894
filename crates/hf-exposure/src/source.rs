//! Daily minute-bar datasets.

use crate::{ExposureError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::{
    collections::BTreeMap,
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

/// An ordered collection of daily minute-bar tables.
pub trait MinuteBarSource: Send + Sync {
    /// Every trading day with a dataset, ascending.
    fn list_available_days(&self) -> Result<Vec<NaiveDate>>;

    /// The minute-bar table of one trading day.
    fn load(&self, day: NaiveDate) -> Result<DataFrame>;
}

/// Trading day encoded in the first eight characters of a file name.
fn day_from_file_name(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name.get(..8)?, "%Y%m%d").ok()
}

/// A directory of Parquet files named `YYYYMMDD*.parquet`, one per trading day.
///
/// Files whose name does not start with a date are ignored. When several files
/// share a date the one whose name sorts first wins.
#[derive(Debug, Clone)]
pub struct ParquetDaySource {
    dir: PathBuf,
    files: BTreeMap<NaiveDate, PathBuf>,
}

impl ParquetDaySource {
    /// Scan `dir` for daily files.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
            .collect();
        paths.sort();

        let mut files = BTreeMap::new();
        for path in paths {
            let Some(day) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(day_from_file_name)
            else {
                debug!(?path, "Ignoring file without a date prefix");
                continue;
            };
            files.entry(day).or_insert(path);
        }

        debug!(?dir, days = files.len(), "Scanned minute-bar directory");
        Ok(Self { dir, files })
    }

    /// Directory being served.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MinuteBarSource for ParquetDaySource {
    fn list_available_days(&self) -> Result<Vec<NaiveDate>> {
        Ok(self.files.keys().copied().collect())
    }

    fn load(&self, day: NaiveDate) -> Result<DataFrame> {
        let path = self.files.get(&day).ok_or_else(|| ExposureError::Source {
            day,
            reason: "no dataset for this day".to_string(),
        })?;
        let file = File::open(path)?;
        Ok(ParquetReader::new(file).finish()?)
    }
}

/// Minute-bar tables held in memory, with optional scripted failures.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    days: BTreeMap<NaiveDate, std::result::Result<DataFrame, String>>,
}

impl MemorySource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `df` for `day`.
    pub fn insert(&mut self, day: NaiveDate, df: DataFrame) {
        self.days.insert(day, Ok(df));
    }

    /// List `day` as available but fail to load it with `reason`.
    pub fn insert_failure(&mut self, day: NaiveDate, reason: impl Into<String>) {
        self.days.insert(day, Err(reason.into()));
    }
}

impl MinuteBarSource for MemorySource {
    fn list_available_days(&self) -> Result<Vec<NaiveDate>> {
        Ok(self.days.keys().copied().collect())
    }

    fn load(&self, day: NaiveDate) -> Result<DataFrame> {
        match self.days.get(&day) {
            Some(Ok(df)) => Ok(df.clone()),
            Some(Err(reason)) => Err(ExposureError::Source {
                day,
                reason: reason.clone(),
            }),
            None => Err(ExposureError::Source {
                day,
                reason: "no dataset for this day".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_from_file_name() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(day_from_file_name("20240102.parquet"), Some(day));
        assert_eq!(day_from_file_name("20240102_minute.parquet"), Some(day));
        assert_eq!(day_from_file_name("readme.parquet"), None);
        assert_eq!(day_from_file_name("2024"), None);
    }

    #[test]
    fn test_parquet_directory_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = df!["code" => ["000001"], "time" => [93_000_000_i64]].unwrap();
        for name in ["20240103.parquet", "20240102.parquet", "notes.parquet"] {
            let mut file = File::create(dir.path().join(name)).unwrap();
            ParquetWriter::new(&mut file).finish(&mut df).unwrap();
        }
        std::fs::write(dir.path().join("20240104.csv"), "code\n").unwrap();

        let source = ParquetDaySource::open(dir.path()).unwrap();
        let days = source.list_available_days().unwrap();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
        assert_eq!(source.load(days[0]).unwrap().height(), 1);

        let missing = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        assert!(matches!(source.load(missing), Err(ExposureError::Source { .. })));
    }

    #[test]
    fn test_memory_source_failures() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut source = MemorySource::new();
        source.insert_failure(day, "corrupt file");

        assert_eq!(source.list_available_days().unwrap(), vec![day]);
        let err = source.load(day).unwrap_err();
        assert!(err.to_string().contains("corrupt file"));
    }
}
