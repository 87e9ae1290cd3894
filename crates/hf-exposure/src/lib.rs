#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hf-factors/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assembler;
pub mod error;
pub mod panel;
pub mod resample;
pub mod source;
pub mod store;

pub use assembler::{AssemblerConfig, AssemblyReport, PanelAssembler, SkippedDay, frontier};
pub use error::{ExposureError, Result};
pub use panel::DailyFactorPanel;
pub use resample::{
    ExposurePanel, ExposureRow, Frequency, Method, Mode, Pool, ResampleConfig, resample,
};
pub use source::{MemorySource, MinuteBarSource, ParquetDaySource};
pub use store::{MemoryStore, PanelStore, ParquetPanelStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
