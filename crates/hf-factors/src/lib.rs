#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hf-factors/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bars;
pub mod chip;
pub mod correlation;
pub mod error;
pub mod frame;
pub mod liquidity;
pub mod momentum;
pub mod registry;
pub mod shape;
pub mod stats;
pub mod trade;
pub mod traits;
pub mod volatility;

#[cfg(test)]
mod testing;

// Re-export core types
pub use bars::{DayBars, MinuteBar, group_minute_bars};
pub use error::{FactorError, Result};
pub use frame::DailyFactorRow;
pub use registry::{FactorCategory, FactorInfo, FactorRegistry};
pub use traits::{ConfigurableFactor, Factor, FactorConfig, KernelFactor, Reading};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
