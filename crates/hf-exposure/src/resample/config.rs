//! Resampling configuration.
//!
//! Every setting parses from the strings used on the command line and in JSON
//! configuration. Values outside the supported set are rejected with a
//! [`ExposureError::Config`] naming the parameter, never coerced.

use crate::{ExposureError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Target cadence of an exposure panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Calendar weeks starting on Monday.
    Weekly,
    /// Calendar months.
    Monthly,
    /// Rolling window of this many trading days.
    Days(usize),
}

impl FromStr for Frequency {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => match s.parse::<usize>() {
                Ok(days) if days > 0 => Ok(Self::Days(days)),
                _ => Err(ExposureError::config("frequency", s)),
            },
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => f.write_str("weekly"),
            Self::Monthly => f.write_str("monthly"),
            Self::Days(days) => write!(f, "{days}"),
        }
    }
}

/// Statistic applied within a bucket or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `o`: last value.
    Last,
    /// `m`: arithmetic mean.
    Mean,
    /// `z`: last value standardised by the mean and standard deviation.
    ZScore,
    /// `std`: standard deviation.
    Std,
}

impl Method {
    /// Short code used in column names.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Last => "o",
            Self::Mean => "m",
            Self::ZScore => "z",
            Self::Std => "std",
        }
    }
}

impl FromStr for Method {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "o" => Ok(Self::Last),
            "m" => Ok(Self::Mean),
            "z" => Ok(Self::ZScore),
            "std" => Ok(Self::Std),
            _ => Err(ExposureError::config("method", s)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How rows are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Calendar buckets, one output row per instrument and bucket.
    #[default]
    Calendar,
    /// Trailing windows, one output row per input row.
    Days,
}

impl FromStr for Mode {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "calendar" => Ok(Self::Calendar),
            "days" => Ok(Self::Days),
            _ => Err(ExposureError::config("mode", s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Calendar => "calendar",
            Self::Days => "days",
        })
    }
}

/// Instrument universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pool {
    /// Every instrument in the panel.
    #[default]
    Full,
}

impl FromStr for Pool {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(Self::Full),
            _ => Err(ExposureError::config("pool", s)),
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("full")
    }
}

/// A validated resampling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResampleConfig", into = "RawResampleConfig")]
pub struct ResampleConfig {
    frequency: Frequency,
    method: Method,
    mode: Mode,
    pool: Pool,
}

impl ResampleConfig {
    /// Validate a combination of settings.
    ///
    /// Calendar mode takes `weekly` or `monthly`, days mode takes a positive
    /// day count.
    pub fn new(frequency: Frequency, method: Method, mode: Mode, pool: Pool) -> Result<Self> {
        match (mode, frequency) {
            (Mode::Calendar, Frequency::Days(_))
            | (Mode::Days, Frequency::Weekly | Frequency::Monthly | Frequency::Days(0)) => {
                Err(ExposureError::config("frequency", frequency))
            }
            _ => Ok(Self {
                frequency,
                method,
                mode,
                pool,
            }),
        }
    }

    /// Parse and validate settings given as strings.
    pub fn parse(frequency: &str, method: &str, mode: &str, pool: &str) -> Result<Self> {
        Self::new(frequency.parse()?, method.parse()?, mode.parse()?, pool.parse()?)
    }

    /// Deserialize and validate a JSON configuration.
    ///
    /// `mode` defaults to `calendar` and `pool` to `full`; `frequency` may be
    /// a string or a number of days.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawResampleConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Target cadence.
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Statistic applied.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Grouping mode.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Instrument universe.
    pub const fn pool(&self) -> Pool {
        self.pool
    }

    /// Name of the exposure column produced for `factor`.
    pub fn column_name(&self, factor: &str) -> String {
        match self.mode {
            Mode::Calendar => format!("{}_{factor}_{}", self.frequency, self.method),
            Mode::Days => format!("{factor}_{}_{}", self.frequency, self.method),
        }
    }
}

/// A frequency as written in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum RawFrequency {
    Days(f64),
    Name(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawResampleConfig {
    frequency: RawFrequency,
    method: String,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default = "default_pool")]
    pool: String,
}

fn default_mode() -> String {
    Mode::default().to_string()
}

fn default_pool() -> String {
    Pool::default().to_string()
}

impl TryFrom<RawResampleConfig> for ResampleConfig {
    type Error = ExposureError;

    fn try_from(raw: RawResampleConfig) -> Result<Self> {
        let frequency = match raw.frequency {
            RawFrequency::Name(name) => name.parse()?,
            RawFrequency::Days(days) if days.fract() == 0.0 && days >= 1.0 => {
                Frequency::Days(days as usize)
            }
            RawFrequency::Days(days) => return Err(ExposureError::config("frequency", days)),
        };
        Self::new(frequency, raw.method.parse()?, raw.mode.parse()?, raw.pool.parse()?)
    }
}

impl From<ResampleConfig> for RawResampleConfig {
    fn from(config: ResampleConfig) -> Self {
        let frequency = match config.frequency {
            Frequency::Days(days) => RawFrequency::Days(days as f64),
            named => RawFrequency::Name(named.to_string()),
        };
        Self {
            frequency,
            method: config.method.to_string(),
            mode: config.mode.to_string(),
            pool: config.pool.to_string(),
        }
    }
}
