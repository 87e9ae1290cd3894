//! Factor registry for discovery and introspection.
//!
//! The registry provides a centralized way to discover, instantiate, and
//! query factors. It supports grouping by family and bulk computation.

use crate::{
    Factor, FactorError, Result,
    bars::{columns, group_minute_bars},
    frame::build_date_column,
};
use chrono::NaiveDate;
use derive_more::Display;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Factor family for grouping related factors.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactorCategory {
    /// Momentum - intraday trend and reversal factors
    Momentum,
    /// Volatility - dispersion of minute returns and volumes
    Volatility,
    /// Shape - skewness and kurtosis of intraday distributions
    Shape,
    /// Liquidity - price impact and auction volume factors
    Liquidity,
    /// Correlation - price-volume co-movement factors
    Correlation,
    /// Chip - volume distribution across price levels
    Chip,
    /// Trade - timing of traded volume within the session
    Trade,
}

impl FactorCategory {
    /// Name prefix shared by every factor of the family.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Momentum => "mmt",
            Self::Volatility => "vol",
            Self::Shape => "shape",
            Self::Liquidity => "liq",
            Self::Correlation => "corr",
            Self::Chip => "doc",
            Self::Trade => "trade",
        }
    }
}

/// Metadata for factor introspection.
#[derive(Debug, Clone)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factor category
    pub category: FactorCategory,
    /// Required input columns
    pub required_columns: Vec<String>,
}

/// Registry for factor discovery and instantiation.
#[derive(Debug, Default)]
pub struct FactorRegistry {
    factors: HashMap<String, Arc<dyn Factor>>,
}

impl FactorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factors: HashMap::new(),
        }
    }

    /// Register every minute-bar aggregator.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for factor in crate::momentum::factors()
            .into_iter()
            .chain(crate::volatility::factors())
            .chain(crate::shape::factors())
            .chain(crate::liquidity::factors())
            .chain(crate::correlation::factors())
            .chain(crate::chip::factors())
            .chain(crate::trade::factors())
        {
            registry.register(factor);
        }
        registry
    }

    /// Register a factor in the registry.
    pub fn register(&mut self, factor: Arc<dyn Factor>) {
        self.factors.insert(factor.name().to_string(), factor);
    }

    /// Get a factor by name.
    pub fn get(&self, name: &str) -> Option<&dyn Factor> {
        self.factors.get(name).map(|f| f.as_ref())
    }

    /// Get a shared handle to a factor, or [`FactorError::NotFound`].
    pub fn get_arc(&self, name: &str) -> Result<Arc<dyn Factor>> {
        self.factors
            .get(name)
            .cloned()
            .ok_or_else(|| FactorError::NotFound(name.to_string()))
    }

    /// Get factors by category.
    pub fn by_category(&self, category: FactorCategory) -> Vec<&dyn Factor> {
        let mut factors: Vec<_> = self
            .factors
            .values()
            .filter(|f| f.category() == category)
            .map(|f| f.as_ref())
            .collect();
        factors.sort_by(|a, b| a.name().cmp(b.name()));
        factors
    }

    /// Get all factor metadata.
    pub fn all_info(&self) -> Vec<FactorInfo> {
        self.factors
            .values()
            .map(|f| FactorInfo {
                name: f.name().to_string(),
                description: f.description().to_string(),
                category: f.category(),
                required_columns: f.required_columns().iter().map(|s| s.to_string()).collect(),
            })
            .collect()
    }

    /// Get all factor names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Compute every registered factor over a minute-bar table.
    ///
    /// Returns a DataFrame with columns: `code`, `date`, and one column per
    /// factor in name order. A factor with no reading for an instrument-day
    /// shows a null there.
    pub fn compute_all(&self, data: &DataFrame) -> Result<DataFrame> {
        if self.factors.is_empty() {
            return Err(FactorError::Computation("No factors registered".to_string()));
        }

        let days = group_minute_bars(data)?;
        let names = self.names();
        let mut table: BTreeMap<(String, NaiveDate), Vec<Option<f64>>> = days
            .iter()
            .map(|day| ((day.code.clone(), day.date), vec![None; names.len()]))
            .collect();

        for (slot, name) in names.iter().enumerate() {
            let factor = &self.factors[*name];
            for row in factor.compute_rows(&days) {
                if let Some(values) = table.get_mut(&(row.code, row.date)) {
                    values[slot] = row.value;
                }
            }
        }

        let codes: Vec<&str> = table.keys().map(|(code, _)| code.as_str()).collect();
        let mut frame_columns = vec![
            Column::new(columns::CODE.into(), codes),
            build_date_column(columns::DATE, table.keys().map(|(_, date)| *date))?,
        ];
        for (slot, name) in names.iter().enumerate() {
            let values: Vec<Option<f64>> = table.values().map(|values| values[slot]).collect();
            frame_columns.push(Column::new((*name).into(), values));
        }

        Ok(DataFrame::new(frame_columns)?)
    }

    /// Number of registered factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_family() {
        let registry = FactorRegistry::with_defaults();
        for category in [
            FactorCategory::Momentum,
            FactorCategory::Volatility,
            FactorCategory::Shape,
            FactorCategory::Liquidity,
            FactorCategory::Correlation,
            FactorCategory::Chip,
            FactorCategory::Trade,
        ] {
            let factors = registry.by_category(category);
            assert!(!factors.is_empty(), "no factors for {category}");
            for factor in factors {
                assert!(
                    factor.name().starts_with(&format!("{}_", category.prefix())),
                    "{} does not carry the {} prefix",
                    factor.name(),
                    category.prefix()
                );
            }
        }
    }

    #[test]
    fn test_registry_size_and_lookup() {
        let registry = FactorRegistry::with_defaults();
        assert_eq!(registry.len(), 60);
        assert!(registry.get("mmt_am").is_some());
        assert!(registry.get("doc_pdf95").is_some());
        assert!(registry.get("trade_topNeg50retRatio").is_some());
        assert!(matches!(
            registry.get_arc("mmt_unknown"),
            Err(FactorError::NotFound(_))
        ));
    }

    #[test]
    fn test_all_factors_have_info() {
        let registry = FactorRegistry::with_defaults();
        let all_info = registry.all_info();

        assert_eq!(all_info.len(), registry.len());
        for info in all_info {
            assert!(!info.name.is_empty());
            assert!(!info.description.is_empty());
            assert!(!info.required_columns.is_empty());
        }
    }

    #[test]
    fn test_empty_registry_compute_all_fails() {
        let df = df!["code" => ["A"]].unwrap();
        assert!(FactorRegistry::new().compute_all(&df).is_err());
    }
}
