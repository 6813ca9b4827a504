//! Feature schema definitions
//!
//! Defines which restaurant columns are encoded and in which order.
//! The order is part of the encoded vector layout, so a schema is stored
//! alongside every fitted encoder.

use dinex_core::Restaurant;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Numeric columns, scaled to [0, 1] using the fitted min/max
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Rating,
    Cost,
    RatingCount,
}

impl NumericColumn {
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Rating => "rating",
            NumericColumn::Cost => "cost",
            NumericColumn::RatingCount => "rating_count",
        }
    }

    pub fn value(self, r: &Restaurant) -> f64 {
        match self {
            NumericColumn::Rating => r.rating,
            NumericColumn::Cost => r.cost,
            NumericColumn::RatingCount => r.rating_count as f64,
        }
    }
}

/// Categorical columns, one-hot expanded over the fitted vocabulary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalColumn {
    City,
    Area,
    Cuisine,
}

impl CategoricalColumn {
    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::City => "city",
            CategoricalColumn::Area => "area",
            CategoricalColumn::Cuisine => "cuisine",
        }
    }

    pub fn value(self, r: &Restaurant) -> &str {
        match self {
            CategoricalColumn::City => &r.city,
            CategoricalColumn::Area => &r.area,
            CategoricalColumn::Cuisine => &r.cuisine,
        }
    }
}

/// Ordered column layout for the feature encoder
///
/// Numeric columns come first, then categorical ones, each in the order
/// listed here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    pub numeric: Vec<NumericColumn>,

    pub categorical: Vec<CategoricalColumn>,
}

fn default_version() -> u32 {
    1
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(
            vec![NumericColumn::Rating, NumericColumn::Cost, NumericColumn::RatingCount],
            vec![CategoricalColumn::City, CategoricalColumn::Area, CategoricalColumn::Cuisine],
        )
    }
}

impl FeatureSchema {
    pub fn new(numeric: Vec<NumericColumn>, categorical: Vec<CategoricalColumn>) -> Self {
        Self {
            version: 1,
            numeric,
            categorical,
        }
    }

    /// Check the schema is non-empty and lists no column twice
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.numeric.is_empty() && self.categorical.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for name in self.column_names() {
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateColumn(name.to_string()));
            }
        }

        Ok(())
    }

    /// Column names in vector order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.numeric
            .iter()
            .map(|c| c.name())
            .chain(self.categorical.iter().map(|c| c.name()))
            .collect()
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),
}
