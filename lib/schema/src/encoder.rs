//! Feature encoder
//!
//! Converts restaurant records into fixed-width vectors: min-max scaled
//! numeric columns followed by one-hot blocks for each categorical column.
//! The encoder is fitted once on the reference table and the resulting
//! [`EncoderState`] is reused unchanged to encode every query.

use crate::schema::{CategoricalColumn, FeatureSchema, NumericColumn, SchemaError};
use dinex_core::{Restaurant, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// Learned min/max of one numeric column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericScale {
    pub column: NumericColumn,
    pub min: f64,
    pub max: f64,
}

impl NumericScale {
    /// Map a value linearly so that the fitted range becomes [0, 1]
    ///
    /// Values outside the fitted range are not clipped. A collapsed range
    /// (min == max) uses a unit scale.
    pub fn scale(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            (value - self.min) as f32
        } else {
            ((value - self.min) / range) as f32
        }
    }
}

/// Sorted distinct values seen for one categorical column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryVocabulary {
    pub column: CategoricalColumn,
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Position of a category in the one-hot block, `None` when unseen
    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Slice of the encoded vector that belongs to one source column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    pub name: &'static str,
    pub range: Range<usize>,
}

/// Fitted encoder parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncoderState {
    pub schema: FeatureSchema,
    pub scales: Vec<NumericScale>,
    pub vocabularies: Vec<CategoryVocabulary>,
}

impl EncoderState {
    /// Width of every encoded vector
    pub fn dim(&self) -> usize {
        self.scales.len() + self.vocabularies.iter().map(|v| v.len()).sum::<usize>()
    }

    /// Output column names in vector order, e.g. `num__cost`, `cat__city_Chennai`
    pub fn feature_names(&self) -> Vec<String> {
        let numeric = self.scales.iter().map(|s| format!("num__{}", s.column.name()));
        let categorical = self.vocabularies.iter().flat_map(|v| {
            v.categories
                .iter()
                .map(move |c| format!("cat__{}_{}", v.column.name(), c))
        });
        numeric.chain(categorical).collect()
    }

    /// Vector range covered by each source column, in vector order
    pub fn feature_groups(&self) -> Vec<FeatureGroup> {
        let mut groups = Vec::with_capacity(self.scales.len() + self.vocabularies.len());
        let mut offset = 0;

        for scale in &self.scales {
            groups.push(FeatureGroup {
                name: scale.column.name(),
                range: offset..offset + 1,
            });
            offset += 1;
        }
        for vocab in &self.vocabularies {
            groups.push(FeatureGroup {
                name: vocab.column.name(),
                range: offset..offset + vocab.len(),
            });
            offset += vocab.len();
        }

        groups
    }

    /// Reject a state that was fitted with a different column layout
    pub fn ensure_schema(&self, expected: &FeatureSchema) -> Result<(), EncoderError> {
        if &self.schema != expected {
            return Err(EncoderError::SchemaMismatch {
                expected: expected.column_names().join(","),
                actual: self.schema.column_names().join(","),
            });
        }
        Ok(())
    }

    /// Check a deserialized state is internally consistent
    ///
    /// Scales and vocabularies must follow the schema order and every
    /// vocabulary must be strictly sorted.
    pub fn validate(&self) -> Result<(), EncoderError> {
        self.schema.validate()?;

        let scale_columns: Vec<_> = self.scales.iter().map(|s| s.column).collect();
        let vocab_columns: Vec<_> = self.vocabularies.iter().map(|v| v.column).collect();
        if scale_columns != self.schema.numeric || vocab_columns != self.schema.categorical {
            return Err(EncoderError::CorruptState(
                "fitted columns do not follow the schema order".to_string(),
            ));
        }

        for scale in &self.scales {
            if !scale.min.is_finite() || !scale.max.is_finite() || scale.min > scale.max {
                return Err(EncoderError::CorruptState(format!(
                    "invalid range for '{}'",
                    scale.column.name()
                )));
            }
        }

        for vocab in &self.vocabularies {
            if vocab.categories.windows(2).any(|w| w[0] >= w[1]) {
                return Err(EncoderError::CorruptState(format!(
                    "vocabulary for '{}' is not sorted",
                    vocab.column.name()
                )));
            }
        }

        Ok(())
    }

    /// Encode one record
    ///
    /// Unseen categories leave their one-hot block all zero.
    pub fn transform(&self, record: &Restaurant) -> Result<Vector, EncoderError> {
        let mut components = vec![0.0f32; self.dim()];

        for (i, scale) in self.scales.iter().enumerate() {
            let value = scale.column.value(record);
            if !value.is_finite() {
                return Err(EncoderError::NonFiniteValue {
                    column: scale.column.name(),
                    row: None,
                });
            }
            components[i] = scale.scale(value);
        }

        let mut offset = self.scales.len();
        for vocab in &self.vocabularies {
            if let Some(pos) = vocab.position(vocab.column.value(record)) {
                components[offset + pos] = 1.0;
            }
            offset += vocab.len();
        }

        Ok(Vector::new(components))
    }

    /// Encode a whole table, preserving row order
    pub fn transform_all(&self, table: &[Restaurant]) -> Result<Vec<Vector>, EncoderError> {
        table
            .iter()
            .enumerate()
            .map(|(row, r)| {
                self.transform(r).map_err(|e| match e {
                    EncoderError::NonFiniteValue { column, .. } => {
                        EncoderError::NonFiniteValue { column, row: Some(row) }
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Feature encoder with an explicit fitted/unfitted state
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
    state: Option<EncoderState>,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new(FeatureSchema::default())
    }
}

impl FeatureEncoder {
    /// Create an unfitted encoder for the given column layout
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema, state: None }
    }

    /// Wrap an already fitted state
    pub fn from_state(state: EncoderState) -> Result<Self, EncoderError> {
        state.validate()?;
        Ok(Self {
            schema: state.schema.clone(),
            state: Some(state),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Result<&EncoderState, EncoderError> {
        self.state.as_ref().ok_or(EncoderError::NotFitted)
    }

    pub fn into_state(self) -> Result<EncoderState, EncoderError> {
        self.state.ok_or(EncoderError::NotFitted)
    }

    /// Learn numeric ranges and categorical vocabularies from the full table
    pub fn fit(&mut self, table: &[Restaurant]) -> Result<&EncoderState, EncoderError> {
        self.schema.validate()?;
        if table.is_empty() {
            return Err(EncoderError::EmptyTable);
        }

        let mut scales = Vec::with_capacity(self.schema.numeric.len());
        for &column in &self.schema.numeric {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for (row, r) in table.iter().enumerate() {
                let value = column.value(r);
                if !value.is_finite() {
                    return Err(EncoderError::NonFiniteValue {
                        column: column.name(),
                        row: Some(row),
                    });
                }
                min = min.min(value);
                max = max.max(value);
            }
            scales.push(NumericScale { column, min, max });
        }

        let vocabularies = self
            .schema
            .categorical
            .iter()
            .map(|&column| {
                let distinct: BTreeSet<&str> = table.iter().map(|r| column.value(r)).collect();
                CategoryVocabulary {
                    column,
                    categories: distinct.into_iter().map(str::to_string).collect(),
                }
            })
            .collect();

        let state = EncoderState {
            schema: self.schema.clone(),
            scales,
            vocabularies,
        };
        let state = self.state.insert(state);
        Ok(&*state)
    }

    /// Encode one record with the fitted state
    pub fn transform(&self, record: &Restaurant) -> Result<Vector, EncoderError> {
        self.state()?.transform(record)
    }

    /// Encode a table with the fitted state
    pub fn transform_all(&self, table: &[Restaurant]) -> Result<Vec<Vector>, EncoderError> {
        self.state()?.transform_all(table)
    }

    /// Fit on the table and encode it in one step
    pub fn fit_transform(&mut self, table: &[Restaurant]) -> Result<Vec<Vector>, EncoderError> {
        self.fit(table)?.transform_all(table)
    }
}

/// Errors raised by the feature encoder
#[derive(Debug, Clone, thiserror::Error)]
pub enum EncoderError {
    #[error("Encoder used before fit")]
    NotFitted,

    #[error("Cannot fit encoder on an empty table")]
    EmptyTable,

    #[error("Non-finite value in column '{column}'{}", .row.map(|r| format!(" at row {r}")).unwrap_or_default())]
    NonFiniteValue {
        column: &'static str,
        row: Option<usize>,
    },

    #[error("Encoder schema mismatch: expected [{expected}], fitted with [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),

    #[error("Corrupt encoder state: {0}")]
    CorruptState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Restaurant> {
        vec![
            Restaurant::new("A", "Chennai", "Anna Nagar", "North Indian", 4.5, 100, 200.0),
            Restaurant::new("B", "Chennai", "Adyar", "South Indian", 3.5, 50, 400.0),
            Restaurant::new("C", "Pune", "Baner", "Cafe", 4.0, 0, 600.0),
        ]
    }

    #[test]
    fn test_transform_before_fit() {
        let encoder = FeatureEncoder::default();
        assert!(!encoder.is_fitted());
        assert!(matches!(
            encoder.transform(&table()[0]),
            Err(EncoderError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_empty_table() {
        let mut encoder = FeatureEncoder::default();
        assert!(matches!(encoder.fit(&[]), Err(EncoderError::EmptyTable)));
    }

    #[test]
    fn test_dimension_and_feature_names() {
        let mut encoder = FeatureEncoder::default();
        let state = encoder.fit(&table()).unwrap();

        // 3 numeric + 2 cities + 3 areas + 3 cuisines
        assert_eq!(state.dim(), 3 + 2 + 3 + 3);

        let names = state.feature_names();
        assert_eq!(names.len(), state.dim());
        assert_eq!(names[0], "num__rating");
        assert_eq!(names[2], "num__rating_count");
        assert_eq!(names[3], "cat__city_Chennai");
        assert_eq!(names[4], "cat__city_Pune");
        assert_eq!(names[5], "cat__area_Adyar");
    }

    #[test]
    fn test_min_max_scaling() {
        let mut encoder = FeatureEncoder::default();
        encoder.fit(&table()).unwrap();

        let v = encoder.transform(&table()[0]).unwrap();
        let s = v.as_slice();
        assert!((s[0] - 1.0).abs() < 1e-6); // rating 4.5 is the max
        assert!((s[1] - 0.0).abs() < 1e-6); // cost 200 is the min
        assert!((s[2] - 1.0).abs() < 1e-6); // rating_count 100 is the max
    }

    #[test]
    fn test_one_hot_blocks() {
        let mut encoder = FeatureEncoder::default();
        encoder.fit(&table()).unwrap();

        let v = encoder.transform(&table()[2]).unwrap();
        let ones: Vec<usize> = v
            .as_slice()
            .iter()
            .enumerate()
            .skip(3)
            .filter(|(_, x)| **x == 1.0)
            .map(|(i, _)| i)
            .collect();

        // Pune, Baner, Cafe
        assert_eq!(ones.len(), 3);
        let names = encoder.state().unwrap().feature_names();
        assert_eq!(names[ones[0]], "cat__city_Pune");
        assert_eq!(names[ones[1]], "cat__area_Baner");
        assert_eq!(names[ones[2]], "cat__cuisine_Cafe");
    }

    #[test]
    fn test_unseen_category_maps_to_zero_block() {
        let mut encoder = FeatureEncoder::default();
        encoder.fit(&table()).unwrap();

        let unseen = Restaurant::new("", "Mumbai", "Bandra", "Sushi", 4.0, 0, 300.0);
        let v = encoder.transform(&unseen).unwrap();

        assert_eq!(v.dim(), encoder.state().unwrap().dim());
        assert!(v.as_slice()[3..].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_values_outside_range_not_clipped() {
        let mut encoder = FeatureEncoder::default();
        encoder.fit(&table()).unwrap();

        let pricey = Restaurant::new("", "Pune", "Baner", "Cafe", 4.0, 0, 1000.0);
        let v = encoder.transform(&pricey).unwrap();
        assert!((v.as_slice()[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_collapsed_range() {
        let rows = vec![
            Restaurant::new("A", "Pune", "Baner", "Cafe", 4.0, 10, 300.0),
            Restaurant::new("B", "Pune", "Baner", "Cafe", 4.0, 10, 300.0),
        ];
        let mut encoder = FeatureEncoder::default();
        let vectors = encoder.fit_transform(&rows).unwrap();

        assert_eq!(&vectors[0].as_slice()[..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let rows = vec![Restaurant::new("A", "Pune", "Baner", "Cafe", f64::NAN, 10, 300.0)];
        let mut encoder = FeatureEncoder::default();
        assert!(matches!(
            encoder.fit(&rows),
            Err(EncoderError::NonFiniteValue { column: "rating", row: Some(0) })
        ));
    }

    #[test]
    fn test_feature_groups_cover_vector() {
        let mut encoder = FeatureEncoder::default();
        let state = encoder.fit(&table()).unwrap();
        let groups = state.feature_groups();

        let names: Vec<_> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["rating", "cost", "rating_count", "city", "area", "cuisine"]);
        assert_eq!(groups.last().unwrap().range.end, state.dim());
        assert_eq!(groups[3].range, 3..5);
    }

    #[test]
    fn test_state_roundtrip_and_schema_check() {
        let mut encoder = FeatureEncoder::default();
        let state = encoder.fit(&table()).unwrap().clone();

        let json = serde_json::to_string(&state).unwrap();
        let parsed: EncoderState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);

        let restored = FeatureEncoder::from_state(parsed).unwrap();
        assert_eq!(
            restored.transform(&table()[1]).unwrap(),
            encoder.transform(&table()[1]).unwrap()
        );

        let other = FeatureSchema::new(vec![NumericColumn::Cost], vec![CategoricalColumn::City]);
        assert!(matches!(
            state.ensure_schema(&other),
            Err(EncoderError::SchemaMismatch { .. })
        ));
        assert!(state.ensure_schema(&FeatureSchema::default()).is_ok());
    }

    #[test]
    fn test_unsorted_vocabulary_is_corrupt() {
        let mut encoder = FeatureEncoder::default();
        let mut state = encoder.fit(&table()).unwrap().clone();
        state.vocabularies[0].categories.reverse();

        assert!(matches!(state.validate(), Err(EncoderError::CorruptState(_))));
    }
}
