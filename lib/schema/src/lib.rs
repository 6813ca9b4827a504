//! # dinex Schema
//!
//! Feature encoding for restaurant records.
//!
//! ## Overview
//!
//! Similarity between restaurants is measured on fixed-width vectors.
//! This crate defines the column layout ([`FeatureSchema`]) and the
//! [`FeatureEncoder`] that turns records into those vectors.
//!
//! **How it works:**
//! 1. `fit` learns min/max for each numeric column and the sorted
//!    vocabulary of each categorical column from the reference table
//! 2. `transform` scales numeric columns to [0, 1] and one-hot encodes
//!    categorical columns; unseen categories give an all-zero block
//! 3. The fitted [`EncoderState`] is serialized next to the encoded table
//!    and reused unchanged for every query
//!
//! ## Example
//!
//! ```rust
//! use dinex_core::Restaurant;
//! use dinex_schema::FeatureEncoder;
//!
//! let table = vec![
//!     Restaurant::new("A", "Chennai", "Anna Nagar", "North Indian", 4.5, 100, 200.0),
//!     Restaurant::new("B", "Pune", "Baner", "Cafe", 3.9, 20, 500.0),
//! ];
//!
//! let mut encoder = FeatureEncoder::default();
//! encoder.fit(&table).unwrap();
//!
//! let vector = encoder.transform(&table[0]).unwrap();
//! assert_eq!(vector.dim(), encoder.state().unwrap().dim());
//! ```
//!
//! ## Vector Layout
//!
//! ```text
//! ┌────────┬──────┬──────────────┬───────────┬───────────┬──────────────┐
//! │ rating │ cost │ rating_count │ city 1..n │ area 1..n │ cuisine 1..n │
//! └────────┴──────┴──────────────┴───────────┴───────────┴──────────────┘
//!   min-max scaled                  one-hot blocks
//! ```

pub mod schema;
pub mod encoder;

// Re-export main types
pub use schema::{
    FeatureSchema,
    NumericColumn,
    CategoricalColumn,
    SchemaError,
};
pub use encoder::{
    FeatureEncoder,
    EncoderState,
    EncoderError,
    NumericScale,
    CategoryVocabulary,
    FeatureGroup,
};
