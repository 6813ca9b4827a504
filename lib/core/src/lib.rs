//! # dinex Core
//!
//! Core library for the dinex restaurant recommender.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`Restaurant`] - One cleaned restaurant record
//! - [`RowId`] - Row identity shared by a record and its encoded vector
//! - [`Vector`] - Dense encoded feature vector with cosine similarity
//! - [`RecommendQuery`] - The user's filter and preference values
//! - [`RestaurantFilter`] - Predicates that narrow the candidate set
//!
//! ## Example
//!
//! ```rust
//! use dinex_core::{Filter, RecommendQuery, Restaurant, RestaurantFilter};
//!
//! let query = RecommendQuery::builder()
//!     .city("Chennai")
//!     .area("Anna Nagar")
//!     .cuisine("North Indian")
//!     .min_rating(4.0)
//!     .cost(300.0)
//!     .build()
//!     .unwrap();
//!
//! let filter = RestaurantFilter::for_query(&query);
//! let r = Restaurant::new("Punjabi Dhaba", "Chennai", "Anna Nagar", "North Indian", 4.4, 250, 350.0);
//! assert!(filter.matches(&r));
//! ```

pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod vector;

pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, NumberField, RestaurantFilter, TextField};
pub use query::{QueryBuilder, RecommendQuery};
pub use record::{Restaurant, RowId};
pub use vector::Vector;
