//! # dinex Similarity
//!
//! Filter-then-rank recommendations over an encoded restaurant table.
//!
//! ## Features
//!
//! - **Joined Index**: each row carries its record and its encoded vector,
//!   so the two can never be reordered independently
//! - **Filtering**: exact city and area, case-insensitive cuisine substring,
//!   inclusive minimum rating
//! - **Ranking**: cosine similarity against the encoded query, top k,
//!   ties kept in row order
//! - **Explainability**: per-column share of every score
//!
//! ## Example
//!
//! ```rust
//! use dinex_core::{RecommendQuery, Restaurant};
//! use dinex_schema::FeatureEncoder;
//! use dinex_similarity::{Recommender, RestaurantIndex};
//!
//! let table = vec![
//!     Restaurant::new("Punjab Grill", "Chennai", "Anna Nagar", "North Indian", 4.5, 500, 600.0),
//!     Restaurant::new("Delhi Darbar", "Chennai", "Anna Nagar", "North Indian", 4.2, 120, 300.0),
//!     Restaurant::new("Kwality", "Chennai", "Anna Nagar", "North Indian", 3.9, 80, 250.0),
//! ];
//!
//! let mut encoder = FeatureEncoder::default();
//! encoder.fit(&table).unwrap();
//! let state = encoder.into_state().unwrap();
//!
//! let index = RestaurantIndex::build(table, &state).unwrap();
//! let recommender = Recommender::new(index, state).unwrap();
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
//! let results = recommender.recommend(&query, 5).unwrap();
//! assert_eq!(results.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Query     │────>│   Filter    │────>│ Candidates  │
//! │ (4 fields)  │     │ (index rows)│     │ (+ vectors) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                        │
//!       │              ┌─────────────┐           │
//!       └─────────────>│   Encoder   │──> cosine <┘
//!                      └─────────────┘      │
//!                                     ┌─────────────┐
//!                                     │  Top k      │
//!                                     └─────────────┘
//! ```

pub mod index;
pub mod catalog;
pub mod recommend;
pub mod explain;

// Re-export main types for convenience
pub use index::{IndexedRestaurant, RestaurantIndex};
pub use recommend::{Recommendation, Recommender};
pub use explain::{ExplainedRecommendation, RecommendationResponse, SimilarityStats};
