//! # dinex
//!
//! A restaurant recommender: narrow a restaurant table by city, area,
//! cuisine and minimum rating, then rank the survivors by cosine
//! similarity to the user's preferences.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! dinex prepare --input data/swiggy.csv
//! dinex options --city Chennai
//! dinex recommend --city Chennai --area "Anna Nagar" --cuisine "North Indian" --min-rating 4.0
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use dinex::prelude::*;
//!
//! // One-time startup: load the prepared bundle
//! let recommender = load_recommender("./artifacts").unwrap();
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
//! for rec in recommender.recommend(&query, 5).unwrap() {
//!     println!("{} ({:.3})", rec.restaurant.name, rec.score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`dinex-core`](https://docs.rs/dinex-core) - Records, vectors, queries and filters
//! - [`dinex-schema`](https://docs.rs/dinex-schema) - Feature schema and fitted encoder
//! - [`dinex-similarity`](https://docs.rs/dinex-similarity) - Joined index and recommender
//! - [`dinex-storage`](https://docs.rs/dinex-storage) - Cleaning, preparation and artifact loading

// Re-export core types
pub use dinex_core::{
    Error, Filter, FilterCondition, RecommendQuery, Restaurant, RestaurantFilter, Result, RowId,
    Vector,
};

// Re-export encoder
pub use dinex_schema::{EncoderError, EncoderState, FeatureEncoder, FeatureSchema};

// Re-export recommender
pub use dinex_similarity::{
    Recommendation, RecommendationResponse, Recommender, RestaurantIndex, SimilarityStats,
};

// Re-export storage
pub use dinex_storage::{load_recommender, prepare, ArtifactStore, Manifest, StorageError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_recommender, prepare, ArtifactStore, EncoderState, FeatureEncoder, RecommendQuery,
        Recommendation, Recommender, Restaurant, RestaurantIndex,
    };
}
