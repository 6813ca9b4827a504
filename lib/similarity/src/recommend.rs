//! Similarity recommender
//!
//! Narrows the index with the query's filters, scores the surviving rows
//! by cosine similarity against the encoded query and returns the top k.

use crate::explain::{ExplainedRecommendation, RecommendationResponse, SimilarityStats};
use crate::index::{IndexedRestaurant, RestaurantIndex};
use dinex_core::{Error, RecommendQuery, Restaurant, RestaurantFilter, Result, RowId, Vector};
use dinex_schema::EncoderState;
use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::debug;

/// One ranked restaurant
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub row: RowId,
    pub restaurant: Restaurant,
    /// Cosine similarity to the encoded query
    pub score: f32,
}

/// Candidates that passed the filters, best first
struct Ranking<'a> {
    scored: Vec<(&'a IndexedRestaurant, f32)>,
    candidates_count: usize,
    query_vector: Vector,
}

/// Immutable serving context: the joined index and the encoder that
/// produced its vectors
///
/// Built once at startup; every method takes `&self`.
#[derive(Debug, Clone)]
pub struct Recommender {
    index: RestaurantIndex,
    encoder: EncoderState,
}

impl Recommender {
    /// Create a recommender, checking the index was encoded at the
    /// encoder's width
    pub fn new(index: RestaurantIndex, encoder: EncoderState) -> Result<Self> {
        if !index.is_empty() && index.dim() != encoder.dim() {
            return Err(Error::InvalidDimension {
                expected: encoder.dim(),
                actual: index.dim(),
            });
        }
        Ok(Self { index, encoder })
    }

    pub fn index(&self) -> &RestaurantIndex {
        &self.index
    }

    pub fn encoder(&self) -> &EncoderState {
        &self.encoder
    }

    /// Rows passing all four filters, in row order
    pub fn candidates(&self, query: &RecommendQuery) -> Result<Vec<&IndexedRestaurant>> {
        query.validate()?;
        let filter = RestaurantFilter::for_query(query);
        Ok(self.index.filter(&filter).collect())
    }

    /// Top `k` restaurants for the query, most similar first
    ///
    /// Returns an empty list when nothing passes the filters. Equal
    /// scores keep row order.
    pub fn recommend(&self, query: &RecommendQuery, k: usize) -> Result<Vec<Recommendation>> {
        let ranking = self.rank(query, k)?;
        Ok(ranking
            .scored
            .into_iter()
            .map(|(c, score)| Recommendation {
                row: c.row,
                restaurant: c.restaurant.clone(),
                score,
            })
            .collect())
    }

    /// Same ranking as [`recommend`](Self::recommend) with the per-feature
    /// share of each score and summary stats
    pub fn recommend_explained(
        &self,
        query: &RecommendQuery,
        k: usize,
    ) -> Result<RecommendationResponse> {
        let ranking = self.rank(query, k)?;
        let groups = self.encoder.feature_groups();
        let ranges: Vec<_> = groups.iter().map(|g| g.range.clone()).collect();

        let result: Vec<ExplainedRecommendation> = ranking
            .scored
            .into_iter()
            .map(|(c, score)| {
                let shares = ranking.query_vector.cosine_contributions(&c.vector, &ranges);
                ExplainedRecommendation {
                    row: c.row,
                    score,
                    restaurant: c.restaurant.clone(),
                    explain: groups
                        .iter()
                        .zip(shares)
                        .map(|(g, share)| (g.name.to_string(), share))
                        .collect(),
                }
            })
            .collect();

        let stats = SimilarityStats::compute(&result, ranking.candidates_count);
        Ok(RecommendationResponse { result, stats })
    }

    fn rank(&self, query: &RecommendQuery, k: usize) -> Result<Ranking<'_>> {
        let candidates = self.candidates(query)?;
        let candidates_count = candidates.len();
        debug!(
            city = %query.city,
            area = %query.area,
            cuisine = %query.cuisine,
            candidates = candidates_count,
            "Filtered candidates"
        );

        if candidates.is_empty() || k == 0 {
            return Ok(Ranking {
                scored: Vec::new(),
                candidates_count,
                query_vector: Vector::zeros(self.encoder.dim()),
            });
        }

        let query_vector = self
            .encoder
            .transform(&query.as_record())
            .map_err(|e| Error::Encoder(e.to_string()))?;

        let mut scored: Vec<(&IndexedRestaurant, f32)> = candidates
            .into_iter()
            .map(|c| {
                let score = query_vector.cosine_similarity(&c.vector);
                (c, score)
            })
            .collect();

        // Stable, so ties stay in row order
        scored.sort_by(|a, b| OrderedFloat(b.1).cmp(&OrderedFloat(a.1)));
        scored.truncate(k);

        debug!(returned = scored.len(), k, "Ranked candidates");

        Ok(Ranking {
            scored,
            candidates_count,
            query_vector,
        })
    }
}
