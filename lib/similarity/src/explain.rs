//! Explainability for recommendation results
//!
//! Provides output structures that break each cosine score down into the
//! share contributed by every source column.

use dinex_core::{Restaurant, RowId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A recommendation with its per-feature score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedRecommendation {
    pub row: RowId,
    /// Cosine similarity to the encoded query
    pub score: f32,
    pub restaurant: Restaurant,
    /// Share of the score per source column; the shares sum to `score`
    pub explain: BTreeMap<String, f32>,
}

/// Response for an explained recommendation request
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub result: Vec<ExplainedRecommendation>,
    pub stats: SimilarityStats,
}

/// Summary statistics for a recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityStats {
    /// Number of rows that passed the filters
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Average score of results
    pub avg_score: f32,
    /// Score of best result
    pub best_score: f32,
    /// Column that contributed most to the best result
    pub top_contributing_feature: Option<String>,
}

impl SimilarityStats {
    /// Compute stats from ranked results
    pub fn compute(results: &[ExplainedRecommendation], candidates_count: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_feature: None,
            };
        }

        let avg_score = results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32;
        let best_score = results[0].score; // Results are sorted

        // Ties go to the alphabetically first column
        let top_contributing_feature = results[0]
            .explain
            .iter()
            .fold(None::<(&String, f32)>, |best, (name, &share)| match best {
                Some((_, top)) if share <= top => best,
                _ => Some((name, share)),
            })
            .map(|(name, _)| name.clone());

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score,
            top_contributing_feature,
        }
    }
}
