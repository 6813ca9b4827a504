use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A dense vector of encoded features
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self { data: vec![0.0; dim] }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        dot_product(&self.data, &other.data)
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        dot_product(&self.data, &self.data).sqrt()
    }

    /// Compute cosine similarity with another vector
    ///
    /// Returns 0.0 when either vector has zero magnitude or the
    /// dimensions disagree.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        self.dot(other) / (norm_a * norm_b)
    }

    /// Split the cosine similarity into the share contributed by each range
    /// of components. The shares sum to `cosine_similarity(other)`.
    pub fn cosine_contributions(&self, other: &Vector, ranges: &[Range<usize>]) -> Vec<f32> {
        let norm_a = self.norm();
        let norm_b = other.norm();

        if self.dim() != other.dim() || norm_a == 0.0 || norm_b == 0.0 {
            return vec![0.0; ranges.len()];
        }

        let denom = norm_a * norm_b;
        ranges
            .iter()
            .map(|range| {
                match (self.data.get(range.clone()), other.data.get(range.clone())) {
                    (Some(a), Some(b)) => dot_product(a, b) / denom,
                    _ => 0.0,
                }
            })
            .collect()
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Scalar dot product with two accumulators for better pipelining
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot0 = 0.0f32;
    let mut dot1 = 0.0f32;

    let chunks = a.chunks_exact(2).zip(b.chunks_exact(2));
    for (ca, cb) in chunks {
        dot0 += ca[0] * cb[0];
        dot1 += ca[1] * cb[1];
    }

    if a.len() % 2 == 1 {
        let last = a.len() - 1;
        dot0 += a[last] * b[last];
    }

    dot0 + dot1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert!((v1.cosine_similarity(&v2) - 1.0).abs() < 1e-6);

        let v3 = Vector::new(vec![1.0, 0.0]);
        let v4 = Vector::new(vec![0.0, 1.0]);
        assert!((v3.cosine_similarity(&v4) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_magnitude_is_zero_similarity() {
        let zero = Vector::zeros(3);
        let v = Vector::new(vec![0.2, 0.4, 1.0]);
        assert_eq!(zero.cosine_similarity(&v), 0.0);
        assert_eq!(v.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let v1 = Vector::new(vec![1.0, 0.0, 1.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert_eq!(v1.cosine_similarity(&v2), 0.0);
    }

    #[test]
    fn test_odd_length_dot() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert!((dot_product(&a, &b) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_contributions_sum_to_cosine() {
        let a = Vector::new(vec![0.5, 0.1, 1.0, 0.0, 1.0]);
        let b = Vector::new(vec![0.4, 0.3, 1.0, 1.0, 0.0]);
        let parts = a.cosine_contributions(&b, &[0..2, 2..3, 3..5]);

        assert_eq!(parts.len(), 3);
        let total: f32 = parts.iter().sum();
        assert!((total - a.cosine_similarity(&b)).abs() < 1e-6);
        assert_eq!(parts[2], 0.0);
    }
}
