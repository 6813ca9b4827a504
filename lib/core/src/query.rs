//! User query for a recommendation request
//!
//! A query carries the four filter fields the user picks plus the
//! preference values that are encoded and compared against candidates.

use crate::{Error, Restaurant, Result};
use serde::{Deserialize, Serialize};

/// A validated recommendation query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendQuery {
    pub city: String,
    pub area: String,
    pub cuisine: String,
    /// Inclusive lower bound on rating
    pub min_rating: f64,
    /// Preferred cost for two
    pub cost: f64,
    /// Not offered to users; defaults to 0
    #[serde(default)]
    pub rating_count: u64,
}

impl RecommendQuery {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    /// Reject blank filter fields and non-finite numbers
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("city", &self.city), ("area", &self.area), ("cuisine", &self.cuisine)] {
            if value.trim().is_empty() {
                return Err(Error::MissingField(name));
            }
        }
        if !self.min_rating.is_finite() {
            return Err(Error::InvalidQuery(format!(
                "min_rating must be finite, got {}",
                self.min_rating
            )));
        }
        if !self.cost.is_finite() {
            return Err(Error::InvalidQuery(format!("cost must be finite, got {}", self.cost)));
        }
        Ok(())
    }

    /// The synthetic record that gets encoded for scoring
    ///
    /// The minimum rating stands in for the preferred rating.
    pub fn as_record(&self) -> Restaurant {
        Restaurant {
            name: String::new(),
            city: self.city.clone(),
            area: self.area.clone(),
            cuisine: self.cuisine.clone(),
            rating: self.min_rating,
            rating_count: self.rating_count,
            cost: self.cost,
        }
    }
}

/// Builder that refuses to default the required filter fields
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    city: Option<String>,
    area: Option<String>,
    cuisine: Option<String>,
    min_rating: Option<f64>,
    cost: Option<f64>,
    rating_count: u64,
}

impl QueryBuilder {
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn rating_count(mut self, count: u64) -> Self {
        self.rating_count = count;
        self
    }

    pub fn build(self) -> Result<RecommendQuery> {
        let query = RecommendQuery {
            city: self.city.ok_or(Error::MissingField("city"))?,
            area: self.area.ok_or(Error::MissingField("area"))?,
            cuisine: self.cuisine.ok_or(Error::MissingField("cuisine"))?,
            min_rating: self.min_rating.ok_or(Error::MissingField("min_rating"))?,
            cost: self.cost.ok_or(Error::MissingField("cost"))?,
            rating_count: self.rating_count,
        };
        query.validate()?;
        Ok(query)
    }
}
