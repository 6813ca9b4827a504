//! Option lists for the query front end
//!
//! The values a user can pick from: cities, the areas inside a city,
//! cuisines, and the cost range of a city.

use crate::index::RestaurantIndex;
use std::collections::BTreeSet;

impl RestaurantIndex {
    /// Distinct cities, sorted
    pub fn cities(&self) -> Vec<String> {
        sorted_unique(self.records().map(|r| r.city.as_str()))
    }

    /// Distinct areas within `city`, sorted
    pub fn areas(&self, city: &str) -> Vec<String> {
        sorted_unique(
            self.records()
                .filter(|r| r.city == city)
                .map(|r| r.area.as_str()),
        )
    }

    /// Distinct cuisine values, sorted
    pub fn cuisines(&self) -> Vec<String> {
        sorted_unique(self.records().map(|r| r.cuisine.as_str()))
    }

    /// Minimum and maximum cost within `city`
    pub fn cost_range(&self, city: &str) -> Option<(f64, f64)> {
        self.records()
            .filter(|r| r.city == city)
            .map(|r| r.cost)
            .fold(None, |acc, cost| match acc {
                None => Some((cost, cost)),
                Some((lo, hi)) => Some((lo.min(cost), hi.max(cost))),
            })
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
