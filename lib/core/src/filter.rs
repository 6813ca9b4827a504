// Record filters for narrowing the candidate set
use crate::{RecommendQuery, Restaurant};

pub trait Filter {
    fn matches(&self, restaurant: &Restaurant) -> bool;
}

/// Text fields a condition can inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    City,
    Area,
    Cuisine,
}

/// Numeric fields a condition can inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    Rating,
    RatingCount,
    Cost,
}

#[derive(Debug, Clone)]
pub enum FilterCondition {
    Equals { field: TextField, value: String },
    ContainsIgnoreCase { field: TextField, value: String },
    GreaterEqual { field: NumberField, value: f64 },
    LessEqual { field: NumberField, value: f64 },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl TextField {
    fn get(self, r: &Restaurant) -> &str {
        match self {
            TextField::Name => &r.name,
            TextField::City => &r.city,
            TextField::Area => &r.area,
            TextField::Cuisine => &r.cuisine,
        }
    }
}

impl NumberField {
    fn get(self, r: &Restaurant) -> f64 {
        match self {
            NumberField::Rating => r.rating,
            NumberField::RatingCount => r.rating_count as f64,
            NumberField::Cost => r.cost,
        }
    }
}

pub struct RestaurantFilter {
    condition: FilterCondition,
}

impl RestaurantFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// The four recommendation predicates, all of which must hold:
    /// exact city, exact area, case-insensitive cuisine substring and
    /// an inclusive minimum rating.
    pub fn for_query(query: &RecommendQuery) -> Self {
        Self::new(FilterCondition::And(vec![
            FilterCondition::Equals { field: TextField::City, value: query.city.clone() },
            FilterCondition::Equals { field: TextField::Area, value: query.area.clone() },
            FilterCondition::ContainsIgnoreCase {
                field: TextField::Cuisine,
                value: query.cuisine.clone(),
            },
            FilterCondition::GreaterEqual { field: NumberField::Rating, value: query.min_rating },
        ]))
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn matches_condition(condition: &FilterCondition, r: &Restaurant) -> bool {
        match condition {
            FilterCondition::Equals { field, value } => field.get(r) == value,
            FilterCondition::ContainsIgnoreCase { field, value } => {
                field.get(r).to_lowercase().contains(&value.to_lowercase())
            }
            FilterCondition::GreaterEqual { field, value } => field.get(r) >= *value,
            FilterCondition::LessEqual { field, value } => field.get(r) <= *value,
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, r))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, r))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, r),
        }
    }
}

impl Filter for RestaurantFilter {
    fn matches(&self, restaurant: &Restaurant) -> bool {
        Self::matches_condition(&self.condition, restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> RecommendQuery {
        RecommendQuery::builder()
            .city("Chennai")
            .area("Anna Nagar")
            .cuisine("north indian")
            .min_rating(4.0)
            .cost(300.0)
            .build()
            .unwrap()
    }

    fn restaurant(city: &str, area: &str, cuisine: &str, rating: f64) -> Restaurant {
        Restaurant::new("R", city, area, cuisine, rating, 10, 250.0)
    }

    #[test]
    fn test_all_predicates_match() {
        let filter = RestaurantFilter::for_query(&query());
        assert!(filter.matches(&restaurant("Chennai", "Anna Nagar", "North Indian,Chinese", 4.2)));
    }

    #[test]
    fn test_rating_bound_is_inclusive() {
        let filter = RestaurantFilter::for_query(&query());
        assert!(filter.matches(&restaurant("Chennai", "Anna Nagar", "North Indian", 4.0)));
        assert!(!filter.matches(&restaurant("Chennai", "Anna Nagar", "North Indian", 3.9)));
    }

    #[test]
    fn test_city_and_area_are_exact() {
        let filter = RestaurantFilter::for_query(&query());
        assert!(!filter.matches(&restaurant("chennai", "Anna Nagar", "North Indian", 4.5)));
        assert!(!filter.matches(&restaurant("Chennai", "Anna Nagar West", "North Indian", 4.5)));
    }

    #[test]
    fn test_cuisine_case_ignored_on_both_sides() {
        let mut q = query();
        q.cuisine = "NORTH Indian".to_string();
        let filter = RestaurantFilter::for_query(&q);

        assert!(filter.matches(&restaurant("Chennai", "Anna Nagar", "north indian,Chinese", 4.5)));
        match filter.condition() {
            FilterCondition::And(conditions) => match &conditions[2] {
                FilterCondition::ContainsIgnoreCase { value, .. } => assert_eq!(value, "NORTH Indian"),
                other => panic!("unexpected cuisine condition {:?}", other),
            },
            other => panic!("unexpected condition {:?}", other),
        }
    }

    #[test]
    fn test_cuisine_mismatch() {
        let filter = RestaurantFilter::for_query(&query());
        assert!(!filter.matches(&restaurant("Chennai", "Anna Nagar", "South Indian", 4.5)));
    }

    #[test]
    fn test_or_and_not() {
        let filter = RestaurantFilter::new(FilterCondition::Or(vec![
            FilterCondition::LessEqual { field: NumberField::Cost, value: 200.0 },
            FilterCondition::Not(Box::new(FilterCondition::Equals {
                field: TextField::City,
                value: "Chennai".to_string(),
            })),
        ]));

        assert!(!filter.matches(&restaurant("Chennai", "Adyar", "Cafe", 4.0)));
        assert!(filter.matches(&restaurant("Pune", "Baner", "Cafe", 4.0)));
    }
}
