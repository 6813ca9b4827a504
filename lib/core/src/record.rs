use serde::{Deserialize, Serialize};
use std::fmt;

/// One cleaned restaurant row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub city: String,
    pub area: String,
    /// Free text, possibly several comma-separated cuisines
    pub cuisine: String,
    pub rating: f64,
    pub rating_count: u64,
    /// Cost for two
    pub cost: f64,
}

impl Restaurant {
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        area: impl Into<String>,
        cuisine: impl Into<String>,
        rating: f64,
        rating_count: u64,
        cost: f64,
    ) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            area: area.into(),
            cuisine: cuisine.into(),
            rating,
            rating_count,
            cost,
        }
    }
}

/// Stable row identity shared by a record and its encoded vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl RowId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for RowId {
    fn from(i: usize) -> Self {
        RowId(i)
    }
}
