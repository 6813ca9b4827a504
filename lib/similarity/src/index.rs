//! Joined restaurant index
//!
//! Every row holds the raw record and its encoded vector together, so a
//! record can never drift away from the vector it was encoded into.

use dinex_core::{Error, Filter, Restaurant, Result, RowId, Vector};
use dinex_schema::EncoderState;

/// A restaurant together with its pre-computed vector
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRestaurant {
    pub row: RowId,
    pub restaurant: Restaurant,
    pub vector: Vector,
}

/// Read-only reference table of restaurants and their vectors
#[derive(Debug, Clone)]
pub struct RestaurantIndex {
    rows: Vec<IndexedRestaurant>,
    dim: usize,
}

impl RestaurantIndex {
    /// Join records with vectors encoded from them, position by position
    ///
    /// Fails if the two tables differ in length or the vectors differ in
    /// width.
    pub fn new(records: Vec<Restaurant>, vectors: Vec<Vector>) -> Result<Self> {
        if records.len() != vectors.len() {
            return Err(Error::Misaligned {
                records: records.len(),
                vectors: vectors.len(),
            });
        }

        let dim = vectors.first().map(Vector::dim).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }

        let rows = records
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (restaurant, vector))| IndexedRestaurant {
                row: RowId(i),
                restaurant,
                vector,
            })
            .collect();

        Ok(Self { rows, dim })
    }

    /// Encode the records with a fitted encoder and join the results
    pub fn build(records: Vec<Restaurant>, encoder: &EncoderState) -> Result<Self> {
        let vectors = encoder
            .transform_all(&records)
            .map_err(|e| Error::Encoder(e.to_string()))?;
        Self::new(records, vectors)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the stored vectors, 0 for an empty index
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: RowId) -> Option<&IndexedRestaurant> {
        self.rows.get(row.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedRestaurant> {
        self.rows.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &Restaurant> {
        self.rows.iter().map(|r| &r.restaurant)
    }

    /// Rows whose record passes the filter, in row order
    pub fn filter<'a, 'f, F: Filter + ?Sized>(
        &'a self,
        filter: &'f F,
    ) -> impl Iterator<Item = &'a IndexedRestaurant> + 'f
    where
        'a: 'f,
    {
        self.rows.iter().filter(move |r| filter.matches(&r.restaurant))
    }

    /// Split the index back into its two aligned tables
    pub fn into_parts(self) -> (Vec<Restaurant>, Vec<Vector>) {
        self.rows
            .into_iter()
            .map(|r| (r.restaurant, r.vector))
            .unzip()
    }
}
