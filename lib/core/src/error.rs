use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Query is missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Index is misaligned: {records} records but {vectors} vectors")]
    Misaligned { records: usize, vectors: usize },

    #[error("Encoder error: {0}")]
    Encoder(String),
}
