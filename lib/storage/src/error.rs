use dinex_schema::EncoderError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Missing file '{name}' at {}", .path.display())]
    MissingFile { name: &'static str, path: PathBuf },

    #[error("Checksum mismatch for '{name}': manifest has {expected}, file has {actual}")]
    ChecksumMismatch {
        name: &'static str,
        expected: String,
        actual: String,
    },

    #[error("Row count mismatch in '{name}': manifest has {expected}, file has {actual}")]
    RowCountMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Encoded table header does not match encoder feature names at column {column}")]
    HeaderMismatch { column: usize },

    #[error("Encoded row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("No usable rows in {}", .0.display())]
    EmptyDataset(PathBuf),

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Index error: {0}")]
    Index(#[from] dinex_core::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
