//! Offline preparation and startup loading
//!
//! `prepare` cleans a raw export, fits the encoder, encodes every row and
//! writes the artifact bundle. `load_recommender` reads the bundle back,
//! verifies it came from a single run and builds the serving context.

pub mod artifacts;
pub mod clean;
pub mod error;

pub use artifacts::{
    ArtifactChecksums, ArtifactStore, LoadedArtifacts, Manifest, ENCODED_FILE, ENCODER_FILE,
    MANIFEST_FILE, RESTAURANTS_FILE,
};
pub use clean::{clean_csv, clean_reader, CleaningReport, RawRestaurant};
pub use error::{Result, StorageError};

use dinex_schema::FeatureEncoder;
use dinex_similarity::{Recommender, RestaurantIndex};
use std::path::Path;
use tracing::warn;

/// Result of a preparation run
#[derive(Debug, Clone)]
pub struct PrepareOutcome {
    pub manifest: Manifest,
    pub raw_rows: usize,
    pub duplicates_dropped: usize,
    pub incomplete_dropped: usize,
}

/// Clean `input`, fit the encoder on the cleaned table and write the
/// artifact bundle to `artifacts_dir`
pub fn prepare<P: AsRef<Path>, Q: AsRef<Path>>(input: P, artifacts_dir: Q) -> Result<PrepareOutcome> {
    let input = input.as_ref();
    let report = clean_csv(input)?;
    if report.records.is_empty() {
        return Err(StorageError::EmptyDataset(input.to_path_buf()));
    }
    if report.incomplete_dropped > 0 {
        warn!(
            dropped = report.incomplete_dropped,
            "Dropped rows with missing or malformed fields"
        );
    }

    let mut encoder = FeatureEncoder::default();
    encoder.fit(&report.records)?;
    let state = encoder.into_state()?;

    let index = RestaurantIndex::build(report.records, &state)?;
    let manifest = ArtifactStore::new(artifacts_dir).save(&index, &state)?;

    Ok(PrepareOutcome {
        manifest,
        raw_rows: report.raw_rows,
        duplicates_dropped: report.duplicates_dropped,
        incomplete_dropped: report.incomplete_dropped,
    })
}

/// Build the serving context from a prepared artifact directory
///
/// This is the one initialization step for serving: the returned
/// [`Recommender`] is immutable and is passed to every query.
pub fn load_recommender<P: AsRef<Path>>(artifacts_dir: P) -> Result<Recommender> {
    ArtifactStore::new(artifacts_dir).load()?.into_recommender()
}
