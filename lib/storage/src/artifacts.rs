// Artifact bundle written by one preparation run and read at startup
use crate::error::{Result, StorageError};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use dinex_core::{Restaurant, Vector};
use dinex_schema::{EncoderState, FeatureSchema};
use dinex_similarity::{Recommender, RestaurantIndex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub const RESTAURANTS_FILE: &str = "restaurants.csv";
pub const ENCODED_FILE: &str = "encoded.csv";
pub const ENCODER_FILE: &str = "encoder.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Ties the three data files to the run that produced them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub row_count: usize,
    pub vector_dim: usize,
    pub checksums: ArtifactChecksums,
}

/// SHA-256 of each data file, hex encoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactChecksums {
    pub restaurants: String,
    pub encoded: String,
    pub encoder: String,
}

/// Everything a recommender needs, validated and joined
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub manifest: Manifest,
    pub index: RestaurantIndex,
    pub encoder: EncoderState,
}

impl LoadedArtifacts {
    pub fn into_recommender(self) -> Result<Recommender> {
        Ok(Recommender::new(self.index, self.encoder)?)
    }
}

pub struct ArtifactStore {
    dir: PathBuf,
    schema: FeatureSchema,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_schema(dir, FeatureSchema::default())
    }

    /// Store that only accepts an encoder fitted with `schema`
    pub fn with_schema<P: AsRef<Path>>(dir: P, schema: FeatureSchema) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            schema,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Write the index and its encoder as one bundle
    ///
    /// Data files are written first and the manifest last, so an
    /// interrupted run never leaves a manifest that vouches for files
    /// from a different run.
    pub fn save(&self, index: &RestaurantIndex, encoder: &EncoderState) -> Result<Manifest> {
        fs::create_dir_all(&self.dir)?;

        let restaurants = encode_restaurants(index.records())?;
        let encoded = encode_vectors(&encoder.feature_names(), index.iter().map(|r| &r.vector))?;
        let encoder_json = serde_json::to_vec_pretty(encoder)?;

        let manifest = Manifest {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            row_count: index.len(),
            vector_dim: encoder.dim(),
            checksums: ArtifactChecksums {
                restaurants: checksum(&restaurants),
                encoded: checksum(&encoded),
                encoder: checksum(&encoder_json),
            },
        };

        write_atomic(&self.path(RESTAURANTS_FILE), &restaurants)?;
        write_atomic(&self.path(ENCODED_FILE), &encoded)?;
        write_atomic(&self.path(ENCODER_FILE), &encoder_json)?;
        write_atomic(&self.path(MANIFEST_FILE), &serde_json::to_vec_pretty(&manifest)?)?;

        info!(
            run_id = %manifest.run_id,
            rows = manifest.row_count,
            dim = manifest.vector_dim,
            "Artifacts written to {:?}",
            self.dir
        );
        Ok(manifest)
    }

    /// Read and cross-check the bundle
    ///
    /// Fails if any file is missing, a checksum differs from the manifest,
    /// the encoder does not match the expected schema, or the two tables
    /// disagree on row count or vector width.
    pub fn load(&self) -> Result<LoadedArtifacts> {
        for file in [MANIFEST_FILE, RESTAURANTS_FILE, ENCODED_FILE, ENCODER_FILE] {
            let path = self.path(file);
            if !path.is_file() {
                return Err(StorageError::MissingFile { name: file, path });
            }
        }

        let manifest: Manifest = serde_json::from_slice(&fs::read(self.path(MANIFEST_FILE))?)?;

        let restaurants = self.read_verified(RESTAURANTS_FILE, &manifest.checksums.restaurants)?;
        let encoded = self.read_verified(ENCODED_FILE, &manifest.checksums.encoded)?;
        let encoder_json = self.read_verified(ENCODER_FILE, &manifest.checksums.encoder)?;

        let encoder: EncoderState = serde_json::from_slice(&encoder_json)?;
        encoder.validate()?;
        encoder.ensure_schema(&self.schema)?;
        if encoder.dim() != manifest.vector_dim {
            return Err(StorageError::RowWidth {
                row: 0,
                expected: manifest.vector_dim,
                actual: encoder.dim(),
            });
        }

        let records = decode_restaurants(&restaurants)?;
        if records.len() != manifest.row_count {
            return Err(StorageError::RowCountMismatch {
                name: RESTAURANTS_FILE,
                expected: manifest.row_count,
                actual: records.len(),
            });
        }

        let vectors = decode_vectors(&encoded, &encoder.feature_names())?;
        if vectors.len() != manifest.row_count {
            return Err(StorageError::RowCountMismatch {
                name: ENCODED_FILE,
                expected: manifest.row_count,
                actual: vectors.len(),
            });
        }

        let index = RestaurantIndex::new(records, vectors)?;
        info!(
            run_id = %manifest.run_id,
            rows = index.len(),
            dim = encoder.dim(),
            "Loaded artifacts from {:?}",
            self.dir
        );

        Ok(LoadedArtifacts {
            manifest,
            index,
            encoder,
        })
    }

    fn read_verified(&self, file: &'static str, expected: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.path(file))?;
        let actual = checksum(&data);
        if actual != expected {
            return Err(StorageError::ChecksumMismatch {
                name: file,
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(data)
    }
}

fn checksum(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(data))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => StorageError::Io(e),
        })
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| StorageError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

fn encode_restaurants<'a>(records: impl Iterator<Item = &'a Restaurant>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    finish_csv(writer)
}

fn decode_restaurants(data: &[u8]) -> Result<Vec<Restaurant>> {
    let mut reader = csv::Reader::from_reader(data);
    let records = reader.deserialize().collect::<std::result::Result<Vec<Restaurant>, _>>()?;
    Ok(records)
}

fn encode_vectors<'a>(
    feature_names: &[String],
    vectors: impl Iterator<Item = &'a Vector>,
) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(feature_names)?;
    for vector in vectors {
        writer.write_record(vector.as_slice().iter().map(|x| x.to_string()))?;
    }
    finish_csv(writer)
}

fn decode_vectors(data: &[u8], feature_names: &[String]) -> Result<Vec<Vector>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers = reader.headers()?.clone();
    if let Some(column) = (0..headers.len().max(feature_names.len()))
        .find(|&i| headers.get(i) != feature_names.get(i).map(String::as_str))
    {
        return Err(StorageError::HeaderMismatch { column });
    }

    let mut vectors = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != feature_names.len() {
            return Err(StorageError::RowWidth {
                row,
                expected: feature_names.len(),
                actual: record.len(),
            });
        }
        let values: Vec<f32> = record.deserialize(None)?;
        vectors.push(Vector::new(values));
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinex_schema::{CategoricalColumn, FeatureEncoder, NumericColumn};
    use tempfile::TempDir;

    fn records() -> Vec<Restaurant> {
        vec![
            Restaurant::new("Punjab Grill", "Chennai", "Anna Nagar", "North Indian", 4.5, 500, 600.0),
            Restaurant::new("Dosa, Plaza", "Chennai", "Adyar", "South Indian", 4.1, 51, 250.0),
            Restaurant::new("Cafe Pune", "Pune", "Pune", "Cafe,Bakery", 3.9, 1000, 1000.0),
        ]
    }

    fn index_and_encoder() -> (RestaurantIndex, EncoderState) {
        let mut encoder = FeatureEncoder::default();
        encoder.fit(&records()).unwrap();
        let state = encoder.into_state().unwrap();
        let index = RestaurantIndex::build(records(), &state).unwrap();
        (index, state)
    }

    fn saved_store() -> (TempDir, ArtifactStore, Manifest) {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (index, encoder) = index_and_encoder();
        let manifest = store.save(&index, &encoder).unwrap();
        (dir, store, manifest)
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store, manifest) = saved_store();
        let (index, encoder) = index_and_encoder();

        assert_eq!(manifest.row_count, 3);
        assert_eq!(manifest.vector_dim, encoder.dim());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.manifest, manifest);
        assert_eq!(loaded.encoder, encoder);
        assert_eq!(loaded.index.len(), index.len());
        for (a, b) in loaded.index.iter().zip(index.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_missing_file_is_named() {
        let (_dir, store, _) = saved_store();
        fs::remove_file(store.path(ENCODER_FILE)).unwrap();

        match store.load() {
            Err(StorageError::MissingFile { name, path }) => {
                assert_eq!(name, ENCODER_FILE);
                assert_eq!(path, store.path(ENCODER_FILE));
            }
            other => panic!("expected MissingFile, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_dir_reports_manifest() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(matches!(
            store.load(),
            Err(StorageError::MissingFile { name: MANIFEST_FILE, .. })
        ));
    }

    #[test]
    fn test_dropped_row_detected() {
        let (_dir, store, _) = saved_store();

        // Drop the last encoded row, as a botched offline edit would
        let path = store.path(ENCODED_FILE);
        let text = fs::read_to_string(&path).unwrap();
        let kept: Vec<&str> = text.lines().take(3).collect();
        fs::write(&path, kept.join("\n") + "\n").unwrap();

        assert!(matches!(
            store.load(),
            Err(StorageError::ChecksumMismatch { name: ENCODED_FILE, .. })
        ));
    }

    #[test]
    fn test_files_from_another_run_rejected() {
        let (_dir, store, _) = saved_store();

        let other_dir = TempDir::new().unwrap();
        let other = ArtifactStore::new(other_dir.path());
        let mut more = records();
        more.push(Restaurant::new("Extra", "Pune", "Baner", "Cafe", 4.0, 5, 300.0));
        let mut encoder = FeatureEncoder::default();
        encoder.fit(&more).unwrap();
        let state = encoder.into_state().unwrap();
        other
            .save(&RestaurantIndex::build(more, &state).unwrap(), &state)
            .unwrap();

        fs::copy(other.path(RESTAURANTS_FILE), store.path(RESTAURANTS_FILE)).unwrap();
        assert!(matches!(
            store.load(),
            Err(StorageError::ChecksumMismatch { name: RESTAURANTS_FILE, .. })
        ));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let (dir, _, _) = saved_store();
        let strict = ArtifactStore::with_schema(
            dir.path(),
            FeatureSchema::new(vec![NumericColumn::Cost], vec![CategoricalColumn::City]),
        );
        assert!(matches!(strict.load(), Err(StorageError::Encoder(_))));
    }

    #[test]
    fn test_header_mismatch() {
        let names = vec!["num__rating".to_string(), "num__cost".to_string()];
        let data = b"num__rating,num__price\n0.5,0.5\n";
        assert!(matches!(
            decode_vectors(data, &names),
            Err(StorageError::HeaderMismatch { column: 1 })
        ));
    }

    #[test]
    fn test_short_row_rejected() {
        let names = vec!["num__rating".to_string(), "num__cost".to_string()];
        let data = b"num__rating,num__cost\n0.5,0.5\n0.25\n";
        assert!(matches!(
            decode_vectors(data, &names),
            Err(StorageError::RowWidth { row: 1, expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_load_into_recommender() {
        let (_dir, store, _) = saved_store();
        let recommender = store.load().unwrap().into_recommender().unwrap();
        assert_eq!(recommender.index().cities(), vec!["Chennai", "Pune"]);
    }
}
