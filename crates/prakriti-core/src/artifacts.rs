//! Flat-file artifact store.
//!
//! A training run writes four JSON documents (classifier, label encoder,
//! feature encoders, metadata), each once with a run timestamp and once as
//! `*_latest.json`. The predictor only reads the `latest` copies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::{FeatureEncoders, LabelEncoder};
use crate::error::{Error, Result};
use crate::types::{ModelMetadata, SCHEMA_VERSION};

pub const CLASSIFIER_STEM: &str = "prakriti_classifier";
pub const LABEL_ENCODER_STEM: &str = "label_encoder";
pub const FEATURE_ENCODERS_STEM: &str = "feature_encoders";
pub const METADATA_STEM: &str = "model_metadata";
pub const LATEST_TAG: &str = "latest";

const STEMS: [&str; 4] = [CLASSIFIER_STEM, LABEL_ENCODER_STEM, FEATURE_ENCODERS_STEM, METADATA_STEM];

/// Run tag used in timestamped file names, e.g. `20261014_114205`.
pub fn timestamp_tag() -> String { chrono::Local::now().format("%Y%m%d_%H%M%S").to_string() }

/// Digest over both encoder sets; stored in metadata so a predictor can detect
/// encoders and metadata from different runs.
pub fn encoder_fingerprint(labels: &LabelEncoder, features: &FeatureEncoders) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&serde_json::to_vec(labels)?);
    hasher.update(&serde_json::to_vec(features)?);
    Ok(hasher.finalize().to_hex().to_string())
}

/// Everything needed to serve predictions.
#[derive(Debug, Clone)]
pub struct ArtifactBundle<M> {
    pub model: M,
    pub label_encoder: LabelEncoder,
    pub feature_encoders: FeatureEncoders,
    pub metadata: ModelMetadata,
}

impl<M> ArtifactBundle<M> {
    /// Check that encoders and metadata agree on the feature schema and class list.
    pub fn validate(&self) -> Result<()> {
        let meta = &self.metadata;
        if meta.schema_version > SCHEMA_VERSION {
            return Err(Error::ArtifactMismatch(format!(
                "artifact schema version {} is newer than supported {}",
                meta.schema_version, SCHEMA_VERSION
            )));
        }
        if meta.num_features != meta.feature_names.len() {
            return Err(Error::ArtifactMismatch(format!(
                "num_features is {} but {} feature names are listed",
                meta.num_features,
                meta.feature_names.len()
            )));
        }
        if let Some(missing) = meta.feature_names.iter().find(|f| !self.feature_encoders.contains(f)) {
            return Err(Error::ArtifactMismatch(format!("no encoder for feature '{missing}'")));
        }
        if self.label_encoder.classes() != meta.dosha_classes.as_slice() {
            return Err(Error::ArtifactMismatch(format!(
                "label encoder classes {:?} differ from metadata {:?}",
                self.label_encoder.classes(),
                meta.dosha_classes
            )));
        }
        if let Some(expected) = &meta.encoder_fingerprint {
            let actual = encoder_fingerprint(&self.label_encoder, &self.feature_encoders)?;
            if &actual != expected {
                return Err(Error::ArtifactMismatch("encoders do not match the metadata fingerprint".to_string()));
            }
        }
        Ok(())
    }
}

/// Paths written by [`ArtifactStore::save`].
#[derive(Debug, Clone)]
pub struct SavedArtifacts {
    pub timestamp: String,
    pub timestamped: Vec<PathBuf>,
    pub latest: Vec<PathBuf>,
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn path_for(&self, stem: &str, tag: &str) -> PathBuf { self.dir.join(format!("{stem}_{tag}.json")) }

    pub fn latest_paths(&self) -> Vec<PathBuf> { STEMS.iter().map(|s| self.path_for(s, LATEST_TAG)).collect() }

    pub fn save<M: Serialize>(&self, bundle: &ArtifactBundle<M>, timestamp: &str) -> Result<SavedArtifacts> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::ArtifactIo { path: self.dir.clone(), source })?;
        let documents: [(&str, Vec<u8>); 4] = [
            (CLASSIFIER_STEM, serde_json::to_vec(&bundle.model)?),
            (LABEL_ENCODER_STEM, serde_json::to_vec_pretty(&bundle.label_encoder)?),
            (FEATURE_ENCODERS_STEM, serde_json::to_vec_pretty(&bundle.feature_encoders)?),
            (METADATA_STEM, serde_json::to_vec_pretty(&bundle.metadata)?),
        ];
        let mut saved = SavedArtifacts { timestamp: timestamp.to_string(), timestamped: Vec::new(), latest: Vec::new() };
        for (stem, bytes) in &documents {
            let stamped = self.path_for(stem, timestamp);
            write_file(&stamped, bytes)?;
            tracing::info!(path = %stamped.display(), "saved artifact");
            saved.timestamped.push(stamped);
            let latest = self.path_for(stem, LATEST_TAG);
            write_file(&latest, bytes)?;
            saved.latest.push(latest);
        }
        Ok(saved)
    }

    /// Load and validate the `latest` artifacts.
    pub fn load_latest<M: DeserializeOwned>(&self) -> Result<ArtifactBundle<M>> {
        let bundle = ArtifactBundle {
            model: read_json(&self.path_for(CLASSIFIER_STEM, LATEST_TAG))?,
            label_encoder: read_json(&self.path_for(LABEL_ENCODER_STEM, LATEST_TAG))?,
            feature_encoders: read_json(&self.path_for(FEATURE_ENCODERS_STEM, LATEST_TAG))?,
            metadata: read_json(&self.path_for(METADATA_STEM, LATEST_TAG))?,
        };
        bundle.validate()?;
        Ok(bundle)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| Error::ArtifactIo { path: path.to_path_buf(), source })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() { return Err(Error::NotFound(format!("artifact {}", path.display()))); }
    let bytes = fs::read(path).map_err(|source| Error::ArtifactIo { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_slice(&bytes)?)
}
