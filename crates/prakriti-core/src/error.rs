use std::path::PathBuf;

use thiserror::Error;

use crate::types::Algorithm;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Category '{value}' was not seen during training for feature '{feature}'")]
    UnseenCategory { feature: String, value: String },

    #[error("No class is encoded as {0}")]
    UnknownClass(usize),

    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    #[error("Artifact I/O failed for {}: {source}", .path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fitting {algorithm} failed: {message}")]
    Fit { algorithm: Algorithm, message: String },

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
