//! Domain types shared by the training and prediction pipelines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Version of the artifact layout written by the trainer.
pub const SCHEMA_VERSION: u32 = 1;

/// Candidate classifier families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    RandomForest,
    GradientBoosting,
    LogisticRegression,
    Svm,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::RandomForest,
        Algorithm::GradientBoosting,
        Algorithm::LogisticRegression,
        Algorithm::Svm,
    ];

    /// Human readable name, also stored as `model_name` in the metadata.
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::RandomForest => "Random Forest",
            Algorithm::GradientBoosting => "Gradient Boosting",
            Algorithm::LogisticRegression => "Logistic Regression",
            Algorithm::Svm => "SVM",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.display_name()) }
}

/// Ordered feature names fixed at training time.
///
/// Inference input is reindexed to exactly this order before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FeatureSchema(Vec<String>);

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Self { Self(names) }
    pub fn names(&self) -> &[String] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }
    pub fn position(&self, name: &str) -> Option<usize> { self.0.iter().position(|n| n == name) }
}

fn default_schema_version() -> u32 { SCHEMA_VERSION }

/// Metadata document written once per training run.
///
/// This is the single source of truth the predictor consumes: the feature
/// order, the class list and the winning model's scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub model_name: String,
    pub algorithm: Algorithm,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub f1_score: f64,
    pub precision: f64,
    pub recall: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_accuracy: Option<f64>,
    pub training_date: String,
    pub dataset_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub num_features: usize,
    pub dosha_classes: Vec<String>,
    pub feature_names: FeatureSchema,
    /// blake3 digest over the serialized encoders, checked on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder_fingerprint: Option<String>,
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_dosha: String,
    pub confidence: f64,
    pub all_scores: BTreeMap<String, f64>,
}

impl PredictionResult {
    /// Scores sorted from most to least likely.
    pub fn ranked_scores(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.all_scores.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}
