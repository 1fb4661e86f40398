//! Held-out evaluation of the selected model, written as `evaluation_report.json`.

use anyhow::Context;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use prakriti_core::types::{Algorithm, FeatureSchema};
use prakriti_models::metrics::{accuracy, classification_report, confusion_matrix, weighted_scores, ClassReport, WeightedScores};
use prakriti_models::{Classifier, TrainedModel};

pub const REPORT_FILE: &str = "evaluation_report.json";
pub const TOP_FEATURES: usize = 10;

/// Scores of one trained candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub model_name: String,
    pub algorithm: Algorithm,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_accuracy: Option<f64>,
}

impl CandidateResult {
    /// Value used to rank candidates: CV accuracy when computed, else test accuracy.
    pub fn selection_score(&self) -> f64 { self.cv_accuracy.unwrap_or(self.test_accuracy) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model_name: String,
    pub algorithm: Algorithm,
    pub test_accuracy: f64,
    pub classes: Vec<String>,
    pub classification_report: Vec<ClassReport>,
    pub weighted_avg: WeightedScores,
    /// Rows are actual classes, columns predicted, both in `classes` order.
    pub confusion_matrix: Vec<Vec<usize>>,
    #[serde(default)]
    pub top_features: Vec<FeatureImportance>,
    pub comparison: Vec<CandidateResult>,
}

impl EvaluationReport {
    pub fn build(
        model: &TrainedModel,
        classes: &[String],
        schema: &FeatureSchema,
        x_test: &Array2<f64>,
        y_test: &[usize],
        comparison: &[CandidateResult],
    ) -> Self {
        let predicted = model.predict(x_test);
        let report = classification_report(y_test, &predicted, classes);
        let algorithm = model.algorithm();
        Self {
            model_name: algorithm.display_name().to_string(),
            algorithm,
            test_accuracy: accuracy(y_test, &predicted),
            classes: classes.to_vec(),
            weighted_avg: weighted_scores(&report),
            classification_report: report,
            confusion_matrix: confusion_matrix(y_test, &predicted, classes.len()),
            top_features: model.feature_importances().map(|imp| top_features(imp, schema, TOP_FEATURES)).unwrap_or_default(),
            comparison: comparison.to_vec(),
        }
    }

    pub fn write(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating outputs dir {}", dir.display()))?;
        let path = dir.join(REPORT_FILE);
        fs::write(&path, serde_json::to_vec_pretty(self)?).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// The `n` most important features, largest first; ties keep schema order.
pub fn top_features(importances: &[f64], schema: &FeatureSchema, n: usize) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = schema
        .iter()
        .zip(importances)
        .map(|(feature, &importance)| FeatureImportance { feature: feature.to_string(), importance })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked.truncate(n);
    ranked
}
