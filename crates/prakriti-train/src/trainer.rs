//! End-to-end training run.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array2, Axis};
use std::path::PathBuf;

use prakriti_core::artifacts::{encoder_fingerprint, timestamp_tag, ArtifactBundle, ArtifactStore, SavedArtifacts};
use prakriti_core::config::{Config, TrainingSettings};
use prakriti_core::dataset::{stratified_folds, stratified_split, Dataset};
use prakriti_core::encoding::{FeatureEncoders, LabelEncoder};
use prakriti_core::types::{Algorithm, FeatureSchema, ModelMetadata, SCHEMA_VERSION};
use prakriti_models::metrics::{accuracy, classification_report, weighted_scores};
use prakriti_models::{fit_candidate, Classifier, TrainedModel};

use crate::evaluation::{CandidateResult, EvaluationReport};

/// Everything a run needs, resolved from config and CLI overrides.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub dataset_path: PathBuf,
    pub target_column: String,
    pub sentinel: String,
    pub model_dir: PathBuf,
    pub outputs_dir: PathBuf,
    pub training: TrainingSettings,
}

impl TrainOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        let s = config.settings()?;
        Ok(Self {
            dataset_path: config.resolve(&s.data.dataset_path),
            target_column: s.data.target_column,
            sentinel: s.inference.sentinel,
            model_dir: config.resolve(&s.artifacts.model_dir),
            outputs_dir: config.resolve(&s.artifacts.outputs_dir),
            training: s.training,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub metadata: ModelMetadata,
    pub candidates: Vec<CandidateResult>,
    pub report: EvaluationReport,
    pub report_path: PathBuf,
    pub saved: SavedArtifacts,
}

pub struct Trainer {
    options: TrainOptions,
}

impl Trainer {
    pub fn new(options: TrainOptions) -> Self { Self { options } }

    pub fn options(&self) -> &TrainOptions { &self.options }

    pub fn run(&self) -> Result<TrainingOutcome> {
        let path = &self.options.dataset_path;
        let dataset = Dataset::from_csv_path(path, &self.options.target_column, &self.options.sentinel)
            .with_context(|| format!("loading dataset {}", path.display()))?;
        self.run_on(dataset)
    }

    pub fn run_on(&self, dataset: Dataset) -> Result<TrainingOutcome> {
        let t = &self.options.training;
        tracing::info!(rows = dataset.len(), features = dataset.feature_names().len(), filled = dataset.filled_cells(), "dataset loaded");
        for (class, count) in dataset.class_distribution() { tracing::info!(%class, count, "class distribution"); }

        let label_encoder = LabelEncoder::fit(dataset.targets());
        if label_encoder.len() < 2 { bail!("need at least two classes, found {:?}", label_encoder.classes()); }
        let feature_encoders = FeatureEncoders::fit(&dataset);
        let schema = FeatureSchema::new(dataset.feature_names().to_vec());
        let x = feature_encoders.transform(&schema, dataset.rows())?;
        let y = label_encoder.encode_all(dataset.targets())?;
        let n_classes = label_encoder.len();

        let split = stratified_split(&y, t.test_size, t.seed);
        if split.train.is_empty() || split.test.is_empty() {
            bail!("test_size {} leaves an empty split for {} rows", t.test_size, y.len());
        }
        let (x_train, y_train) = subset(&x, &y, &split.train);
        let (x_test, y_test) = subset(&x, &y, &split.test);
        tracing::info!(train = y_train.len(), test = y_test.len(), "stratified split");

        let pb = if t.show_progress { ProgressBar::new(t.candidates.len() as u64) } else { ProgressBar::hidden() };
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} models {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let mut results = Vec::with_capacity(t.candidates.len());
        let mut models = Vec::with_capacity(t.candidates.len());
        for &algorithm in &t.candidates {
            pb.set_message(format!("training {algorithm}"));
            let model = fit_candidate(algorithm, t, &x_train, &y_train, n_classes)
                .with_context(|| format!("training {algorithm}"))?;
            let cv_accuracy = if t.cv_folds >= 2 { Some(cross_validate(algorithm, t, &x_train, &y_train, n_classes)?) } else { None };
            let result = score_candidate(&model, label_encoder.classes(), &x_train, &y_train, &x_test, &y_test, cv_accuracy);
            tracing::info!(model = %algorithm, train_acc = result.train_accuracy, test_acc = result.test_accuracy, f1 = result.f1_score, cv_acc = ?result.cv_accuracy, "candidate trained");
            results.push(result);
            models.push(model);
            pb.inc(1);
        }
        pb.finish_with_message("done");

        let best = select_best(&results).context("no candidates were trained")?;
        let winner = results[best].clone();
        let model = models.swap_remove(best);
        tracing::info!(model = %winner.algorithm, score = winner.selection_score(), "selected best model");

        let report = EvaluationReport::build(&model, label_encoder.classes(), &schema, &x_test, &y_test, &results);
        let report_path = report.write(&self.options.outputs_dir)?;

        let metadata = ModelMetadata {
            schema_version: SCHEMA_VERSION,
            model_name: winner.model_name.clone(),
            algorithm: winner.algorithm,
            train_accuracy: winner.train_accuracy,
            test_accuracy: winner.test_accuracy,
            f1_score: winner.f1_score,
            precision: winner.precision,
            recall: winner.recall,
            cv_accuracy: winner.cv_accuracy,
            training_date: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            dataset_size: dataset.len(),
            train_size: y_train.len(),
            test_size: y_test.len(),
            num_features: schema.len(),
            dosha_classes: label_encoder.classes().to_vec(),
            feature_names: schema,
            encoder_fingerprint: Some(encoder_fingerprint(&label_encoder, &feature_encoders)?),
        };
        let bundle = ArtifactBundle { model, label_encoder, feature_encoders, metadata };
        let saved = ArtifactStore::new(&self.options.model_dir)
            .save(&bundle, &timestamp_tag())
            .with_context(|| format!("saving artifacts to {}", self.options.model_dir.display()))?;

        Ok(TrainingOutcome { metadata: bundle.metadata, candidates: results, report, report_path, saved })
    }
}

fn subset(x: &Array2<f64>, y: &[usize], idx: &[usize]) -> (Array2<f64>, Vec<usize>) {
    (x.select(Axis(0), idx), idx.iter().map(|&i| y[i]).collect())
}

fn score_candidate(
    model: &TrainedModel,
    classes: &[String],
    x_train: &Array2<f64>,
    y_train: &[usize],
    x_test: &Array2<f64>,
    y_test: &[usize],
    cv_accuracy: Option<f64>,
) -> CandidateResult {
    let test_pred = model.predict(x_test);
    let weighted = weighted_scores(&classification_report(y_test, &test_pred, classes));
    let algorithm = model.algorithm();
    CandidateResult {
        model_name: algorithm.display_name().to_string(),
        algorithm,
        train_accuracy: accuracy(y_train, &model.predict(x_train)),
        test_accuracy: accuracy(y_test, &test_pred),
        precision: weighted.precision,
        recall: weighted.recall,
        f1_score: weighted.f1,
        cv_accuracy,
    }
}

/// Mean accuracy over stratified folds of the training split.
fn cross_validate(algorithm: Algorithm, t: &TrainingSettings, x: &Array2<f64>, y: &[usize], n_classes: usize) -> Result<f64> {
    let folds = stratified_folds(y, t.cv_folds, t.seed);
    let mut total = 0.0;
    for (i, fold) in folds.iter().enumerate() {
        let (x_fit, y_fit) = subset(x, y, &fold.train);
        let (x_val, y_val) = subset(x, y, &fold.test);
        let model = fit_candidate(algorithm, t, &x_fit, &y_fit, n_classes)
            .with_context(|| format!("cross-validating {algorithm} fold {i}"))?;
        total += accuracy(&y_val, &model.predict(&x_val));
    }
    Ok(total / folds.len() as f64)
}

/// Index of the highest selection score; the earliest candidate wins ties.
fn select_best(results: &[CandidateResult]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, r) in results.iter().enumerate() {
        if best.map_or(true, |b| r.selection_score() > results[b].selection_score()) { best = Some(i); }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(algorithm: Algorithm, test_accuracy: f64) -> CandidateResult {
        CandidateResult {
            model_name: algorithm.display_name().to_string(),
            algorithm,
            train_accuracy: 1.0,
            test_accuracy,
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
            cv_accuracy: None,
        }
    }

    #[test]
    fn first_candidate_wins_ties() {
        let results = [result(Algorithm::RandomForest, 0.9), result(Algorithm::Svm, 0.9), result(Algorithm::LogisticRegression, 0.8)];
        assert_eq!(select_best(&results), Some(0));
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn cv_score_overrides_test_accuracy() {
        let mut a = result(Algorithm::RandomForest, 0.95);
        a.cv_accuracy = Some(0.7);
        let mut b = result(Algorithm::GradientBoosting, 0.9);
        b.cv_accuracy = Some(0.8);
        assert_eq!(select_best(&[a, b]), Some(1));
    }
}
