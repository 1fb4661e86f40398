use std::fs;
use tempfile::TempDir;

use prakriti_core::artifacts::{ArtifactStore, CLASSIFIER_STEM, METADATA_STEM};
use prakriti_core::config::TrainingSettings;
use prakriti_core::params::{BoostingParams, ForestParams};
use prakriti_core::types::Algorithm;
use prakriti_models::TrainedModel;
use prakriti_train::evaluation::REPORT_FILE;
use prakriti_train::{synthetic, TrainOptions, Trainer};

fn options(tmp: &TempDir, training: TrainingSettings) -> TrainOptions {
    TrainOptions {
        dataset_path: tmp.path().join("unused.csv"),
        target_column: "Dosha".into(),
        sentinel: "Unknown".into(),
        model_dir: tmp.path().join("models"),
        outputs_dir: tmp.path().join("outputs"),
        training,
    }
}

fn quick_settings() -> TrainingSettings {
    TrainingSettings {
        show_progress: false,
        random_forest: ForestParams { n_estimators: 15, ..ForestParams::default() },
        gradient_boosting: BoostingParams { n_estimators: 10, max_depth: 3, ..BoostingParams::default() },
        ..TrainingSettings::default()
    }
}

#[test]
fn full_run_persists_artifacts_and_report() {
    let tmp = TempDir::new().unwrap();
    let trainer = Trainer::new(options(&tmp, quick_settings()));
    let outcome = trainer.run_on(synthetic::generate(150, 3).unwrap()).unwrap();

    assert_eq!(outcome.candidates.len(), 4);
    let best = outcome.candidates.iter().map(|c| c.test_accuracy).fold(f64::MIN, f64::max);
    assert_eq!(outcome.metadata.test_accuracy, best, "winner has the top test accuracy");
    assert!(outcome.metadata.test_accuracy > 0.8, "synthetic data is learnable");
    assert_eq!(outcome.metadata.dataset_size, 150);
    assert_eq!(outcome.metadata.train_size + outcome.metadata.test_size, 150);
    assert_eq!(outcome.metadata.test_size, 30);
    assert_eq!(outcome.metadata.num_features, 29);
    assert_eq!(outcome.metadata.dosha_classes, vec!["Kapha", "Pitta", "Vata"]);
    assert!(outcome.metadata.cv_accuracy.is_none());

    assert_eq!(outcome.saved.timestamped.len(), 4);
    for p in &outcome.saved.latest { assert!(p.exists()); }
    let stamped_classifier = tmp.path().join("models").join(format!("{CLASSIFIER_STEM}_{}.json", outcome.saved.timestamp));
    assert!(stamped_classifier.exists());

    let report_path = tmp.path().join("outputs").join(REPORT_FILE);
    assert_eq!(outcome.report_path, report_path);
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["confusion_matrix"].as_array().unwrap().len(), 3);
    assert_eq!(report["comparison"].as_array().unwrap().len(), 4);
    assert_eq!(report["classification_report"][0]["label"], "Kapha");

    let bundle = ArtifactStore::new(tmp.path().join("models")).load_latest::<TrainedModel>().unwrap();
    assert_eq!(bundle.metadata, outcome.metadata);
}

#[test]
fn cross_validation_selects_and_records_cv_accuracy() {
    let tmp = TempDir::new().unwrap();
    let training = TrainingSettings {
        cv_folds: 3,
        candidates: vec![Algorithm::RandomForest, Algorithm::LogisticRegression],
        ..quick_settings()
    };
    let outcome = Trainer::new(options(&tmp, training)).run_on(synthetic::generate(90, 5).unwrap()).unwrap();
    assert!(outcome.candidates.iter().all(|c| c.cv_accuracy.is_some()));
    let best_cv = outcome.candidates.iter().filter_map(|c| c.cv_accuracy).fold(f64::MIN, f64::max);
    assert_eq!(outcome.metadata.cv_accuracy, Some(best_cv));

    let meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("models").join(format!("{METADATA_STEM}_latest.json"))).unwrap())
            .unwrap();
    assert!(meta["cv_accuracy"].is_number());
}

#[test]
fn single_candidate_runs_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let training = TrainingSettings { candidates: vec![Algorithm::Svm], ..quick_settings() };
    let outcome = Trainer::new(options(&tmp, training)).run_on(synthetic::generate(60, 8).unwrap()).unwrap();
    assert_eq!(outcome.metadata.model_name, "SVM");
    assert!(outcome.report.top_features.is_empty(), "SVM has no importances");
}

#[test]
fn csv_run_reads_dataset_from_disk() {
    let tmp = TempDir::new().unwrap();
    let ds = synthetic::generate(60, 2).unwrap();
    let mut csv = ds.feature_names().iter().map(|n| format!("\"{n}\"")).collect::<Vec<_>>().join(",");
    csv.push_str(",Dosha\n");
    for (row, target) in ds.rows().iter().zip(ds.targets()) {
        let cells: Vec<String> = row.iter().map(|c| format!("\"{c}\"")).collect();
        csv.push_str(&format!("{},{target}\n", cells.join(",")));
    }
    let mut opts = options(&tmp, TrainingSettings { candidates: vec![Algorithm::RandomForest], ..quick_settings() });
    opts.dataset_path = tmp.path().join("prakriti.csv");
    fs::write(&opts.dataset_path, csv).unwrap();

    let outcome = Trainer::new(opts).run().unwrap();
    assert_eq!(outcome.metadata.dataset_size, 60);
    assert_eq!(outcome.metadata.feature_names.names(), ds.feature_names());
}

#[test]
fn missing_dataset_is_reported() {
    let tmp = TempDir::new().unwrap();
    let err = Trainer::new(options(&tmp, quick_settings())).run().unwrap_err();
    assert!(format!("{err:#}").contains("unused.csv"));
}
