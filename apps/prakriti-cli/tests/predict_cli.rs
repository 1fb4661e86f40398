use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use prakriti_core::config::TrainingSettings;
use prakriti_core::params::ForestParams;
use prakriti_core::profile::DOSHA_CLASSES;
use prakriti_core::types::Algorithm;
use prakriti_train::{synthetic, TrainOptions, Trainer};

fn trained_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let training = TrainingSettings {
        candidates: vec![Algorithm::RandomForest],
        show_progress: false,
        random_forest: ForestParams { n_estimators: 15, ..ForestParams::default() },
        ..TrainingSettings::default()
    };
    let options = TrainOptions {
        dataset_path: tmp.path().join("unused.csv"),
        target_column: "Dosha".into(),
        sentinel: "Unknown".into(),
        model_dir: tmp.path().join("models"),
        outputs_dir: tmp.path().join("outputs"),
        training,
    };
    Trainer::new(options).run_on(synthetic::generate(90, 5).unwrap()).unwrap();
    tmp
}

fn predict(home: &Path, cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_prakriti-predict"))
        .args(args)
        .current_dir(cwd)
        .env("PRAKRITI_HOME", home)
        .env_remove("RUST_LOG")
        .env_remove("RUST_ENV")
        .output()
        .unwrap()
}

#[test]
fn success_writes_one_json_document_to_stdout() {
    let ws = trained_workspace();
    let model_dir = ws.path().join("models");
    let out = predict(ws.path(), ws.path(), &[r#"{"Body Size": "Slim"}"#, "--model-dir", model_dir.to_str().unwrap()]);

    assert!(out.status.success());
    assert!(out.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let doc: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert!(DOSHA_CLASSES.contains(&doc["prediction"].as_str().unwrap()));
    assert!(doc["confidence"].is_f64());
    assert_eq!(doc["probabilities"].as_object().unwrap().len(), 3);
}

#[test]
fn malformed_json_fails_with_error_document_on_stderr() {
    let ws = trained_workspace();
    let model_dir = ws.path().join("models");
    let out = predict(ws.path(), ws.path(), &["{not json", "--model-dir", model_dir.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let doc: Value = serde_json::from_str(String::from_utf8(out.stderr).unwrap().trim()).unwrap();
    assert_eq!(doc["message"], "Error making prediction");
    assert_eq!(doc["error"], "parsing feature JSON");
    assert!(doc["traceback"].is_string());
}

#[test]
fn missing_artifacts_fail_without_stdout() {
    let empty = TempDir::new().unwrap();
    let out = predict(empty.path(), empty.path(), &[r#"{"Body Size": "Slim"}"#]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let doc: Value = serde_json::from_str(String::from_utf8(out.stderr).unwrap().trim()).unwrap();
    assert!(doc["error"].as_str().unwrap().starts_with("loading artifacts"));
}

#[test]
fn home_config_resolves_models_from_any_working_directory() {
    let ws = trained_workspace();
    std::fs::write(ws.path().join("config.toml"), "[artifacts]\nmodel_dir = \"models\"\n").unwrap();
    let elsewhere = TempDir::new().unwrap();
    let out = predict(ws.path(), elsewhere.path(), &[r#"{"Body Size": "Large"}"#]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let doc: Value = serde_json::from_str(String::from_utf8(out.stdout).unwrap().trim()).unwrap();
    assert!(doc.get("prediction").is_some());
}
