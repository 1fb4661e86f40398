use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use prakriti_core::config::TrainingSettings;
use prakriti_core::params::{BoostingParams, ForestParams, Gamma, LogisticParams, SvmParams};
use prakriti_core::types::Algorithm;
use prakriti_models::metrics::accuracy;
use prakriti_models::{fit_candidate, Classifier, Estimator, TrainedModel};

/// Three classes over six categorical columns; the first three columns carry
/// the class code with 10% noise, the rest are uniform noise.
fn blobs(n: usize, seed: u64) -> (Array2<f64>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut x = Array2::<f64>::zeros((n, 6));
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 3;
        y.push(class);
        for j in 0..6 {
            x[[i, j]] = if j < 3 && rng.gen_bool(0.9) { class as f64 } else { rng.gen_range(0..3) as f64 };
        }
    }
    (x, y)
}

fn small_settings() -> TrainingSettings {
    TrainingSettings {
        random_forest: ForestParams { n_estimators: 25, ..ForestParams::default() },
        gradient_boosting: BoostingParams { n_estimators: 30, ..BoostingParams::default() },
        ..TrainingSettings::default()
    }
}

fn assert_rows_sum_to_one(p: &Array2<f64>) {
    for row in p.rows() {
        assert!((row.sum() - 1.0).abs() < 1e-9, "row sums to {}", row.sum());
        assert!(row.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}

#[test]
fn every_family_learns_separable_data() {
    let (x, y) = blobs(240, 1);
    let (x_test, y_test) = blobs(90, 2);
    let settings = small_settings();
    for algorithm in Algorithm::ALL {
        let model = fit_candidate(algorithm, &settings, &x, &y, 3).unwrap();
        assert_eq!(model.algorithm(), algorithm);
        assert_eq!(model.n_classes(), 3);
        let acc = accuracy(&y_test, &model.predict(&x_test));
        assert!(acc > 0.85, "{algorithm} accuracy {acc}");
    }
}

#[test]
fn probabilistic_families_return_normalised_rows() {
    let (x, y) = blobs(120, 3);
    let settings = small_settings();
    for algorithm in [Algorithm::RandomForest, Algorithm::GradientBoosting, Algorithm::LogisticRegression] {
        let model = fit_candidate(algorithm, &settings, &x, &y, 3).unwrap();
        let p = model.predict_proba(&x).expect("probabilities");
        assert_eq!(p.dim(), (120, 3));
        assert_rows_sum_to_one(&p);
    }
}

#[test]
fn svm_exposes_no_probabilities() {
    let (x, y) = blobs(90, 4);
    let model = SvmParams::default().fit(&x, &y, 3, 0).unwrap();
    assert!(model.predict_proba(&x).is_none());
    assert_eq!(model.decision_function(&x).dim(), (90, 3));
    assert!(model.gamma() > 0.0);
}

#[test]
fn tree_ensembles_report_importances() {
    let (x, y) = blobs(150, 5);
    let forest = ForestParams { n_estimators: 20, ..ForestParams::default() }.fit(&x, &y, 3, 0).unwrap();
    let imp = forest.feature_importances().unwrap();
    assert_eq!(imp.len(), 6);
    assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    let signal: f64 = imp[..3].iter().sum();
    assert!(signal > 0.5, "informative columns dominate, got {signal}");

    let logistic = LogisticParams::default().fit(&x, &y, 3, 0).unwrap();
    assert!(logistic.feature_importances().is_none());
}

#[test]
fn same_seed_gives_the_same_forest() {
    let (x, y) = blobs(90, 6);
    let params = ForestParams { n_estimators: 10, ..ForestParams::default() };
    let a = serde_json::to_string(&params.fit(&x, &y, 3, 9).unwrap()).unwrap();
    let b = serde_json::to_string(&params.fit(&x, &y, 3, 9).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn serialized_models_predict_the_same() {
    let (x, y) = blobs(120, 7);
    let settings = small_settings();
    for algorithm in Algorithm::ALL {
        let model = fit_candidate(algorithm, &settings, &x, &y, 3).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["algorithm"], serde_json::to_value(algorithm).unwrap());
        let back: TrainedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.predict(&x), model.predict(&x));
    }
}

#[test]
fn explicit_gamma_must_be_positive() {
    let (x, y) = blobs(30, 9);
    let params = SvmParams { gamma: Gamma::Value(-1.0), ..SvmParams::default() };
    assert!(params.fit(&x, &y, 3, 0).is_err());
    let fixed = SvmParams { gamma: Gamma::Value(0.5), ..SvmParams::default() }.fit(&x, &y, 3, 0).unwrap();
    assert_eq!(fixed.gamma(), 0.5);
}

#[test]
fn absent_class_is_never_predicted() {
    let (x, y) = blobs(60, 10);
    let y: Vec<usize> = y.into_iter().map(|l| l.min(1)).collect();
    let svm = SvmParams::default().fit(&x, &y, 3, 0).unwrap();
    assert!(svm.predict(&x).iter().all(|&l| l < 2));
    let forest = ForestParams { n_estimators: 10, ..ForestParams::default() }.fit(&x, &y, 3, 0).unwrap();
    let p = forest.predict_proba(&x).unwrap();
    assert!(p.column(2).iter().all(|&v| v == 0.0));
    let logistic = LogisticParams::default().fit(&x, &y, 3, 0).unwrap();
    let p = logistic.predict_proba(&x).unwrap();
    assert!(p.column(2).iter().all(|&v| v == 0.0));
    assert_rows_sum_to_one(&p);
}

#[test]
fn mismatched_inputs_are_rejected() {
    let (x, y) = blobs(30, 8);
    assert!(ForestParams::default().fit(&x, &y[..10], 3, 0).is_err());
    assert!(LogisticParams::default().fit(&x, &y, 2, 0).is_err(), "label 2 is out of range");
}
