//! Serializable union of the trained families, tagged by `algorithm`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use prakriti_core::config::TrainingSettings;
use prakriti_core::types::Algorithm;
use prakriti_core::Result;

use crate::boosting::GradientBoosting;
use crate::classifier::{Classifier, Estimator};
use crate::forest::RandomForest;
use crate::logistic::LogisticRegression;
use crate::svm::Svm;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum TrainedModel {
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
    LogisticRegression(LogisticRegression),
    Svm(Svm),
}

impl TrainedModel {
    fn inner(&self) -> &dyn Classifier {
        match self {
            TrainedModel::RandomForest(m) => m,
            TrainedModel::GradientBoosting(m) => m,
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::Svm(m) => m,
        }
    }
}

impl Classifier for TrainedModel {
    fn algorithm(&self) -> Algorithm { self.inner().algorithm() }
    fn n_classes(&self) -> usize { self.inner().n_classes() }
    fn predict(&self, x: &Array2<f64>) -> Vec<usize> { self.inner().predict(x) }
    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array2<f64>> { self.inner().predict_proba(x) }
    fn feature_importances(&self) -> Option<&[f64]> { self.inner().feature_importances() }
}

/// Fit one candidate family with the hyper-parameters from `settings`.
pub fn fit_candidate(
    algorithm: Algorithm,
    settings: &TrainingSettings,
    x: &Array2<f64>,
    y: &[usize],
    n_classes: usize,
) -> Result<TrainedModel> {
    let seed = settings.seed;
    Ok(match algorithm {
        Algorithm::RandomForest => TrainedModel::RandomForest(settings.random_forest.fit(x, y, n_classes, seed)?),
        Algorithm::GradientBoosting => TrainedModel::GradientBoosting(settings.gradient_boosting.fit(x, y, n_classes, seed)?),
        Algorithm::LogisticRegression => {
            TrainedModel::LogisticRegression(settings.logistic_regression.fit(x, y, n_classes, seed)?)
        }
        Algorithm::Svm => TrainedModel::Svm(settings.svm.fit(x, y, n_classes, seed)?),
    })
}
