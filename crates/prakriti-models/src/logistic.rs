//! L2-regularised multinomial logistic regression from `linfa-logistic`.
//!
//! `alpha` is `1 / C`. The fitted model orders its probability columns by the
//! labels it saw; they are scattered back to label-encoder order here.

use linfa::prelude::*;
use linfa::Dataset;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use prakriti_core::params::LogisticParams;
use prakriti_core::types::Algorithm;
use prakriti_core::{Error, Result};

use crate::classifier::{check_training_input, fit_error, Classifier, Estimator};
use crate::math::argmax_rows;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    fitted: MultiFittedLogisticRegression<f64, usize>,
    n_classes: usize,
}

impl Estimator for LogisticParams {
    type Model = LogisticRegression;

    fn fit(&self, x: &Array2<f64>, y: &[usize], n_classes: usize, _seed: u64) -> Result<LogisticRegression> {
        check_training_input(x, y, n_classes)?;
        if self.c <= 0.0 {
            return Err(Error::InvalidConfig(format!("logistic_regression.c must be positive, got {}", self.c)));
        }
        let targets: Array1<usize> = y.iter().copied().collect();
        let fitted = MultiLogisticRegression::default()
            .alpha(1.0 / self.c)
            .max_iterations(self.max_iter as u64)
            .gradient_tolerance(self.tol)
            .fit(&Dataset::new(x.clone(), targets))
            .map_err(fit_error(Algorithm::LogisticRegression))?;
        tracing::debug!(classes = fitted.classes().len(), max_iter = self.max_iter, "logistic regression fitted");
        Ok(LogisticRegression { fitted, n_classes })
    }
}

impl Classifier for LogisticRegression {
    fn algorithm(&self) -> Algorithm { Algorithm::LogisticRegression }

    fn n_classes(&self) -> usize { self.n_classes }

    fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        match self.predict_proba(x) {
            Some(p) => argmax_rows(&p),
            None => vec![0; x.nrows()],
        }
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array2<f64>> {
        let seen = self.fitted.predict_probabilities(x);
        let mut proba = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for (col, &label) in self.fitted.classes().iter().enumerate() {
            if label < self.n_classes { proba.column_mut(label).assign(&seen.column(col)); }
        }
        Some(proba)
    }
}
