//! One-vs-rest Gaussian-kernel support vector classifier on `linfa-svm`.
//!
//! Each class gets a binary machine separating it from the rest and the
//! predicted class is the machine with the highest Platt score. Those scores
//! are only compared with one another, so [`Classifier::predict_proba`]
//! returns `None`.

use linfa::dataset::Pr;
use linfa::prelude::*;
use linfa::Dataset;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use prakriti_core::params::{Gamma, SvmParams};
use prakriti_core::types::Algorithm;
use prakriti_core::{Error, Result};

use crate::classifier::{check_training_input, fit_error, Classifier, Estimator};
use crate::math::argmax_rows;

type Machine = linfa_svm::Svm<f64, Pr>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Svm {
    gamma: f64,
    /// `None` for a class with no training rows.
    machines: Vec<Option<Machine>>,
    n_classes: usize,
}

impl Svm {
    pub fn gamma(&self) -> f64 { self.gamma }

    /// One column of scores per class; classes without a machine score `-inf`.
    pub fn decision_function(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = Array2::from_elem((x.nrows(), self.n_classes), f64::NEG_INFINITY);
        for (k, machine) in self.machines.iter().enumerate() {
            let Some(machine) = machine else { continue };
            let scores: Array1<Pr> = machine.predict(x);
            for (i, p) in scores.iter().enumerate() { out[[i, k]] = f64::from(**p); }
        }
        out
    }
}

/// `Scale` is `1 / (n_features * Var(X))`, the variance taken over every cell.
fn resolve_gamma(gamma: Gamma, x: &Array2<f64>) -> Result<f64> {
    match gamma {
        Gamma::Value(g) if g > 0.0 => Ok(g),
        Gamma::Value(g) => Err(Error::InvalidConfig(format!("svm.gamma must be positive, got {g}"))),
        Gamma::Scale => {
            let var = x.var(0.0);
            Ok(if var > 0.0 { 1.0 / (x.ncols() as f64 * var) } else { 1.0 })
        }
    }
}

impl Estimator for SvmParams {
    type Model = Svm;

    fn fit(&self, x: &Array2<f64>, y: &[usize], n_classes: usize, _seed: u64) -> Result<Svm> {
        check_training_input(x, y, n_classes)?;
        if self.c <= 0.0 {
            return Err(Error::InvalidConfig(format!("svm.c must be positive, got {}", self.c)));
        }
        let gamma = resolve_gamma(self.gamma, x)?;
        // linfa's Gaussian kernel is exp(-|a - b|^2 / eps)
        let params = Machine::params().pos_neg_weights(self.c, self.c).gaussian_kernel(1.0 / gamma).eps(self.tol);

        let mut machines = Vec::with_capacity(n_classes);
        for k in 0..n_classes {
            let targets: Array1<bool> = y.iter().map(|&l| l == k).collect();
            if !targets.iter().any(|&t| t) {
                tracing::warn!(class = k, "no training rows for class; it will never be predicted");
                machines.push(None);
                continue;
            }
            let machine = params.fit(&Dataset::new(x.clone(), targets)).map_err(fit_error(Algorithm::Svm))?;
            tracing::debug!(class = k, support = machine.nsupport(), "svm machine trained");
            machines.push(Some(machine));
        }
        Ok(Svm { gamma, machines, n_classes })
    }
}

impl Classifier for Svm {
    fn algorithm(&self) -> Algorithm { Algorithm::Svm }

    fn n_classes(&self) -> usize { self.n_classes }

    fn predict(&self, x: &Array2<f64>) -> Vec<usize> { argmax_rows(&self.decision_function(x)) }

    fn predict_proba(&self, _x: &Array2<f64>) -> Option<Array2<f64>> { None }
}
