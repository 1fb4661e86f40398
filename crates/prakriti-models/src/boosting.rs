//! Multinomial gradient boosting with one regression tree per class and stage.
//!
//! linfa ships no gradient boosting, so the stages are grown on
//! [`RegressionTree`].
//!
//! Raw scores start from the log class priors. Each stage fits the residuals
//! `onehot - softmax(F)` with a squared-error tree and then replaces every
//! leaf with a single Newton step
//! `(K - 1) / K * sum(r) / sum(|r| * (1 - |r|))`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use prakriti_core::params::BoostingParams;
use prakriti_core::types::Algorithm;
use prakriti_core::Result;

use crate::classifier::{check_training_input, Classifier, Estimator};
use crate::math::{argmax_rows, normalize, softmax_rows};
use crate::tree::{RegressionTree, TreeParams};

const PRIOR_FLOOR: f64 = 1e-12;
const NEWTON_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoosting {
    init: Vec<f64>,
    /// `stages[m][k]` is the tree for class `k` at stage `m`.
    stages: Vec<Vec<RegressionTree>>,
    learning_rate: f64,
    n_classes: usize,
    importances: Vec<f64>,
}

impl GradientBoosting {
    fn raw_scores(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut f = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for (i, row) in x.rows().into_iter().enumerate() {
            for (k, &v) in self.init.iter().enumerate() { f[[i, k]] = v; }
            for stage in &self.stages {
                for (k, tree) in stage.iter().enumerate() { f[[i, k]] += self.learning_rate * tree.predict_row(row); }
            }
        }
        f
    }
}

impl Estimator for BoostingParams {
    type Model = GradientBoosting;

    fn fit(&self, x: &Array2<f64>, y: &[usize], n_classes: usize, _seed: u64) -> Result<GradientBoosting> {
        check_training_input(x, y, n_classes)?;
        let (n, n_features) = x.dim();
        let k_f = n_classes as f64;

        let mut counts = vec![0.0; n_classes];
        for &label in y { counts[label] += 1.0; }
        let init: Vec<f64> = counts.iter().map(|c| (c / n as f64).max(PRIOR_FLOOR).ln()).collect();

        let tree_params = TreeParams { max_depth: Some(self.max_depth), min_samples_split: 2, min_samples_leaf: 1 };
        let mut raw = Array2::from_shape_fn((n, n_classes), |(_, k)| init[k]);
        let mut importances = vec![0.0; n_features];
        let mut stages = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let mut proba = raw.clone();
            softmax_rows(&mut proba);
            let mut stage = Vec::with_capacity(n_classes);
            for k in 0..n_classes {
                let residuals: Vec<f64> =
                    (0..n).map(|i| (if y[i] == k { 1.0 } else { 0.0 }) - proba[[i, k]]).collect();
                let mut tree = RegressionTree::grow(x, &residuals, (0..n).collect(), &tree_params, &mut importances);

                let mut sums: Vec<(f64, f64)> = vec![(0.0, 0.0); tree.node_count()];
                let leaves: Vec<usize> = x.rows().into_iter().map(|row| tree.leaf_index(row)).collect();
                for (i, &leaf) in leaves.iter().enumerate() {
                    let r = residuals[i];
                    sums[leaf].0 += r;
                    sums[leaf].1 += r.abs() * (1.0 - r.abs());
                }
                for (leaf, &(num, den)) in sums.iter().enumerate() {
                    let gamma = if den.abs() < NEWTON_EPS { 0.0 } else { (k_f - 1.0) / k_f * num / den };
                    tree.set_leaf_value(leaf, gamma);
                }
                for (i, row) in x.rows().into_iter().enumerate() {
                    raw[[i, k]] += self.learning_rate * tree.predict_row(row);
                }
                stage.push(tree);
            }
            stages.push(stage);
        }
        normalize(&mut importances);
        tracing::debug!(stages = stages.len(), classes = n_classes, "gradient boosting fitted");
        Ok(GradientBoosting { init, stages, learning_rate: self.learning_rate, n_classes, importances })
    }
}

impl Classifier for GradientBoosting {
    fn algorithm(&self) -> Algorithm { Algorithm::GradientBoosting }

    fn n_classes(&self) -> usize { self.n_classes }

    fn predict(&self, x: &Array2<f64>) -> Vec<usize> { argmax_rows(&self.raw_scores(x)) }

    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array2<f64>> {
        let mut scores = self.raw_scores(x);
        softmax_rows(&mut scores);
        Some(scores)
    }

    fn feature_importances(&self) -> Option<&[f64]> { Some(&self.importances) }
}
