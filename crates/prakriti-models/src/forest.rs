//! Bagged ensemble of `linfa-trees` Gini trees.
//!
//! Every member sees a bootstrap sample of the rows and a random subset of
//! `sqrt(n_features)` columns. Probabilities are the members' vote shares.

use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use prakriti_core::params::ForestParams;
use prakriti_core::types::Algorithm;
use prakriti_core::Result;

use crate::classifier::{check_training_input, fit_error, Classifier, Estimator};
use crate::math::{argmax_rows, normalize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Member {
    /// Columns of the full matrix this tree was fitted on, ascending.
    features: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    members: Vec<Member>,
    n_classes: usize,
    importances: Vec<f64>,
}

impl Estimator for ForestParams {
    type Model = RandomForest;

    fn fit(&self, x: &Array2<f64>, y: &[usize], n_classes: usize, seed: u64) -> Result<RandomForest> {
        check_training_input(x, y, n_classes)?;
        let (n, n_features) = x.dim();
        let subspace = ((n_features as f64).sqrt().floor() as usize).clamp(1, n_features);
        let tree_params = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.max_depth)
            .min_weight_split(self.min_samples_split as f32)
            .min_weight_leaf(self.min_samples_leaf as f32);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut importances = vec![0.0; n_features];
        let mut members = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            let rows: Vec<usize> =
                if self.bootstrap { (0..n).map(|_| rng.gen_range(0..n)).collect() } else { (0..n).collect() };
            let mut features = sample(&mut rng, n_features, subspace).into_vec();
            features.sort_unstable();

            let records = x.select(Axis(0), &rows).select(Axis(1), &features);
            let targets: Array1<usize> = rows.iter().map(|&i| y[i]).collect();
            let tree = tree_params.fit(&Dataset::new(records, targets)).map_err(fit_error(Algorithm::RandomForest))?;

            let mut local = tree.feature_importance();
            normalize(&mut local);
            for (&col, v) in features.iter().zip(local) { importances[col] += v; }
            members.push(Member { features, tree });
        }
        normalize(&mut importances);
        tracing::debug!(trees = members.len(), subspace, "random forest fitted");
        Ok(RandomForest { members, n_classes, importances })
    }
}

impl Classifier for RandomForest {
    fn algorithm(&self) -> Algorithm { Algorithm::RandomForest }

    fn n_classes(&self) -> usize { self.n_classes }

    fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        match self.predict_proba(x) {
            Some(p) => argmax_rows(&p),
            None => vec![0; x.nrows()],
        }
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array2<f64>> {
        let mut votes = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        if self.members.is_empty() { return Some(votes); }
        for member in &self.members {
            let labels: Array1<usize> = member.tree.predict(&x.select(Axis(1), &member.features));
            for (i, &label) in labels.iter().enumerate() {
                if label < self.n_classes { votes[[i, label]] += 1.0; }
            }
        }
        votes /= self.members.len() as f64;
        Some(votes)
    }

    fn feature_importances(&self) -> Option<&[f64]> { Some(&self.importances) }
}
