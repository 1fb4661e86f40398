//! Hyper-parameters for the candidate classifier families.
//!
//! Defaults reproduce the reference training run; every field can be
//! overridden from the `[training.*]` config sections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self { n_estimators: 200, max_depth: Some(20), min_samples_split: 5, min_samples_leaf: 2, bootstrap: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self { n_estimators: 150, learning_rate: 0.1, max_depth: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    /// Inverse L2 regularisation strength.
    pub c: f64,
    pub max_iter: usize,
    /// Gradient norm below which the optimiser stops.
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self { c: 1.0, max_iter: 1000, tol: 1e-4 }
    }
}

/// RBF kernel width. `Scale` resolves to `1 / (n_features * Var(X))` at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gamma {
    #[default]
    Scale,
    Value(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmParams {
    pub c: f64,
    pub gamma: Gamma,
    /// Solver stopping tolerance.
    pub tol: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self { c: 10.0, gamma: Gamma::Scale, tol: 1e-3 }
    }
}
