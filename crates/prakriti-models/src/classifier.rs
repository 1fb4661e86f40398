//! Classifier contract shared by all model families.
//!
//! Features are encoded category codes as `f64`; labels are class indices in
//! `0..n_classes` as produced by the label encoder.

use ndarray::Array2;
use prakriti_core::types::Algorithm;
use prakriti_core::{Error, Result};

pub trait Classifier {
    fn algorithm(&self) -> Algorithm;

    fn n_classes(&self) -> usize;

    /// Predicted class index for every row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Vec<usize>;

    /// Row-wise class probabilities, `None` for models that do not expose them.
    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array2<f64>>;

    /// Normalised impurity-based importances, when the family defines them.
    fn feature_importances(&self) -> Option<&[f64]> { None }
}

/// Hyper-parameter sets that can fit a model.
pub trait Estimator {
    type Model: Classifier;

    fn fit(&self, x: &Array2<f64>, y: &[usize], n_classes: usize, seed: u64) -> Result<Self::Model>;
}

/// Wrap a linfa fitting error for `algorithm`.
pub(crate) fn fit_error<E: std::fmt::Display>(algorithm: Algorithm) -> impl Fn(E) -> Error {
    move |e| Error::Fit { algorithm, message: e.to_string() }
}

pub(crate) fn check_training_input(x: &Array2<f64>, y: &[usize], n_classes: usize) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(Error::Operation(format!("{} feature rows but {} labels", x.nrows(), y.len())));
    }
    if x.nrows() < 2 || x.ncols() == 0 {
        return Err(Error::Operation(format!("cannot fit on a {}x{} matrix", x.nrows(), x.ncols())));
    }
    if n_classes == 0 {
        return Err(Error::Operation("no classes to fit".to_string()));
    }
    if let Some(&bad) = y.iter().find(|&&l| l >= n_classes) {
        return Err(Error::Operation(format!("label {bad} out of range for {n_classes} classes")));
    }
    Ok(())
}
