//! Classifier families trained on encoded prakriti survey features.

pub mod boosting;
pub mod classifier;
pub mod forest;
pub mod logistic;
mod math;
pub mod metrics;
pub mod model;
pub mod svm;
pub mod tree;

pub use classifier::{Classifier, Estimator};
pub use model::{fit_candidate, TrainedModel};
