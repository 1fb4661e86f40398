//! Prediction pipeline over the `latest` training artifacts.

pub mod demo;
pub mod predictor;
pub mod protocol;

pub use predictor::{category_text, Predictor};
pub use protocol::{ErrorResponse, PredictionResponse};
