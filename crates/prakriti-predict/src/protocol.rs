//! JSON documents exchanged with the calling backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use prakriti_core::types::PredictionResult;

pub const ERROR_MESSAGE: &str = "Error making prediction";

/// Success document, the only thing written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub confidence: f64,
    pub probabilities: BTreeMap<String, f64>,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(r: PredictionResult) -> Self {
        Self { prediction: r.predicted_dosha, confidence: r.confidence, probabilities: r.all_scores }
    }
}

/// Failure document, written to stderr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub traceback: String,
}

impl ErrorResponse {
    /// `error` is the outermost message; `traceback` carries the full cause chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self { error: err.to_string(), message: ERROR_MESSAGE.to_string(), traceback: format!("{err:?}") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn traceback_includes_causes() {
        let err = std::fs::read("/definitely/not/here").context("loading artifacts").unwrap_err();
        let resp = ErrorResponse::from_error(&err);
        assert_eq!(resp.error, "loading artifacts");
        assert_eq!(resp.message, ERROR_MESSAGE);
        assert!(resp.traceback.contains("Caused by"));
    }
}
