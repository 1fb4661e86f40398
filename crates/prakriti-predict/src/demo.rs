//! Console demo over the reference sample profile.

use anyhow::Result;
use serde_json::{Map, Value};
use std::io::Write;

use prakriti_core::profile::SAMPLE_PROFILE;
use prakriti_core::types::PredictionResult;

use crate::predictor::Predictor;

const RULE_WIDTH: usize = 80;
const BAR_WIDTH: f64 = 50.0;
const SHOWN_FIELDS: usize = 5;

pub fn sample_features() -> Map<String, Value> {
    SAMPLE_PROFILE.iter().map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string()))).collect()
}

/// Predict the sample profile and write the formatted report to `out`.
pub fn run_demo<W: Write>(predictor: &Predictor, out: &mut W) -> Result<PredictionResult> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}\nPRAKRITI PREDICTION DEMO\n{rule}\n")?;

    writeln!(out, "[SAMPLE] User Profile:\n{}", "-".repeat(RULE_WIDTH))?;
    for (key, value) in SAMPLE_PROFILE.iter().take(SHOWN_FIELDS) { writeln!(out, "   {key}: {value}")?; }
    writeln!(out, "   ... (and {} more features)", SAMPLE_PROFILE.len() - SHOWN_FIELDS)?;

    writeln!(out, "\n[PREDICT] Making prediction...")?;
    let result = predictor.predict(&sample_features())?;

    writeln!(out, "\n[RESULTS] PREDICTION RESULTS:\n{rule}")?;
    writeln!(out, "[DOSHA] Predicted Dosha: {}", result.predicted_dosha)?;
    writeln!(out, "[CONFIDENCE] Confidence: {:.2}%", result.confidence * 100.0)?;
    writeln!(out, "\n[SCORES] All Scores:")?;
    for (dosha, score) in result.ranked_scores() {
        let bar = "#".repeat((score * BAR_WIDTH) as usize);
        writeln!(out, "   {dosha:<15} {:.2}% {bar}", score * 100.0)?;
    }
    writeln!(out, "\n{rule}")?;
    Ok(result)
}
