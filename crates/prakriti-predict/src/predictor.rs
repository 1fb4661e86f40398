//! Loads the persisted artifacts and turns a feature map into a [`PredictionResult`].

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use prakriti_core::artifacts::{ArtifactBundle, ArtifactStore};
use prakriti_core::config::InferenceSettings;
use prakriti_core::encoding::{FeatureEncoders, LabelEncoder, UnseenPolicy};
use prakriti_core::types::{ModelMetadata, PredictionResult};
use prakriti_models::{Classifier, TrainedModel};

/// Category string for a JSON value: strings verbatim, numbers as decimal
/// text, booleans as `True`/`False`, null as `None`. Arrays and objects use
/// their compact JSON text.
pub fn category_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

pub struct Predictor {
    model: TrainedModel,
    label_encoder: LabelEncoder,
    feature_encoders: FeatureEncoders,
    metadata: ModelMetadata,
    sentinel: String,
    unseen_policy: UnseenPolicy,
}

impl Predictor {
    pub fn load(model_dir: &Path) -> Result<Self> { Self::load_with(model_dir, &InferenceSettings::default()) }

    pub fn load_with(model_dir: &Path, settings: &InferenceSettings) -> Result<Self> {
        let bundle = ArtifactStore::new(model_dir)
            .load_latest::<TrainedModel>()
            .with_context(|| format!("loading artifacts from {}", model_dir.display()))?;
        let predictor = Self::from_bundle(bundle, settings)?;
        let meta = predictor.metadata();
        tracing::info!(
            model = %meta.model_name,
            accuracy = meta.test_accuracy,
            classes = %meta.dosha_classes.join(", "),
            features = meta.num_features,
            "model loaded"
        );
        Ok(predictor)
    }

    pub fn from_bundle(bundle: ArtifactBundle<TrainedModel>, settings: &InferenceSettings) -> Result<Self> {
        bundle.validate()?;
        if bundle.model.n_classes() != bundle.label_encoder.len() {
            bail!("model predicts {} classes but the label encoder has {}", bundle.model.n_classes(), bundle.label_encoder.len());
        }
        if bundle.model.algorithm() != bundle.metadata.algorithm {
            bail!("metadata names {} but the classifier is {}", bundle.metadata.algorithm, bundle.model.algorithm());
        }
        Ok(Self {
            model: bundle.model,
            label_encoder: bundle.label_encoder,
            feature_encoders: bundle.feature_encoders,
            metadata: bundle.metadata,
            sentinel: settings.sentinel.clone(),
            unseen_policy: settings.unseen_policy,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata { &self.metadata }

    pub fn classes(&self) -> &[String] { self.label_encoder.classes() }

    /// One-row feature matrix in schema order. Unknown keys are ignored,
    /// missing features take the sentinel, unseen values the policy fallback.
    pub fn encode_input(&self, features: &Map<String, Value>) -> Result<Array2<f64>> {
        let schema = &self.metadata.feature_names;
        let mut x = Array2::<f64>::zeros((1, schema.len()));
        for (j, feature) in schema.iter().enumerate() {
            let value = features.get(feature).map_or_else(|| self.sentinel.clone(), category_text);
            x[[0, j]] = self.feature_encoders.encode_or_fallback(feature, &value, self.unseen_policy)? as f64;
        }
        Ok(x)
    }

    pub fn predict(&self, features: &Map<String, Value>) -> Result<PredictionResult> {
        let x = self.encode_input(features)?;
        let code = self.model.predict(&x).first().copied().context("classifier returned no prediction")?;
        let predicted_dosha = self.label_encoder.decode(code)?.to_string();

        let (confidence, all_scores) = match self.model.predict_proba(&x) {
            Some(proba) => {
                let mut scores = BTreeMap::new();
                for (k, &p) in proba.row(0).iter().enumerate() { scores.insert(self.label_encoder.decode(k)?.to_string(), p); }
                (proba.row(0).iter().copied().fold(0.0, f64::max), scores)
            }
            None => (1.0, BTreeMap::from([(predicted_dosha.clone(), 1.0)])),
        };
        tracing::debug!(%predicted_dosha, confidence, "prediction made");
        Ok(PredictionResult { predicted_dosha, confidence, all_scores })
    }

    /// Parse a JSON object of feature answers and predict.
    pub fn predict_json(&self, raw: &str) -> Result<PredictionResult> {
        let value: Value = serde_json::from_str(raw).context("parsing feature JSON")?;
        match value {
            Value::Object(features) => self.predict(&features),
            other => bail!("expected a JSON object of features, got {}", json_kind(&other)),
        }
    }

    /// Keyword heuristic over a free-text description; only `Body Size` is inferred.
    pub fn predict_from_text(&self, description: &str) -> Result<PredictionResult> {
        let mut features = Map::new();
        features.insert("Body Size".to_string(), Value::String(body_size_from_text(description).to_string()));
        self.predict(&features)
    }
}

pub fn body_size_from_text(description: &str) -> &'static str {
    let text = description.to_lowercase();
    if ["slim", "thin", "lean"].iter().any(|w| text.contains(w)) {
        "Slim"
    } else if ["large", "heavy", "big"].iter().any(|w| text.contains(w)) {
        "Large"
    } else {
        "Medium"
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_become_category_text() {
        assert_eq!(category_text(&json!("Slim")), "Slim");
        assert_eq!(category_text(&json!(3)), "3");
        assert_eq!(category_text(&json!(2.5)), "2.5");
        assert_eq!(category_text(&json!(true)), "True");
        assert_eq!(category_text(&Value::Null), "None");
    }

    #[test]
    fn body_size_keywords() {
        assert_eq!(body_size_from_text("I am quite THIN and restless"), "Slim");
        assert_eq!(body_size_from_text("heavy build"), "Large");
        assert_eq!(body_size_from_text("average"), "Medium");
        assert_eq!(body_size_from_text("lean but big-boned"), "Slim", "slim keywords are checked first");
    }
}
