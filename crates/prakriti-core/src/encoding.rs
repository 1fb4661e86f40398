//! Categorical encoders shared by training and inference.
//!
//! Every encoder assigns codes in sorted order of the distinct strings it was
//! fitted on, so code 0 is the lexicographically smallest training value.
//! Inference must apply exactly these encoders in the persisted feature order.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::types::FeatureSchema;

/// Fallback for a category that was not seen at fit time.
///
/// `FirstCode` substitutes code 0. That is only the first category in sort
/// order, not a neutral value, but it is what existing artifacts were
/// evaluated with and stays the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnseenPolicy {
    #[default]
    FirstCode,
    MostFrequent,
}

/// Bijection between the category strings of one column and `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryEncoder {
    classes: Vec<String>,
    #[serde(default)]
    counts: Vec<usize>,
}

impl CategoryEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut freq: BTreeMap<String, usize> = BTreeMap::new();
        for v in values { *freq.entry(v.as_ref().to_string()).or_insert(0) += 1; }
        let (classes, counts) = freq.into_iter().unzip();
        Self { classes, counts }
    }

    pub fn classes(&self) -> &[String] { &self.classes }
    pub fn len(&self) -> usize { self.classes.len() }
    pub fn is_empty(&self) -> bool { self.classes.is_empty() }

    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> { self.classes.get(code).map(String::as_str) }

    /// Training-time frequency of `code`, zero when counts were not recorded.
    pub fn count(&self, code: usize) -> usize { self.counts.get(code).copied().unwrap_or(0) }

    pub fn fallback_code(&self, policy: UnseenPolicy) -> usize {
        match policy {
            UnseenPolicy::FirstCode => 0,
            UnseenPolicy::MostFrequent => {
                let mut best = 0usize;
                for (code, &c) in self.counts.iter().enumerate() { if c > self.count(best) { best = code; } }
                best
            }
        }
    }
}

/// Encoder for the target column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LabelEncoder(CategoryEncoder);

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(CategoryEncoder::fit(values))
    }

    pub fn classes(&self) -> &[String] { self.0.classes() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn encode(&self, label: &str) -> Result<usize> {
        self.0.encode(label).ok_or_else(|| Error::UnseenCategory { feature: "<target>".to_string(), value: label.to_string() })
    }

    pub fn encode_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }

    pub fn decode(&self, code: usize) -> Result<&str> { self.0.decode(code).ok_or(Error::UnknownClass(code)) }
}

/// One independently fitted encoder per feature column, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FeatureEncoders(BTreeMap<String, CategoryEncoder>);

impl FeatureEncoders {
    pub fn fit(dataset: &Dataset) -> Self {
        let mut encoders = BTreeMap::new();
        for (col, name) in dataset.feature_names().iter().enumerate() {
            encoders.insert(name.clone(), CategoryEncoder::fit(dataset.column(col)));
        }
        Self(encoders)
    }

    pub fn get(&self, feature: &str) -> Option<&CategoryEncoder> { self.0.get(feature) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn contains(&self, feature: &str) -> bool { self.0.contains_key(feature) }

    fn encoder(&self, feature: &str) -> Result<&CategoryEncoder> {
        self.0.get(feature).ok_or_else(|| Error::ArtifactMismatch(format!("no encoder for feature '{feature}'")))
    }

    /// Strict encoding used on training data: every value must be known.
    pub fn encode_value(&self, feature: &str, value: &str) -> Result<usize> {
        self.encoder(feature)?
            .encode(value)
            .ok_or_else(|| Error::UnseenCategory { feature: feature.to_string(), value: value.to_string() })
    }

    /// Lenient encoding used at inference: unseen values take the policy's fallback code.
    pub fn encode_or_fallback(&self, feature: &str, value: &str, policy: UnseenPolicy) -> Result<usize> {
        let encoder = self.encoder(feature)?;
        Ok(match encoder.encode(value) {
            Some(code) => code,
            None => {
                let code = encoder.fallback_code(policy);
                tracing::debug!(feature, value, code, "unseen category, using fallback code");
                code
            }
        })
    }

    /// Encode string rows laid out in `schema` order into a feature matrix.
    pub fn transform(&self, schema: &FeatureSchema, rows: &[Vec<String>]) -> Result<Array2<f64>> {
        let mut x = Array2::<f64>::zeros((rows.len(), schema.len()));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(Error::Dataset(format!("row {i} has {} values, expected {}", row.len(), schema.len())));
            }
            for (j, (feature, value)) in schema.iter().zip(row.iter()).enumerate() {
                x[[i, j]] = self.encode_value(feature, value)? as f64;
            }
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_frequent_prefers_first_on_ties() {
        let enc = CategoryEncoder::fit(["b", "a", "b", "a", "c"]);
        assert_eq!(enc.fallback_code(UnseenPolicy::MostFrequent), 0);
        let enc = CategoryEncoder::fit(["b", "a", "b", "c"]);
        assert_eq!(enc.fallback_code(UnseenPolicy::MostFrequent), 1);
    }

    #[test]
    fn missing_counts_fall_back_to_zero() {
        let enc: CategoryEncoder = serde_json::from_str(r#"{"classes":["x","y"]}"#).unwrap();
        assert_eq!(enc.count(1), 0);
        assert_eq!(enc.fallback_code(UnseenPolicy::MostFrequent), 0);
    }
}
