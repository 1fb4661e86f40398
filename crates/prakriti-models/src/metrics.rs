//! Classification metrics over class indices.
//!
//! Undefined ratios (no predictions or no support for a class) count as 0.

use serde::{Deserialize, Serialize};

pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() { return 0.0; }
    let hits = truth.iter().zip(predicted).filter(|(a, b)| a == b).count();
    hits as f64 / truth.len() as f64
}

/// `matrix[actual][predicted]` counts.
pub fn confusion_matrix(truth: &[usize], predicted: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    let mut m = vec![vec![0usize; n_classes]; n_classes];
    for (&t, &p) in truth.iter().zip(predicted) {
        if t < n_classes && p < n_classes { m[t][p] += 1; }
    }
    m
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WeightedScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

fn ratio(num: usize, den: usize) -> f64 { if den == 0 { 0.0 } else { num as f64 / den as f64 } }

/// Per-class precision, recall, F1 and support in class index order.
pub fn classification_report(truth: &[usize], predicted: &[usize], labels: &[String]) -> Vec<ClassReport> {
    let m = confusion_matrix(truth, predicted, labels.len());
    labels
        .iter()
        .enumerate()
        .map(|(k, label)| {
            let tp = m[k][k];
            let support: usize = m[k].iter().sum();
            let predicted_k: usize = m.iter().map(|row| row[k]).sum();
            let precision = ratio(tp, predicted_k);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 { 2.0 * precision * recall / (precision + recall) } else { 0.0 };
            ClassReport { label: label.clone(), precision, recall, f1, support }
        })
        .collect()
}

/// Support-weighted averages of the per-class scores.
pub fn weighted_scores(report: &[ClassReport]) -> WeightedScores {
    let total: usize = report.iter().map(|r| r.support).sum();
    if total == 0 { return WeightedScores::default(); }
    let w = |f: fn(&ClassReport) -> f64| report.iter().map(|r| f(r) * r.support as f64).sum::<f64>() / total as f64;
    WeightedScores { precision: w(|r| r.precision), recall: w(|r| r.recall), f1: w(|r| r.f1) }
}
