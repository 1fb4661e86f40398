use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_TARGET_COLUMN: &str = "Dosha";
pub const SENTINEL_CATEGORY: &str = "Unknown";

/// Cell texts read as missing, the default NA vocabulary of pandas `read_csv`.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA",
    "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool { MISSING_TOKENS.contains(&cell) }

/// Survey responses as strings, with the target column split off.
///
/// Column order follows the CSV header; that order becomes the feature schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    rows: Vec<Vec<String>>,
    targets: Vec<String>,
    filled_cells: usize,
}

impl Dataset {
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<String>>, targets: Vec<String>) -> Result<Self> {
        if rows.len() != targets.len() {
            return Err(Error::Dataset(format!("{} rows but {} targets", rows.len(), targets.len())));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != feature_names.len()) {
            return Err(Error::Dataset(format!("row {i} has {} values, expected {}", row.len(), feature_names.len())));
        }
        Ok(Self { feature_names, rows, targets, filled_cells: 0 })
    }

    pub fn from_csv_path(path: &Path, target_column: &str, sentinel: &str) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::NotFound(format!("dataset {}: {e}", path.display())))?;
        Self::from_reader(file, target_column, sentinel)
    }

    /// Parse CSV, replacing missing cells (features and target alike) with `sentinel`.
    ///
    /// A cell is missing when [`is_missing`] holds for its exact text.
    pub fn from_reader<R: Read>(reader: R, target_column: &str, sentinel: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let target_idx = headers
            .iter()
            .position(|h| h == target_column)
            .ok_or_else(|| Error::Dataset(format!("target column '{target_column}' not found")))?;
        let feature_names: Vec<String> =
            headers.iter().enumerate().filter(|(i, _)| *i != target_idx).map(|(_, h)| h.to_string()).collect();

        let mut rows = Vec::new();
        let mut targets = Vec::new();
        let mut filled_cells = 0usize;
        for record in rdr.records() {
            let record = record?;
            let mut row = Vec::with_capacity(feature_names.len());
            for (i, cell) in record.iter().enumerate() {
                let value = if is_missing(cell) { filled_cells += 1; sentinel.to_string() } else { cell.to_string() };
                if i == target_idx { targets.push(value); } else { row.push(value); }
            }
            rows.push(row);
        }
        if rows.is_empty() { return Err(Error::Dataset("dataset has no records".to_string())); }
        if filled_cells > 0 {
            tracing::warn!(filled_cells, sentinel, "filled missing values");
        }
        let mut dataset = Self::new(feature_names, rows, targets)?;
        dataset.filled_cells = filled_cells;
        Ok(dataset)
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn feature_names(&self) -> &[String] { &self.feature_names }
    pub fn rows(&self) -> &[Vec<String>] { &self.rows }
    pub fn targets(&self) -> &[String] { &self.targets }
    pub fn filled_cells(&self) -> usize { self.filled_cells }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().filter_map(move |r| r.get(col).map(String::as_str))
    }

    pub fn class_distribution(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for t in &self.targets { *counts.entry(t.clone()).or_insert(0) += 1; }
        counts
    }
}

/// Row indices of one train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

fn indices_by_class(labels: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &l) in labels.iter().enumerate() { by_class.entry(l).or_default().push(i); }
    by_class
}

/// Per-class test counts summing to `ceil(n * test_ratio)`.
///
/// Each class first gets the floor of its proportional share; the leftover
/// rows go to the classes with the largest fractional parts, earlier classes
/// first on ties.
pub fn test_allocation(class_sizes: &[usize], test_ratio: f64) -> Vec<usize> {
    let n: usize = class_sizes.iter().sum();
    if n == 0 { return vec![0; class_sizes.len()]; }
    let n_test = ((n as f64 * test_ratio).ceil() as usize).min(n);
    let shares: Vec<f64> = class_sizes.iter().map(|&c| c as f64 * n_test as f64 / n as f64).collect();
    let mut alloc: Vec<usize> = shares.iter().map(|s| s.floor() as usize).collect();
    let mut order: Vec<usize> = (0..class_sizes.len()).collect();
    order.sort_by(|&a, &b| (shares[b] - shares[b].floor()).total_cmp(&(shares[a] - shares[a].floor())));
    let mut left = n_test.saturating_sub(alloc.iter().sum());
    for k in order {
        if left == 0 { break; }
        if alloc[k] < class_sizes[k] {
            alloc[k] += 1;
            left -= 1;
        }
    }
    alloc
}

/// Stratified split preserving per-class ratios; the test side holds
/// `ceil(n * test_ratio)` rows allocated by [`test_allocation`].
pub fn stratified_split(labels: &[usize], test_ratio: f64, seed: u64) -> Split {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let by_class = indices_by_class(labels);
    let sizes: Vec<usize> = by_class.values().map(Vec::len).collect();
    let alloc = test_allocation(&sizes, test_ratio);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for ((_, mut members), n_test) in by_class.into_iter().zip(alloc) {
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Split { train, test }
}

/// Stratified k-fold partitions over `labels`; folds are disjoint and cover every index.
pub fn stratified_folds(labels: &[usize], k: usize, seed: u64) -> Vec<Split> {
    let k = k.max(2);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut assignment = vec![0usize; labels.len()];
    let mut next = 0usize;
    for (_, mut members) in indices_by_class(labels) {
        members.shuffle(&mut rng);
        for i in members { assignment[i] = next % k; next += 1; }
    }
    (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) = (0..labels.len()).partition(|&i| assignment[i] == fold);
            Split { train, test }
        })
        .collect()
}
