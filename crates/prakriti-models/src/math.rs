use ndarray::{Array2, ArrayView1};

/// Numerically stable softmax applied to every row in place.
pub(crate) fn softmax_rows(scores: &mut Array2<f64>) {
    for mut row in scores.rows_mut() {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 { row /= sum; }
    }
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0usize;
    for (i, &v) in row.iter().enumerate() { if v > row[best] { best = i; } }
    best
}

pub(crate) fn argmax_rows(scores: &Array2<f64>) -> Vec<usize> { scores.rows().into_iter().map(argmax).collect() }

/// Scale `values` to sum to one; all-zero input is left as is.
pub(crate) fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 { for v in values.iter_mut() { *v /= total; } }
}
