//! Squared-error regression trees stored as a flat node arena.
//!
//! Boosting stages fit these to residuals and then overwrite the leaf values
//! with their own Newton steps, which is why leaves are addressable by index.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { value: f64, samples: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    sum: f64,
    sum_sq: f64,
    n: f64,
}

impl Moments {
    fn push(&mut self, t: f64) {
        self.sum += t;
        self.sum_sq += t * t;
        self.n += 1.0;
    }

    fn pop(&mut self, t: f64) {
        self.sum -= t;
        self.sum_sq -= t * t;
        self.n -= 1.0;
    }

    fn variance(&self) -> f64 {
        if self.n <= 0.0 { return 0.0; }
        let mean = self.sum / self.n;
        (self.sum_sq / self.n - mean * mean).max(0.0)
    }

    fn mean(&self) -> f64 { if self.n > 0.0 { self.sum / self.n } else { 0.0 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct Grower<'a> {
    x: &'a Array2<f64>,
    targets: &'a [f64],
    params: &'a TreeParams,
    importances: &'a mut [f64],
    total: f64,
    nodes: Vec<Node>,
}

impl Grower<'_> {
    fn build(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let mut stats = Moments::default();
        for &s in &samples { stats.push(self.targets[s]); }
        let impurity = stats.variance();
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let can_split = self.params.max_depth.map_or(true, |d| depth < d)
            && n >= self.params.min_samples_split.max(2)
            && n >= 2 * min_leaf
            && impurity > MIN_GAIN;

        if can_split {
            if let Some(split) = self.best_split(&samples, stats, impurity) {
                self.importances[split.feature] += (n as f64 / self.total) * split.gain;
                let node = self.nodes.len();
                self.nodes.push(Node::Leaf { value: 0.0, samples: n });
                let x = self.x;
                let (left, right): (Vec<usize>, Vec<usize>) =
                    samples.into_iter().partition(|&s| x[[s, split.feature]] <= split.threshold);
                let left = self.build(left, depth + 1);
                let right = self.build(right, depth + 1);
                self.nodes[node] = Node::Split { feature: split.feature, threshold: split.threshold, left, right };
                return node;
            }
        }
        self.nodes.push(Node::Leaf { value: stats.mean(), samples: n });
        self.nodes.len() - 1
    }

    fn best_split(&self, samples: &[usize], parent: Moments, impurity: f64) -> Option<SplitCandidate> {
        let (x, targets) = (self.x, self.targets);
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut order = samples.to_vec();
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..x.ncols() {
            order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
            let mut left = Moments::default();
            let mut right = parent;
            for i in 0..n - 1 {
                let s = order[i];
                left.push(targets[s]);
                right.pop(targets[s]);
                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf { continue; }
                let here = x[[s, feature]];
                let next = x[[order[i + 1], feature]];
                if next <= here { continue; }
                let weighted = (n_left as f64 * left.variance() + n_right as f64 * right.variance()) / n as f64;
                let gain = impurity - weighted;
                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate { feature, threshold: here + (next - here) / 2.0, gain });
                }
            }
        }
        best
    }
}

impl RegressionTree {
    /// Grow a tree over `samples` (row indices into `x`) regressing `targets`.
    ///
    /// Weighted variance decrease per feature is added to `importances`.
    pub(crate) fn grow(
        x: &Array2<f64>,
        targets: &[f64],
        samples: Vec<usize>,
        params: &TreeParams,
        importances: &mut [f64],
    ) -> Self {
        let total = samples.len().max(1) as f64;
        let mut grower = Grower { x, targets, params, importances, total, nodes: Vec::new() };
        grower.build(samples, 0);
        Self { nodes: grower.nodes }
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }

    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Arena index of the leaf `row` falls into.
    pub fn leaf_index(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut id = 0usize;
        while let Some(Node::Split { feature, threshold, left, right }) = self.nodes.get(id) {
            id = if row[*feature] <= *threshold { *left } else { *right };
        }
        id
    }

    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        match self.nodes.get(self.leaf_index(row)) {
            Some(Node::Leaf { value, .. }) => *value,
            _ => 0.0,
        }
    }

    pub(crate) fn set_leaf_value(&mut self, id: usize, new_value: f64) {
        if let Some(Node::Leaf { value, .. }) = self.nodes.get_mut(id) { *value = new_value; }
    }
}
