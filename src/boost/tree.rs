use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::params::BoostValidParams;

/// A node in a regression tree arena. Children are indices into the same
/// `Vec<Node>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum Node {
    Split {
        feature: usize,
        /// Rows with `value < threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
        /// Loss reduction achieved by this split.
        gain: f64,
    },
    Leaf {
        /// Leaf output, already scaled by the learning rate.
        weight: f64,
    },
}

/// One regression tree fitted to the gradients of a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct CandidateSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    x: ArrayView2<'a, f64>,
    grad: &'a [f64],
    hess: &'a [f64],
    features: &'a [usize],
    params: &'a BoostValidParams,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grows a tree on `x` by exact greedy search over the columns listed in
    /// `features`.
    pub(crate) fn grow<'a>(
        x: ArrayView2<'a, f64>,
        grad: &'a [f64],
        hess: &'a [f64],
        features: &'a [usize],
        params: &'a BoostValidParams,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            grad,
            hess,
            features,
            params,
            nodes: Vec::new(),
        };
        builder.build((0..x.nrows()).collect(), 0);
        RegressionTree {
            nodes: builder.nodes,
        }
    }

    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { weight } => return *weight,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Adds each split's gain to `totals` and its count to `counts`, both
    /// indexed by feature.
    pub(crate) fn accumulate_gain(&self, totals: &mut [f64], counts: &mut [usize]) {
        for node in &self.nodes {
            if let Node::Split { feature, gain, .. } = node {
                totals[*feature] += gain;
                counts[*feature] += 1;
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    #[cfg(test)]
    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl TreeBuilder<'_> {
    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let (g, h) = self.sums(&rows);
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { weight: 0.0 });

        if depth < self.params.max_depth() {
            if let Some(split) = self.best_split(&rows, g, h) {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&r| self.x[[r, split.feature]] < split.threshold);
                if !left_rows.is_empty() && !right_rows.is_empty() {
                    let left = self.build(left_rows, depth + 1);
                    let right = self.build(right_rows, depth + 1);
                    self.nodes[idx] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left,
                        right,
                        gain: split.gain,
                    };
                    return idx;
                }
            }
        }

        let weight = -g / (h + self.params.lambda()) * self.params.learning_rate();
        self.nodes[idx] = Node::Leaf { weight };
        idx
    }

    fn sums(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter()
            .fold((0.0, 0.0), |(g, h), &r| (g + self.grad[r], h + self.hess[r]))
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.params.lambda())
    }

    fn best_split(&self, rows: &[usize], g: f64, h: f64) -> Option<CandidateSplit> {
        let parent = self.score(g, h);
        let min_child = self.params.min_child_weight();
        let mut best: Option<CandidateSplit> = None;

        let mut sorted: Vec<(f64, f64, f64)> = Vec::with_capacity(rows.len());
        for &feature in self.features {
            sorted.clear();
            sorted.extend(
                rows.iter()
                    .map(|&r| (self.x[[r, feature]], self.grad[r], self.hess[r])),
            );
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (mut gl, mut hl) = (0.0, 0.0);
            for i in 0..sorted.len().saturating_sub(1) {
                gl += sorted[i].1;
                hl += sorted[i].2;
                if sorted[i].0 == sorted[i + 1].0 {
                    continue;
                }
                let (gr, hr) = (g - gl, h - hl);
                if hl < min_child || hr < min_child {
                    continue;
                }
                let gain = 0.5 * (self.score(gl, hl) + self.score(gr, hr) - parent);
                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    best = Some(CandidateSplit {
                        feature,
                        threshold: (sorted[i].0 + sorted[i + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::BoostParams;
    use linfa::ParamGuard;
    use ndarray::array;

    fn params(max_depth: usize) -> BoostValidParams {
        BoostParams::new()
            .max_depth(max_depth)
            .learning_rate(1.0)
            .lambda(0.0)
            .min_child_weight(0.0)
            .check()
            .unwrap()
    }

    #[test]
    fn splits_on_informative_feature() {
        let x = array![[0.0, 5.0], [1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let grad = [1.0, 1.0, -1.0, -1.0];
        let hess = [1.0; 4];
        let tree = RegressionTree::grow(x.view(), &grad, &hess, &[0, 1], &params(3));

        match &tree.nodes()[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 1.5);
            }
            other => panic!("expected split at root, got {other:?}"),
        }
        assert_eq!(tree.predict_row(x.row(0)), -1.0);
        assert_eq!(tree.predict_row(x.row(3)), 1.0);
    }

    #[test]
    fn constant_feature_yields_single_leaf() {
        let x = array![[5.0], [5.0], [5.0]];
        let grad = [1.0, -1.0, 2.0];
        let hess = [1.0; 3];
        let tree = RegressionTree::grow(x.view(), &grad, &hess, &[0], &params(3));
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict_row(x.row(0)), -2.0 / 3.0);
    }

    #[test]
    fn depth_limit_is_respected() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0]];
        let grad = [3.0, -3.0, 2.0, -2.0, 1.0, -1.0, 4.0, -4.0];
        let hess = [1.0; 8];
        let tree = RegressionTree::grow(x.view(), &grad, &hess, &[0], &params(1));
        assert!(tree.n_leaves() <= 2);
    }

    #[test]
    fn gain_is_accumulated_per_feature() {
        let x = array![[0.0, 5.0], [1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let grad = [1.0, 1.0, -1.0, -1.0];
        let hess = [1.0; 4];
        let tree = RegressionTree::grow(x.view(), &grad, &hess, &[0, 1], &params(1));
        let mut totals = [0.0; 2];
        let mut counts = [0; 2];
        tree.accumulate_gain(&mut totals, &mut counts);
        assert_eq!(counts, [1, 0]);
        assert!(totals[0] > 0.0);
        assert_eq!(totals[1], 0.0);
    }
}
