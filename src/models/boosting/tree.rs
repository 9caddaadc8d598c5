//! Second-order regression trees.
//!
//! Trees are grown greedily on gradient/hessian statistics: a split is kept
//! when its regularised gain is positive and both children carry at least
//! `min_child_weight` hessian mass. Leaf weights are `-G / (H + lambda)`.

/// Growth parameters shared by every tree of an ensemble.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_child_weight: f64,
    pub reg_lambda: f64,
    pub gamma: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        gain: f64,
    },
    Leaf {
        weight: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegressionTree {
    nodes: Vec<TreeNode>,
}

/// Read-only view of the training rows for one tree.
pub(crate) struct TrainingView<'a> {
    /// Row-major feature data.
    pub data: &'a [f64],
    pub n_features: usize,
    pub grad: &'a [f64],
    pub hess: &'a [f64],
}

impl TrainingView<'_> {
    fn value(&self, row: usize, feature: usize) -> f64 {
        self.data[row * self.n_features + feature]
    }
}

impl RegressionTree {
    pub(crate) fn fit(view: &TrainingView<'_>, rows: &[usize], params: &TreeParams) -> Self {
        let mut nodes = Vec::new();
        grow(view, rows, params, 0, &mut nodes);
        Self { nodes }
    }

    pub(crate) fn predict(&self, sample: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { weight } => return *weight,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Scale every leaf weight (shrinkage).
    pub(crate) fn scale(&mut self, factor: f64) {
        for node in &mut self.nodes {
            if let TreeNode::Leaf { weight } = node {
                *weight *= factor;
            }
        }
    }

    /// Add each split's gain to its feature's total.
    pub(crate) fn accumulate_gain(&self, totals: &mut [f64]) {
        for node in &self.nodes {
            if let TreeNode::Split { feature, gain, .. } = node {
                totals[*feature] += gain;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }
}

fn leaf_weight(g: f64, h: f64, lambda: f64) -> f64 {
    -g / (h + lambda)
}

fn score(g: f64, h: f64, lambda: f64) -> f64 {
    g * g / (h + lambda)
}

fn grow(
    view: &TrainingView<'_>,
    rows: &[usize],
    params: &TreeParams,
    depth: usize,
    nodes: &mut Vec<TreeNode>,
) -> usize {
    let g: f64 = rows.iter().map(|&r| view.grad[r]).sum();
    let h: f64 = rows.iter().map(|&r| view.hess[r]).sum();
    let weight = leaf_weight(g, h, params.reg_lambda);

    let split = if depth < params.max_depth && rows.len() >= 2 {
        best_split(view, rows, g, h, params)
    } else {
        None
    };

    let Some(split) = split else {
        nodes.push(TreeNode::Leaf { weight });
        return nodes.len() - 1;
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&r| view.value(r, split.feature) <= split.threshold);

    let node_idx = nodes.len();
    nodes.push(TreeNode::Leaf { weight }); // placeholder

    let left = grow(view, &left_rows, params, depth + 1, nodes);
    let right = grow(view, &right_rows, params, depth + 1, nodes);

    nodes[node_idx] = TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left,
        right,
        gain: split.gain,
    };
    node_idx
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Exact greedy search over all features and distinct thresholds.
fn best_split(
    view: &TrainingView<'_>,
    rows: &[usize],
    g_total: f64,
    h_total: f64,
    params: &TreeParams,
) -> Option<Split> {
    let lambda = params.reg_lambda;
    let parent = score(g_total, h_total, lambda);
    let mut best: Option<Split> = None;

    let mut sorted = rows.to_vec();
    for feature in 0..view.n_features {
        sorted.sort_by(|&a, &b| {
            view.value(a, feature)
                .partial_cmp(&view.value(b, feature))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut g_left = 0.0;
        let mut h_left = 0.0;
        for i in 0..sorted.len() - 1 {
            let r = sorted[i];
            g_left += view.grad[r];
            h_left += view.hess[r];

            let here = view.value(r, feature);
            let next = view.value(sorted[i + 1], feature);
            if (next - here).abs() < 1e-15 {
                continue;
            }

            let g_right = g_total - g_left;
            let h_right = h_total - h_left;
            if h_left < params.min_child_weight || h_right < params.min_child_weight {
                continue;
            }

            let gain = 0.5
                * (score(g_left, h_left, lambda) + score(g_right, h_right, lambda) - parent)
                - params.gamma;
            if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(Split {
                    feature,
                    threshold: 0.5 * (here + next),
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_child_weight: 1.0,
            reg_lambda: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn stump_splits_step_function() {
        // Gradients of a zero prediction against targets [1, 1, 5, 5]
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let grad = vec![-1.0, -1.0, -5.0, -5.0];
        let hess = vec![1.0; 4];
        let view = TrainingView {
            data: &data,
            n_features: 1,
            grad: &grad,
            hess: &hess,
        };

        let tree = RegressionTree::fit(&view, &[0, 1, 2, 3], &params(1));
        assert_eq!(tree.n_leaves(), 2);
        assert_relative_eq!(tree.predict(&[1.5]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(tree.predict(&[3.5]), 5.0, epsilon = 1e-12);

        let mut gains = vec![0.0];
        tree.accumulate_gain(&mut gains);
        assert!(gains[0] > 0.0);
    }

    #[test]
    fn depth_zero_is_single_leaf() {
        let data = vec![1.0, 2.0];
        let grad = vec![-2.0, -4.0];
        let hess = vec![1.0, 1.0];
        let view = TrainingView {
            data: &data,
            n_features: 1,
            grad: &grad,
            hess: &hess,
        };

        let mut tree = RegressionTree::fit(&view, &[0, 1], &params(0));
        assert_eq!(tree.n_leaves(), 1);
        assert_relative_eq!(tree.predict(&[10.0]), 3.0, epsilon = 1e-12);

        tree.scale(0.5);
        assert_relative_eq!(tree.predict(&[10.0]), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn constant_feature_cannot_split() {
        let data = vec![7.0; 4];
        let grad = vec![-1.0, 2.0, -3.0, 4.0];
        let hess = vec![1.0; 4];
        let view = TrainingView {
            data: &data,
            n_features: 1,
            grad: &grad,
            hess: &hess,
        };

        let tree = RegressionTree::fit(&view, &[0, 1, 2, 3], &params(3));
        assert_eq!(tree.n_leaves(), 1);
    }
}
