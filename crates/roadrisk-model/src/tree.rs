//! Depth-limited regression trees over gradient/hessian pairs.
//!
//! These are the weak learners inside the boosting loop: each tree is grown
//! greedily on exact splits, and leaf values are Newton steps
//! `-sum(gradient) / sum(hessian)`.

use serde::{Deserialize, Serialize};

/// Growth limits for one tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum hessian sum required in each child
    pub min_child_weight: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_child_weight: 1.0,
        }
    }
}

/// A fitted tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node carrying the Newton step value
    Leaf {
        /// Leaf output value
        value: f64,
    },
    /// Internal split: rows with `feature < threshold` go left
    Split {
        /// Feature column index
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Left subtree (feature < threshold)
        left: Box<Node>,
        /// Right subtree
        right: Box<Node>,
    },
}

impl Node {
    /// Grow a tree on the rows in `indices`.
    ///
    /// `x` is row-major; `gradients` and `hessians` are per-row.
    pub fn grow(
        x: &[Vec<f64>],
        gradients: &[f64],
        hessians: &[f64],
        indices: &[usize],
        depth: usize,
        params: &TreeParams,
    ) -> Self {
        let grad_sum: f64 = indices.iter().map(|&i| gradients[i]).sum();
        let hess_sum: f64 = indices.iter().map(|&i| hessians[i]).sum();

        let leaf = || Self::Leaf {
            value: if hess_sum > 0.0 {
                -grad_sum / hess_sum
            } else {
                0.0
            },
        };

        if depth >= params.max_depth || indices.len() < 2 {
            return leaf();
        }

        let parent_score = if hess_sum > 0.0 {
            grad_sum * grad_sum / hess_sum
        } else {
            0.0
        };

        let n_features = x.first().map_or(0, Vec::len);
        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, gain)

        for feature in 0..n_features {
            let mut sorted: Vec<usize> = indices.to_vec();
            sorted.sort_by(|&a, &b| {
                x[a][feature]
                    .partial_cmp(&x[b][feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut grad_left = 0.0;
            let mut hess_left = 0.0;
            for w in 0..sorted.len() - 1 {
                let i = sorted[w];
                grad_left += gradients[i];
                hess_left += hessians[i];

                let value = x[i][feature];
                let next = x[sorted[w + 1]][feature];
                if next <= value {
                    continue; // no threshold separates tied values
                }

                let hess_right = hess_sum - hess_left;
                if hess_left < params.min_child_weight || hess_right < params.min_child_weight {
                    continue;
                }

                let grad_right = grad_sum - grad_left;
                let gain = grad_left * grad_left / hess_left
                    + grad_right * grad_right / hess_right
                    - parent_score;

                if best.is_none_or(|(_, _, g)| gain > g) {
                    best = Some((feature, (value + next) / 2.0, gain));
                }
            }
        }

        match best {
            Some((feature, threshold, gain)) if gain > 1e-12 => {
                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| x[i][feature] < threshold);

                Self::Split {
                    feature,
                    threshold,
                    left: Box::new(Self::grow(
                        x,
                        gradients,
                        hessians,
                        &left_idx,
                        depth + 1,
                        params,
                    )),
                    right: Box::new(Self::grow(
                        x,
                        gradients,
                        hessians,
                        &right_idx,
                        depth + 1,
                        params,
                    )),
                }
            }
            _ => leaf(),
        }
    }

    /// Evaluate one row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Self::Leaf { value } => *value,
            Self::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] < *threshold {
                    left.predict_row(row)
                } else {
                    right.predict_row(row)
                }
            }
        }
    }

    /// Number of leaves in this tree.
    pub fn n_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}
