//! Decision tree classifier

use crate::error::{CkdError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with the majority class
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Decision tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Candidate features drawn at every split (all when `None`)
    pub max_features: Option<usize>,
    /// Seed for candidate feature sampling
    pub random_state: Option<u64>,
    /// Number of features
    n_features: usize,
    /// Sorted class labels; leaves store labels, splits count class indices
    classes: Vec<f64>,
}

/// Per-class sample counts indexed by class position
type ClassCounts = Vec<usize>;

impl DecisionTree {
    /// Create a new classifier tree
    pub fn new_classifier() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            random_state: None,
            n_features: 0,
            classes: Vec::new(),
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set number of candidate features per split
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(CkdError::shape(
                format!("y length = {}", n_samples),
                format!("y length = {}", y.len()),
            ));
        }

        if n_samples < self.min_samples_split {
            return Err(CkdError::Training(format!(
                "Need at least {} samples, got {}",
                self.min_samples_split, n_samples
            )));
        }

        self.n_features = n_features;
        self.classes = sorted_classes(y);

        let targets: Vec<usize> = y
            .iter()
            .map(|v| class_position(&self.classes, *v))
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state.unwrap_or(0));
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, &targets, &indices, 0, &mut rng));

        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        targets: &[usize],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n_samples = indices.len();
        let counts = self.class_counts(targets, indices);
        let impurity = gini(&counts, n_samples);

        let should_stop = n_samples < self.min_samples_split
            || n_samples <= self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || impurity <= 0.0;

        if should_stop {
            return self.leaf(&counts, n_samples);
        }

        let candidates = self.candidate_features(x.ncols(), rng);

        match self.find_best_split(x, targets, indices, &candidates, impurity) {
            Some((feature, threshold)) => {
                let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| x[[i, feature]] <= threshold);

                if left_indices.len() < self.min_samples_leaf
                    || right_indices.len() < self.min_samples_leaf
                {
                    return self.leaf(&counts, n_samples);
                }

                let left = Box::new(self.build_tree(x, targets, &left_indices, depth + 1, rng));
                let right = Box::new(self.build_tree(x, targets, &right_indices, depth + 1, rng));

                TreeNode::Split {
                    feature_idx: feature,
                    threshold,
                    left,
                    right,
                    n_samples,
                    impurity,
                }
            }
            None => self.leaf(&counts, n_samples),
        }
    }

    fn candidate_features(&self, n_features: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        match self.max_features {
            Some(m) if m < n_features => {
                let mut picked = sample(rng, n_features, m.max(1)).into_vec();
                picked.sort_unstable();
                picked
            }
            _ => (0..n_features).collect(),
        }
    }

    /// Best (feature, threshold) by Gini gain among the candidates; ties keep the earlier feature
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        targets: &[usize],
        indices: &[usize],
        candidates: &[usize],
        parent_impurity: f64,
    ) -> Option<(usize, f64)> {
        let n_classes = self.classes.len();
        let n = indices.len();

        let feature_results: Vec<Option<(usize, f64, f64)>> = candidates
            .par_iter()
            .map(|&feature| {
                let mut sorted: Vec<usize> = indices.to_vec();
                sorted.sort_by(|&a, &b| {
                    x[[a, feature]]
                        .partial_cmp(&x[[b, feature]])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

                let mut left: ClassCounts = vec![0; n_classes];
                let mut right: ClassCounts = self.class_counts(targets, &sorted);
                let mut best: Option<(f64, f64)> = None;

                for pos in 0..n.saturating_sub(1) {
                    let idx = sorted[pos];
                    left[targets[idx]] += 1;
                    right[targets[idx]] -= 1;

                    let current = x[[idx, feature]];
                    let next = x[[sorted[pos + 1], feature]];
                    if next <= current {
                        continue;
                    }

                    let n_left = pos + 1;
                    let n_right = n - n_left;
                    if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                        continue;
                    }

                    let weighted = (n_left as f64 * gini(&left, n_left)
                        + n_right as f64 * gini(&right, n_right))
                        / n as f64;
                    let gain = parent_impurity - weighted;

                    if gain > best.map_or(0.0, |(g, _)| g) {
                        best = Some((gain, (current + next) / 2.0));
                    }
                }

                best.map(|(gain, threshold)| (feature, threshold, gain))
            })
            .collect();

        let mut best: Option<(usize, f64, f64)> = None;
        for result in feature_results.into_iter().flatten() {
            if best.map_or(true, |b| result.2 > b.2) {
                best = Some(result);
            }
        }
        best.map(|(feature, threshold, _)| (feature, threshold))
    }

    fn class_counts(&self, targets: &[usize], indices: &[usize]) -> ClassCounts {
        let mut counts = vec![0; self.classes.len()];
        for &i in indices {
            counts[targets[i]] += 1;
        }
        counts
    }

    /// Majority class; ties go to the smallest class
    fn leaf(&self, counts: &[usize], n_samples: usize) -> TreeNode {
        let mut best = 0;
        for (i, &c) in counts.iter().enumerate() {
            if c > counts[best] {
                best = i;
            }
        }
        TreeNode::Leaf {
            value: self.classes.get(best).copied().unwrap_or(0.0),
            n_samples,
        }
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(CkdError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(CkdError::shape(
                format!("{} features", self.n_features),
                format!("{} features", x.ncols()),
            ));
        }

        Ok(x.rows().into_iter().map(|row| Self::predict_sample(root, row)).collect())
    }

    fn predict_sample(node: &TreeNode, sample: ArrayView1<f64>) -> f64 {
        match node {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                if sample[*feature_idx] <= *threshold {
                    Self::predict_sample(left, sample)
                } else {
                    Self::predict_sample(right, sample)
                }
            }
        }
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Sorted distinct labels
pub(crate) fn sorted_classes(y: &Array1<f64>) -> Vec<f64> {
    let mut classes: Vec<f64> = y.iter().copied().collect();
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    classes.dedup();
    classes
}

fn class_position(classes: &[f64], value: f64) -> usize {
    classes
        .iter()
        .position(|&c| c == value)
        .unwrap_or(0)
}
