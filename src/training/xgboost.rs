//! XGBoost-style gradient boosting with second-order approximation
//!
//! - Uses both gradient and hessian of the logistic loss
//! - Regularized leaf weights: w* = -G / (H + lambda)
//! - Gain-based split scoring: Gain = 0.5 * [GL²/(HL+λ) + GR²/(HR+λ) - (GL+GR)²/(HL+HR+λ)] - γ
//! - Minimum child weight constraint

use super::Classifier;
use crate::error::{CkdError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// XGBoost configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XGBoostConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_child_weight: f64,
    /// L2 regularization on leaf weights
    pub reg_lambda: f64,
    /// L1 regularization on leaf weights
    pub reg_alpha: f64,
    /// Minimum loss reduction to make a split (gamma)
    pub gamma: f64,
    pub subsample: f64,
    pub colsample_bytree: f64,
    pub random_state: u64,
}

impl Default for XGBoostConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.3,
            max_depth: 6,
            min_child_weight: 1.0,
            reg_lambda: 1.0,
            reg_alpha: 0.0,
            gamma: 0.0,
            subsample: 1.0,
            colsample_bytree: 1.0,
            random_state: 42,
        }
    }
}

/// A single node in a boosted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
enum XGBNode {
    Leaf { weight: f64 },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<XGBNode>,
        right: Box<XGBNode>,
    },
}

impl XGBNode {
    fn predict(&self, sample: ArrayView1<f64>) -> f64 {
        match self {
            XGBNode::Leaf { weight } => *weight,
            XGBNode::Split { feature, threshold, left, right } => {
                if sample[*feature] <= *threshold {
                    left.predict(sample)
                } else {
                    right.predict(sample)
                }
            }
        }
    }
}

/// Gradient statistics shared by every node of one boosting round
struct RoundStats<'a> {
    x: &'a Array2<f64>,
    grad: &'a Array1<f64>,
    hess: &'a Array1<f64>,
    features: &'a [usize],
    config: &'a XGBoostConfig,
}

impl RoundStats<'_> {
    /// Build a tree using exact greedy split finding
    fn build(&self, indices: &[usize], depth: usize) -> XGBNode {
        let g_sum: f64 = indices.iter().map(|&i| self.grad[i]).sum();
        let h_sum: f64 = indices.iter().map(|&i| self.hess[i]).sum();
        let leaf_weight = leaf_weight(g_sum, h_sum, self.config.reg_lambda, self.config.reg_alpha);

        if depth >= self.config.max_depth || indices.len() < 2 || h_sum < self.config.min_child_weight {
            return XGBNode::Leaf { weight: leaf_weight };
        }

        let candidates: Vec<Option<(usize, f64, f64)>> = self
            .features
            .par_iter()
            .map(|&f| self.best_split_for_feature(indices, f, g_sum, h_sum))
            .collect();

        // First strictly larger gain wins so the result does not depend on scheduling
        let mut best: Option<(usize, f64, f64)> = None;
        for split in candidates.into_iter().flatten() {
            if best.map_or(true, |b| split.2 > b.2) {
                best = Some(split);
            }
        }

        match best {
            Some((feature, threshold, gain)) if gain > self.config.gamma => {
                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
                    indices.iter().partition(|&&i| self.x[[i, feature]] <= threshold);

                if left_idx.is_empty() || right_idx.is_empty() {
                    return XGBNode::Leaf { weight: leaf_weight };
                }

                XGBNode::Split {
                    feature,
                    threshold,
                    left: Box::new(self.build(&left_idx, depth + 1)),
                    right: Box::new(self.build(&right_idx, depth + 1)),
                }
            }
            _ => XGBNode::Leaf { weight: leaf_weight },
        }
    }

    fn best_split_for_feature(
        &self,
        indices: &[usize],
        feature: usize,
        g_total: f64,
        h_total: f64,
    ) -> Option<(usize, f64, f64)> {
        let x = self.x;
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            x[[a, feature]]
                .partial_cmp(&x[[b, feature]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let lambda = self.config.reg_lambda;
        let mut g_left = 0.0;
        let mut h_left = 0.0;
        let mut best: Option<(f64, f64)> = None;

        for pos in 0..sorted.len().saturating_sub(1) {
            let idx = sorted[pos];
            g_left += self.grad[idx];
            h_left += self.hess[idx];

            let current = x[[idx, feature]];
            let next = x[[sorted[pos + 1], feature]];
            if next <= current {
                continue;
            }

            let g_right = g_total - g_left;
            let h_right = h_total - h_left;
            if h_left < self.config.min_child_weight || h_right < self.config.min_child_weight {
                continue;
            }

            let gain = 0.5
                * ((g_left * g_left) / (h_left + lambda) + (g_right * g_right) / (h_right + lambda)
                    - (g_total * g_total) / (h_total + lambda));

            if best.map_or(true, |(g, _)| gain > g) {
                best = Some((gain, (current + next) / 2.0));
            }
        }

        best.map(|(gain, threshold)| (feature, threshold, gain))
    }
}

/// Optimal leaf weight with L1 (alpha) and L2 (lambda) regularization
fn leaf_weight(g_sum: f64, h_sum: f64, lambda: f64, alpha: f64) -> f64 {
    let g_adj = if g_sum > alpha {
        g_sum - alpha
    } else if g_sum < -alpha {
        g_sum + alpha
    } else {
        return 0.0;
    };
    -g_adj / (h_sum + lambda)
}

/// Binary XGBoost classifier (logistic loss)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XGBoostClassifier {
    config: XGBoostConfig,
    trees: Vec<XGBNode>,
    base_score: f64,
    n_features: usize,
    /// Training log-loss after each round
    eval_history: Vec<f64>,
}

impl XGBoostClassifier {
    pub fn new(config: XGBoostConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            base_score: 0.0,
            n_features: 0,
            eval_history: Vec::new(),
        }
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Fit on labels that are already 0/1; any other label is rejected
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(CkdError::shape(
                format!("y length = {}", n_samples),
                format!("y length = {}", y.len()),
            ));
        }
        if n_samples == 0 {
            return Err(CkdError::Training("cannot boost on zero samples".to_string()));
        }
        if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(CkdError::Training(format!(
                "labels must be 0 or 1, found {}",
                bad
            )));
        }

        self.n_features = n_features;

        // Base score in log-odds space
        let p = y.mean().unwrap_or(0.5).clamp(1e-7, 1.0 - 1e-7);
        self.base_score = (p / (1.0 - p)).ln();
        let mut raw_preds = Array1::from_elem(n_samples, self.base_score);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.random_state);

        self.trees.clear();
        self.eval_history.clear();

        for round in 0..self.config.n_estimators {
            // Logistic loss: grad = p - y, hess = p * (1 - p)
            let probs: Array1<f64> = raw_preds.mapv(Self::sigmoid);
            let grad: Array1<f64> = &probs - y;
            let hess: Array1<f64> = probs.mapv(|p| (p * (1.0 - p)).max(1e-7));

            let row_indices = subsample(&mut rng, n_samples, self.config.subsample);
            let col_indices = subsample(&mut rng, n_features, self.config.colsample_bytree);

            let stats = RoundStats {
                x,
                grad: &grad,
                hess: &hess,
                features: &col_indices,
                config: &self.config,
            };
            let tree = stats.build(&row_indices, 0);

            for (raw, row) in raw_preds.iter_mut().zip(x.rows()) {
                *raw += self.config.learning_rate * tree.predict(row);
            }

            let loss = log_loss(y, &raw_preds.mapv(Self::sigmoid));
            debug!(round, logloss = loss, "Boosting round complete");
            self.eval_history.push(loss);
            self.trees.push(tree);
        }

        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let probs = self.predict_proba(x)?;
        Ok(probs.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
    }

    /// Probability of class 1 per sample
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(CkdError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(CkdError::shape(
                format!("{} features", self.n_features),
                format!("{} features", x.ncols()),
            ));
        }

        Ok(x
            .rows()
            .into_iter()
            .map(|row| {
                let raw = self.trees.iter().fold(self.base_score, |acc, tree| {
                    acc + self.config.learning_rate * tree.predict(row)
                });
                Self::sigmoid(raw)
            })
            .collect())
    }

    /// Training log-loss recorded after every round
    pub fn eval_history(&self) -> &[f64] {
        &self.eval_history
    }

    pub fn n_rounds(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for XGBoostClassifier {
    fn name(&self) -> &'static str {
        "XGBoost"
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        XGBoostClassifier::predict(self, x)
    }
}

/// Mean binary cross-entropy
pub fn log_loss(y: &Array1<f64>, probs: &Array1<f64>) -> f64 {
    let eps = 1e-15;
    let n = y.len().max(1) as f64;
    y.iter()
        .zip(probs.iter())
        .map(|(&t, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}

fn subsample(rng: &mut Xoshiro256PlusPlus, n: usize, ratio: f64) -> Vec<usize> {
    if ratio >= 1.0 {
        return (0..n).collect();
    }
    let k = (((n as f64) * ratio).ceil() as usize).max(1);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(k);
    indices.sort_unstable();
    indices
}
