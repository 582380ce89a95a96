//! Univariate feature selection
//!
//! Scores every column independently against the class label with the ANOVA
//! F-statistic and keeps the `k` highest-scoring columns. Selected columns keep
//! their original relative order.

use crate::error::{CkdError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Feature selector keeping the k best columns by F-score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSelector {
    k: usize,
    selected_features: Option<Vec<usize>>,
    feature_scores: Option<Vec<f64>>,
    feature_names: Option<Vec<String>>,
    n_features_in: Option<usize>,
}

impl FeatureSelector {
    /// Create a selector keeping the `k` best features
    pub fn k_best(k: usize) -> Self {
        Self {
            k,
            selected_features: None,
            feature_scores: None,
            feature_names: None,
            n_features_in: None,
        }
    }

    /// Set feature names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Score every column on `x` against `y` and remember the top k
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_features = x.ncols();
        if x.nrows() != y.len() {
            return Err(CkdError::shape(
                format!("{} labels", x.nrows()),
                format!("{} labels", y.len()),
            ));
        }
        if self.k == 0 {
            return Err(CkdError::InvalidInput("k must be at least 1".to_string()));
        }

        let scores = f_classif(x, y);

        let k = if self.k >= n_features {
            if self.k > n_features {
                warn!(k = self.k, n_features, "k exceeds feature count, keeping all features");
            }
            n_features
        } else {
            self.k
        };

        // Stable ascending sort by score, take the last k; NaN ranks lowest
        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| {
            rank_key(scores[a])
                .partial_cmp(&rank_key(scores[b]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut selected: Vec<usize> = order[n_features - k..].to_vec();
        selected.sort_unstable();

        self.n_features_in = Some(n_features);
        self.feature_scores = Some(scores);
        self.selected_features = Some(selected);
        Ok(())
    }

    /// Project `x` onto the selected columns
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let selected = self.selected_features.as_ref().ok_or(CkdError::ModelNotFitted)?;
        let n_in = self.n_features_in.unwrap_or(0);
        if x.ncols() != n_in {
            return Err(CkdError::shape(
                format!("{} features", n_in),
                format!("{} features", x.ncols()),
            ));
        }
        Ok(x.select(Axis(1), selected))
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Array2<f64>> {
        self.fit(x, y)?;
        self.transform(x)
    }

    pub fn selected_indices(&self) -> Option<&[usize]> {
        self.selected_features.as_deref()
    }

    pub fn scores(&self) -> Option<&[f64]> {
        self.feature_scores.as_deref()
    }

    pub fn n_features_in(&self) -> Option<usize> {
        self.n_features_in
    }

    /// Names of the selected columns, in projection order
    pub fn selected_names(&self) -> Option<Vec<String>> {
        let indices = self.selected_features.as_ref()?;
        let names = self.feature_names.as_ref()?;
        Some(indices.iter().filter_map(|&i| names.get(i).cloned()).collect())
    }
}

fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::MIN
    } else {
        score
    }
}

/// ANOVA F-statistic of each column of `x` grouped by the classes in `y`
pub fn f_classif(x: &Array2<f64>, y: &Array1<f64>) -> Vec<f64> {
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in y.iter().enumerate() {
        groups.entry(label.round() as i64).or_default().push(i);
    }
    let groups: Vec<Vec<usize>> = groups.into_values().collect();

    x.axis_iter(Axis(1))
        .map(|col| f_statistic(col, &groups))
        .collect()
}

fn f_statistic(col: ArrayView1<f64>, groups: &[Vec<usize>]) -> f64 {
    let n = col.len() as f64;
    let k = groups.len() as f64;
    let grand_mean = col.mean().unwrap_or(0.0);

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let count = group.len() as f64;
        let mean = group.iter().map(|&i| col[i]).sum::<f64>() / count;
        ss_between += count * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|&i| (col[i] - mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1.0;
    let df_within = n - k;
    // 0/0 yields NaN (constant column), x/0 yields inf (perfect separation)
    (ss_between / df_between) / (ss_within / df_within)
}
