//! Pipeline configuration

use serde::{Deserialize, Serialize};

use super::xgboost::XGBoostConfig;
use crate::preprocessing::PreprocessingConfig;

/// Random forest settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub random_state: u64,
    pub max_depth: Option<usize>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 30,
            random_state: 30,
            max_depth: None,
        }
    }
}

/// End-to-end training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cleaning pass settings
    pub preprocessing: PreprocessingConfig,

    /// Number of features kept by univariate selection
    pub k_features: usize,

    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Seed for the train/test permutation
    pub split_seed: u64,

    pub forest: ForestConfig,

    pub booster: XGBoostConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preprocessing: PreprocessingConfig::default(),
            k_features: 10,
            test_size: 0.2,
            split_seed: 42,
            forest: ForestConfig::default(),
            booster: XGBoostConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the number of selected features
    pub fn with_k_features(mut self, k: usize) -> Self {
        self.k_features = k;
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the split seed
    pub fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    /// Builder method to set forest size and seed
    pub fn with_forest(mut self, n_estimators: usize, random_state: u64) -> Self {
        self.forest.n_estimators = n_estimators;
        self.forest.random_state = random_state;
        self
    }

    /// Builder method to set boosting rounds and seed
    pub fn with_boosting(mut self, n_estimators: usize, random_state: u64) -> Self {
        self.booster.n_estimators = n_estimators;
        self.booster.random_state = random_state;
        self
    }

    /// Builder method to set the boosting learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.booster.learning_rate = learning_rate;
        self
    }

    /// Builder method to set the boosting tree depth
    pub fn with_boosting_depth(mut self, max_depth: usize) -> Self {
        self.booster.max_depth = max_depth;
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.k_features, 10);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.split_seed, 42);
        assert_eq!(config.forest.n_estimators, 30);
        assert_eq!(config.forest.random_state, 30);
        assert_eq!(config.booster.n_estimators, 100);
        assert_eq!(config.booster.random_state, 42);
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::new()
            .with_k_features(5)
            .with_forest(10, 1)
            .with_boosting(20, 2)
            .with_learning_rate(0.1)
            .with_boosting_depth(3);
        assert_eq!(config.k_features, 5);
        assert_eq!(config.forest.n_estimators, 10);
        assert_eq!(config.booster.n_estimators, 20);
        assert_eq!(config.booster.learning_rate, 0.1);
        assert_eq!(config.booster.max_depth, 3);
    }
}
