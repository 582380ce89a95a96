//! Model training module
//!
//! Provides the two classifiers served by the API and the engine that fits them:
//! - Decision trees and Random Forests
//! - XGBoost-style second-order gradient boosting
//! - Seeded train/test splitting
//! - Held-out classification metrics

mod config;
mod engine;
mod models;
pub mod decision_tree;
pub mod random_forest;
pub mod split;
pub mod xgboost;

pub use config::{ForestConfig, PipelineConfig};
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{TrainEngine, TrainedPipeline, TrainingReport};
pub use models::{Classifier, ModelMetrics};
pub use random_forest::RandomForest;
pub use split::{SplitData, TrainTestSplit};
pub use xgboost::{XGBoostClassifier, XGBoostConfig};
