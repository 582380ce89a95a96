//! Published pipeline snapshots

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::ModelChoice;
use crate::training::{Classifier, ModelMetrics, TrainedPipeline, TrainingReport};

/// Immutable result of one successful training run
#[derive(Debug)]
pub struct PipelineSnapshot {
    pub id: String,
    pub trained_at: DateTime<Utc>,
    pipeline: TrainedPipeline,
}

/// Public description of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub snapshot_id: String,
    pub trained_at: DateTime<Utc>,
    pub selected_features: Vec<String>,
    #[serde(rename = "Random Forest Accuracy")]
    pub random_forest_accuracy: f64,
    #[serde(rename = "XGBoost Accuracy")]
    pub xgboost_accuracy: f64,
    pub rows_used: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub random_forest: ModelMetrics,
    pub xgboost: ModelMetrics,
    pub training_time_secs: f64,
}

impl PipelineSnapshot {
    pub fn new(pipeline: TrainedPipeline) -> Self {
        Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            trained_at: Utc::now(),
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &TrainedPipeline {
        &self.pipeline
    }

    pub fn report(&self) -> &TrainingReport {
        &self.pipeline.report
    }

    /// The fitted model behind a choice
    pub fn classifier(&self, choice: ModelChoice) -> &dyn Classifier {
        match choice {
            ModelChoice::RandomForest => &self.pipeline.forest,
            ModelChoice::XGBoost => &self.pipeline.booster,
        }
    }

    pub fn summary(&self) -> ModelSummary {
        let report = self.report();
        ModelSummary {
            snapshot_id: self.id.clone(),
            trained_at: self.trained_at,
            selected_features: report.selected_features.clone(),
            random_forest_accuracy: report.forest.accuracy,
            xgboost_accuracy: report.booster.accuracy,
            rows_used: report.n_rows,
            n_train: report.n_train,
            n_test: report.n_test,
            random_forest: report.forest.clone(),
            xgboost: report.booster.clone(),
            training_time_secs: report.training_time_secs,
        }
    }
}

/// Holds the current snapshot; readers clone the `Arc` and release the lock
#[derive(Debug, Default)]
pub struct ModelRegistry {
    current: RwLock<Option<Arc<PipelineSnapshot>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot as a unit
    pub async fn publish(&self, snapshot: PipelineSnapshot) -> Arc<PipelineSnapshot> {
        let snapshot = Arc::new(snapshot);
        let previous = self.current.write().await.replace(Arc::clone(&snapshot));
        info!(
            snapshot = %snapshot.id,
            replaced = previous.as_ref().map(|p| p.id.as_str()).unwrap_or("none"),
            "Published pipeline snapshot"
        );
        snapshot
    }

    pub async fn current(&self) -> Option<Arc<PipelineSnapshot>> {
        self.current.read().await.clone()
    }

    pub async fn is_trained(&self) -> bool {
        self.current.read().await.is_some()
    }
}
