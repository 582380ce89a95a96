//! Training engine: runs the full pipeline from CSV bytes to fitted models

use crate::error::{CkdError, Result};
use crate::preprocessing::schema::LABEL_COLUMN;
use crate::preprocessing::{Cleaner, CleaningSummary, FeatureSelector, Ingestor, RawTable, Scaler};
use super::random_forest::RandomForest;
use super::split::TrainTestSplit;
use super::xgboost::XGBoostClassifier;
use super::{ModelMetrics, PipelineConfig};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Everything one training run measured
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Rows in the uploaded table
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Cleaned feature columns, in input order
    pub feature_names: Vec<String>,
    /// Columns kept by selection, in projection order
    pub selected_features: Vec<String>,
    /// F-score per cleaned feature column
    pub feature_scores: Vec<f64>,
    pub forest: ModelMetrics,
    pub booster: ModelMetrics,
    /// Training log-loss per boosting round
    pub booster_eval_history: Vec<f64>,
    pub cleaning: CleaningSummary,
    pub training_time_secs: f64,
}

/// Fitted models plus the transforms fitted alongside them
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    pub forest: RandomForest,
    pub booster: XGBoostClassifier,
    pub selector: FeatureSelector,
    pub scaler: Scaler,
    pub report: TrainingReport,
}

/// Main training engine
#[derive(Debug, Clone, Default)]
pub struct TrainEngine {
    config: PipelineConfig,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse an uploaded CSV and train on it
    pub fn fit_csv(&self, bytes: &[u8]) -> Result<TrainedPipeline> {
        let table = Ingestor::new().read_csv(bytes)?;
        self.fit_table(table)
    }

    /// Clean, split, select, scale and fit both models
    pub fn fit_table(&self, table: RawTable) -> Result<TrainedPipeline> {
        let start = Instant::now();
        let n_rows = table.n_rows();

        let cleaned = Cleaner::new(self.config.preprocessing.clone()).clean(table)?;
        let (x, y, feature_names) = cleaned.features_and_label(LABEL_COLUMN)?;

        if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(CkdError::Preprocessing(format!(
                "label column `{}` must encode to 0/1, found {}",
                LABEL_COLUMN, bad
            )));
        }

        let split = TrainTestSplit::new(n_rows, self.config.test_size, self.config.split_seed)?;
        let data = split.apply(&x, &y);
        debug!(n_train = data.x_train.nrows(), n_test = data.x_test.nrows(), "Split dataset");

        let mut selector =
            FeatureSelector::k_best(self.config.k_features).with_feature_names(feature_names.clone());
        let x_train = selector.fit_transform(&data.x_train, &data.y_train)?;
        let x_test = selector.transform(&data.x_test)?;
        let selected_features = selector.selected_names().unwrap_or_default();
        debug!(selected = ?selected_features, "Selected features");

        let mut scaler = Scaler::new();
        let x_train = scaler.fit_transform(&x_train)?;
        let x_test = scaler.transform(&x_test)?;

        let forest_config = &self.config.forest;
        let (forest, booster) = rayon::join(
            || -> Result<RandomForest> {
                let mut forest = RandomForest::new_classifier(forest_config.n_estimators)
                    .with_random_state(forest_config.random_state);
                if let Some(depth) = forest_config.max_depth {
                    forest = forest.with_max_depth(depth);
                }
                forest.fit(&x_train, &data.y_train)?;
                Ok(forest)
            },
            || -> Result<XGBoostClassifier> {
                let mut booster = XGBoostClassifier::new(self.config.booster.clone());
                booster.fit(&x_train, &data.y_train)?;
                Ok(booster)
            },
        );
        let forest = forest?;
        let booster = booster?;

        let forest_metrics = ModelMetrics::compute_classification(&data.y_test, &forest.predict(&x_test)?);
        let booster_metrics = ModelMetrics::compute_classification(&data.y_test, &booster.predict(&x_test)?);

        let report = TrainingReport {
            n_rows,
            n_train: data.y_train.len(),
            n_test: data.y_test.len(),
            feature_names,
            selected_features,
            feature_scores: selector.scores().map(<[f64]>::to_vec).unwrap_or_default(),
            forest: forest_metrics,
            booster: booster_metrics,
            booster_eval_history: booster.eval_history().to_vec(),
            cleaning: cleaned.summary(),
            training_time_secs: start.elapsed().as_secs_f64(),
        };

        info!(
            rows = n_rows,
            forest_accuracy = report.forest.accuracy,
            booster_accuracy = report.booster.accuracy,
            elapsed_secs = report.training_time_secs,
            "Training complete"
        );

        Ok(TrainedPipeline {
            forest,
            booster,
            selector,
            scaler,
            report,
        })
    }
}
