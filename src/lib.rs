//! CKD Predict - chronic kidney disease prediction service
//!
//! This crate trains a random forest and an XGBoost-style booster on an
//! uploaded CKD table and serves predictions over HTTP:
//! - CSV ingestion onto the canonical 25-column schema
//! - Coercion, imputation and label encoding
//! - Seeded train/test split, ANOVA F-score selection, standard scaling
//! - Model fitting and held-out accuracy reporting
//!
//! # Modules
//!
//! - [`preprocessing`] - Ingestion, cleaning, feature selection, scaling
//! - [`training`] - Trees, forest, booster and the training engine
//! - [`inference`] - Snapshot registry and prediction routing
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Pipeline
pub mod preprocessing;
pub mod training;
pub mod inference;

// Services
pub mod server;
pub mod cli;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{CkdError, Result};

    pub use crate::preprocessing::{
        Cleaner, FeatureSelector, Ingestor, PreprocessingConfig, RawTable, Scaler,
    };

    pub use crate::training::{
        Classifier, ModelMetrics, PipelineConfig, RandomForest, TrainEngine, TrainedPipeline,
        TrainingReport, XGBoostClassifier, XGBoostConfig,
    };

    pub use crate::inference::{Diagnosis, ModelChoice, ModelRegistry, PipelineSnapshot};

    pub use crate::server::{create_router, AppState, ServerConfig};
}
