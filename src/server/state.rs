//! Application state management

use chrono::{DateTime, Utc};

use crate::inference::ModelRegistry;
use crate::training::{PipelineConfig, TrainEngine};

use super::ServerConfig;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub registry: ModelRegistry,
    pub engine: TrainEngine,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_pipeline(config, PipelineConfig::default())
    }

    pub fn with_pipeline(config: ServerConfig, pipeline: PipelineConfig) -> Self {
        Self {
            config,
            registry: ModelRegistry::new(),
            engine: TrainEngine::new(pipeline),
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}
