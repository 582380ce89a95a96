//! Inference module
//!
//! Serves predictions from the currently published pipeline snapshot:
//! - Model routing by display name
//! - Raw or pipeline-transformed feature vectors
//! - Atomic snapshot publication for concurrent readers

mod predictor;
mod registry;

pub use predictor::{predict, Prediction};
pub use registry::{ModelRegistry, ModelSummary, PipelineSnapshot};

use serde::{Deserialize, Serialize};

/// Which fitted model answers a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    #[serde(rename = "Random Forest")]
    RandomForest,
    #[serde(rename = "XGBoost")]
    XGBoost,
}

impl ModelChoice {
    pub const RANDOM_FOREST: &'static str = "Random Forest";

    /// Route a request's `model` field.
    ///
    /// An absent field or exactly "Random Forest" selects the forest. Any other
    /// value, an explicit null included, selects the booster.
    pub fn from_request(model: Option<Option<&str>>) -> Self {
        match model {
            None | Some(Some(Self::RANDOM_FOREST)) => ModelChoice::RandomForest,
            Some(_) => ModelChoice::XGBoost,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::RandomForest => Self::RANDOM_FOREST,
            ModelChoice::XGBoost => "XGBoost",
        }
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-valued prediction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    #[serde(rename = "CKD")]
    Ckd,
    #[serde(rename = "No CKD")]
    NoCkd,
}

impl Diagnosis {
    /// Class 1 is disease-present
    pub fn from_class(class: f64) -> Self {
        if class == 1.0 {
            Diagnosis::Ckd
        } else {
            Diagnosis::NoCkd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Ckd => "CKD",
            Diagnosis::NoCkd => "No CKD",
        }
    }
}
