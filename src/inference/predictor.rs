//! Single-vector prediction against a snapshot

use ndarray::Array2;
use tracing::debug;

use super::{Diagnosis, ModelChoice, PipelineSnapshot};
use crate::error::Result;

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    pub model: ModelChoice,
    /// Raw class label returned by the model
    pub class: f64,
}

/// Predict one feature vector.
///
/// Without `apply_pipeline` the vector goes to the model verbatim, so it must
/// already be the selected, scaled columns in training order. With it, the
/// vector is a full cleaned feature row and is projected and scaled first.
pub fn predict(
    snapshot: &PipelineSnapshot,
    features: &[f64],
    choice: ModelChoice,
    apply_pipeline: bool,
) -> Result<Prediction> {
    let mut row = Array2::from_shape_vec((1, features.len()), features.to_vec())?;

    if apply_pipeline {
        let pipeline = snapshot.pipeline();
        row = pipeline.selector.transform(&row)?;
        row = pipeline.scaler.transform(&row)?;
    }

    let model = snapshot.classifier(choice);
    let preds = model.predict(&row)?;
    let class = preds.get(0).copied().unwrap_or(0.0);
    debug!(model = model.name(), class, apply_pipeline, "Predicted");

    Ok(Prediction {
        diagnosis: Diagnosis::from_class(class),
        model: choice,
        class,
    })
}
