//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inference::{self, Diagnosis, ModelChoice, ModelSummary, PipelineSnapshot};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Multipart field carrying the training CSV
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    #[serde(rename = "Random Forest Accuracy")]
    pub random_forest_accuracy: f64,
    #[serde(rename = "XGBoost Accuracy")]
    pub xgboost_accuracy: f64,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Outer `None` when the key is absent, inner `None` for an explicit null
    #[serde(default, deserialize_with = "present_field")]
    pub model: Option<Option<String>>,
    pub features: Vec<f64>,
    /// Select and scale a full cleaned row before predicting
    #[serde(default)]
    pub apply_pipeline: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Diagnosis,
}

fn present_field<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Chronic Kidney Disease Prediction API",
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "trained": state.registry.is_trained().await,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
    }))
}

/// Train both models on an uploaded CSV and publish the result
pub async fn train(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<TrainResponse>> {
    let mut multipart = multipart.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = field.file_name().unwrap_or("upload.csv").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(e.body_text()))?;
            info!(file = %file_name, bytes = data.len(), "Received training file");
            upload = Some(data);
            break;
        }
    }
    let data = upload.ok_or_else(|| {
        ServerError::BadRequest(format!("multipart field `{}` is required", UPLOAD_FIELD))
    })?;

    let engine = state.engine.clone();
    let trained = tokio::task::spawn_blocking(move || engine.fit_csv(&data))
        .await
        .map_err(|e| ServerError::Internal(format!("training task failed: {}", e)))??;

    let snapshot = state.registry.publish(PipelineSnapshot::new(trained)).await;
    let report = snapshot.report();

    Ok(Json(TrainResponse {
        random_forest_accuracy: report.forest.accuracy,
        xgboost_accuracy: report.booster.accuracy,
    }))
}

/// Predict one feature vector with the chosen model
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let snapshot = state.registry.current().await.ok_or_else(ServerError::untrained)?;
    let choice = ModelChoice::from_request(request.model.as_ref().map(Option::as_deref));

    let prediction = inference::predict(&snapshot, &request.features, choice, request.apply_pipeline)?;
    info!(
        snapshot = %snapshot.id,
        model = %choice,
        prediction = prediction.diagnosis.as_str(),
        "Served prediction"
    );

    Ok(Json(PredictResponse {
        prediction: prediction.diagnosis,
    }))
}

/// Summary of the currently published snapshot
pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<ModelSummary>> {
    let snapshot = state.registry.current().await.ok_or_else(ServerError::untrained)?;
    Ok(Json(snapshot.summary()))
}
