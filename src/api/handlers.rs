use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::metrics::{PREDICTIONS_TOTAL, PREDICTION_DURATION_SECONDS};
use crate::ml::{
    diagnosis_label, PatientRecord, SLOT_NAIVE_BAYES, SLOT_RANDOM_FOREST, SLOT_SINGLE,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// Index banner, served regardless of artifact state
pub async fn index() -> &'static str {
    "API Cek diabetes!"
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        models: state.registry.availability(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models: BTreeMap<String, bool>,
}

/// Prediction response DTO
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: usize,
    pub diagnosis: String,
}

/// Predict with the Random Forest model
pub async fn predict_random_forest(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    run_prediction(&state, SLOT_RANDOM_FOREST, body)
}

/// Predict with the Naive Bayes model
pub async fn predict_naive_bayes(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    run_prediction(&state, SLOT_NAIVE_BAYES, body)
}

/// Predict with the single-model deployment's classifier
pub async fn predict_diabetes(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    run_prediction(&state, SLOT_SINGLE, body)
}

fn run_prediction(
    state: &AppState,
    slot_key: &str,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    let start = Instant::now();
    let result = predict(state, slot_key, body);

    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.error_code(),
    };
    PREDICTIONS_TOTAL
        .with_label_values(&[slot_key, outcome])
        .inc();
    PREDICTION_DURATION_SECONDS
        .with_label_values(&[slot_key])
        .observe(start.elapsed().as_secs_f64());

    result
}

fn predict(
    state: &AppState,
    slot_key: &str,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    // Artifact availability is checked before the body is touched
    let endpoint = state.registry.endpoint(slot_key)?;

    let Json(body) = body.map_err(|e| AppError::Validation(e.to_string()))?;
    tracing::debug!(payload = %body, "Prediction payload received");

    let record = PatientRecord::from_json(&body)?;
    let class_index = endpoint.predict(&record)?;
    let diagnosis = diagnosis_label(class_index).to_string();

    tracing::info!(
        endpoint = slot_key,
        prediction = class_index,
        diagnosis = %diagnosis,
        "Prediction served"
    );

    Ok(Json(PredictionResponse {
        prediction: class_index,
        diagnosis,
    }))
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> (StatusCode, String) {
    let metrics = crate::metrics::gather_metrics();
    (StatusCode::OK, metrics)
}
