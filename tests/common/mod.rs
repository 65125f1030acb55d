#![allow(dead_code)]
//! Common test utilities: synthetic training data, artifact fixtures, and
//! in-process HTTP helpers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use diabetes_screening_api::api::{build_router, AppState};
use diabetes_screening_api::config::{ModelsConfig, ServiceMode};
use diabetes_screening_api::ml::{
    save_classifier, save_scaler, ClassifierArtifact, ModelRegistry, NaiveBayesModel,
    RandomForestModel, StandardScaler, FEATURE_NAMES,
};
use http_body_util::BodyExt;
use ndarray::Array2;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// Cluster centers for the two outcome classes, in [`FEATURE_NAMES`] order.
const CLASS_0_CENTER: [f64; 8] = [1.0, 85.0, 66.0, 20.0, 80.0, 24.0, 0.3, 28.0];
const CLASS_1_CENTER: [f64; 8] = [8.0, 185.0, 90.0, 40.0, 300.0, 38.0, 1.2, 55.0];

/// Two well-separated clusters of screening records, labelled 0/1.
pub fn training_features() -> (Array2<f64>, Vec<usize>) {
    let n_features = FEATURE_NAMES.len();
    let n_samples = 60;

    let mut rows = Vec::with_capacity(n_samples * n_features);
    let mut labels = Vec::with_capacity(n_samples);

    for i in 0..n_samples {
        let label = i % 2;
        let center = if label == 1 {
            &CLASS_1_CENTER
        } else {
            &CLASS_0_CENTER
        };
        let jitter = (i % 7) as f64 * 0.5;

        for (col, base) in center.iter().enumerate() {
            rows.push(base + jitter * 0.1 * (col + 1) as f64);
        }
        labels.push(label);
    }

    (
        Array2::from_shape_vec((n_samples, n_features), rows).unwrap(),
        labels,
    )
}

/// Train and write the artifacts the dual deployment expects: a Random
/// Forest and a Naive Bayes, each with its own scaler fitted on the raw
/// features and applied before training.
pub fn write_dual_artifacts(dir: &Path) {
    let (features, labels) = training_features();

    let rf_scaler = StandardScaler::fit(&features).unwrap();
    let rf_features = rf_scaler.transform(&features).unwrap();
    let rf = RandomForestModel::train(&rf_features, &labels).unwrap();
    save_classifier(
        &dir.join("diabetes_rf.bin"),
        &ClassifierArtifact::RandomForest(rf),
    )
    .unwrap();
    save_scaler(&dir.join("scaler_rf.bin"), &rf_scaler).unwrap();

    let nb_scaler = StandardScaler::fit(&features).unwrap();
    let nb_features = nb_scaler.transform(&features).unwrap();
    let nb = NaiveBayesModel::train(&nb_features, &labels).unwrap();
    save_classifier(
        &dir.join("diabetes_nb.bin"),
        &ClassifierArtifact::NaiveBayes(nb),
    )
    .unwrap();
    save_scaler(&dir.join("scaler_nb.bin"), &nb_scaler).unwrap();
}

/// Train and write the single deployment's artifact: one classifier on raw
/// (unscaled) features, no scaler file.
pub fn write_single_artifact(dir: &Path) {
    let (features, labels) = training_features();
    let model = RandomForestModel::train(&features, &labels).unwrap();
    save_classifier(
        &dir.join("diabetes.bin"),
        &ClassifierArtifact::RandomForest(model),
    )
    .unwrap();
}

/// Models configuration pointing at a fixture directory, default file names
pub fn models_config(dir: &Path) -> ModelsConfig {
    ModelsConfig {
        dir: dir.to_path_buf(),
        ..ModelsConfig::default()
    }
}

pub fn dual_router(dir: &Path) -> Router {
    let registry = ModelRegistry::load(&models_config(dir), ServiceMode::Dual);
    build_router(AppState::new(Arc::new(registry), ServiceMode::Dual))
}

pub fn single_router(dir: &Path) -> Router {
    let registry = ModelRegistry::load(&models_config(dir), ServiceMode::Single);
    build_router(AppState::new(Arc::new(registry), ServiceMode::Single))
}

/// A record well inside the class-0 cluster
pub fn healthy_body() -> Value {
    json!({
        "Pregnancies": 1,
        "Glucose": 85,
        "BloodPressure": 66,
        "SkinThickness": 20,
        "Insulin": 80,
        "BMI": 24.0,
        "DiabetesPedigreeFunction": 0.3,
        "Age": 28
    })
}

/// A record well inside the class-1 cluster
pub fn diabetic_body() -> Value {
    json!({
        "Pregnancies": 8,
        "Glucose": 185,
        "BloodPressure": 90,
        "SkinThickness": 40,
        "Insulin": 300,
        "BMI": 38.0,
        "DiabetesPedigreeFunction": 1.2,
        "Age": 55
    })
}

/// POST a JSON body and return (status, parsed JSON response)
pub async fn post_json(router: &Router, path: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(router, path, body.to_string()).await
}

/// POST a raw body (still declared as JSON) and return (status, parsed JSON)
pub async fn post_raw(router: &Router, path: &str, body: String) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// GET a path and return (status, body text)
pub async fn get_text(router: &Router, path: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).to_string())
}
