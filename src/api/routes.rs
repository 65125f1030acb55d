use crate::api::{handlers, AppState};
use crate::config::ServiceMode;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router for the configured deployment mode
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Banner and operational endpoints
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics));

    // Prediction surface depends on the deployment variant
    let router = match state.mode {
        ServiceMode::Dual => router
            .route("/diabetes-cek-rf", post(handlers::predict_random_forest))
            .route("/diabetes-cek-nb", post(handlers::predict_naive_bayes)),
        ServiceMode::Single => router.route("/diabetes-cek", post(handlers::predict_diabetes)),
    };

    router
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
