/// Prometheus metrics exporter for the screening service.
///
/// Exposes prediction throughput, latency, and artifact availability through
/// the `/metrics` endpoint in the Prometheus text exposition format.
use lazy_static::lazy_static;
use prometheus::{CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of prediction requests handled
    ///
    /// Labels: endpoint, outcome (success or the error code)
    pub static ref PREDICTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("predictions_total", "Total number of prediction requests handled")
            .namespace("diabetes_screening_api"),
        &["endpoint", "outcome"]
    ).expect("Failed to create PREDICTIONS_TOTAL metric");

    /// Prediction handling duration in seconds
    ///
    /// Labels: endpoint
    pub static ref PREDICTION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "prediction_duration_seconds",
            "Prediction handling duration in seconds"
        )
        .namespace("diabetes_screening_api")
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25]),
        &["endpoint"]
    ).expect("Failed to create PREDICTION_DURATION_SECONDS metric");

    /// Whether each model slot loaded its artifacts (1 loaded, 0 unavailable)
    ///
    /// Labels: model
    pub static ref MODELS_LOADED: GaugeVec = GaugeVec::new(
        Opts::new("models_loaded", "Whether each model slot loaded its artifacts")
            .namespace("diabetes_screening_api"),
        &["model"]
    ).expect("Failed to create MODELS_LOADED metric");
}

/// Register all metrics with the Prometheus registry.
///
/// Call once at application startup; re-registration is the only error path.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(PREDICTIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(PREDICTION_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(MODELS_LOADED.clone()))?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Generate Prometheus text format metrics for the /metrics endpoint
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        // Only the first call per process can register cleanly
        let result = init_metrics();
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_prediction_metrics() {
        PREDICTIONS_TOTAL
            .with_label_values(&["random_forest", "success"])
            .inc();

        let value = PREDICTIONS_TOTAL
            .with_label_values(&["random_forest", "success"])
            .get();
        assert!(value >= 1.0);
    }

    #[test]
    fn test_gather_metrics() {
        init_metrics().ok();
        PREDICTIONS_TOTAL
            .with_label_values(&["naive_bayes", "success"])
            .inc();

        let metrics = gather_metrics();
        assert!(!metrics.is_empty());
        assert!(metrics.contains("diabetes_screening_api"));
    }
}
