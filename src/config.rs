use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Deployment configuration
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Model artifact configuration
    pub models: ModelsConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: DIAB_API)
            .add_source(
                config::Environment::with_prefix("DIAB_API")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                http_port: default_http_port(),
            },
            deployment: DeploymentConfig::default(),
            models: ModelsConfig::default(),
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                prometheus_enabled: default_true(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeploymentConfig {
    /// Which prediction surface this process serves
    #[serde(default)]
    pub mode: ServiceMode,
}

/// Deployment variant for the prediction surface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMode {
    /// Two classifiers behind /diabetes-cek-rf and /diabetes-cek-nb, each
    /// with its own feature scaler
    #[default]
    Dual,
    /// One classifier behind /diabetes-cek, raw features
    Single,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding the serialized artifacts
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,

    /// Random Forest endpoint artifacts (dual mode)
    #[serde(default = "default_random_forest")]
    pub random_forest: EndpointModelConfig,

    /// Naive Bayes endpoint artifacts (dual mode)
    #[serde(default = "default_naive_bayes")]
    pub naive_bayes: EndpointModelConfig,

    /// Single endpoint artifact (single mode, no scaler)
    #[serde(default = "default_single")]
    pub single: EndpointModelConfig,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            random_forest: default_random_forest(),
            naive_bayes: default_naive_bayes(),
            single: default_single(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointModelConfig {
    /// Classifier artifact file name, relative to `models.dir`
    pub model_file: String,

    /// Scaler artifact file name, relative to `models.dir`
    pub scaler_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_model_dir() -> PathBuf {
    "model".into()
}

fn default_random_forest() -> EndpointModelConfig {
    EndpointModelConfig {
        model_file: "diabetes_rf.bin".to_string(),
        scaler_file: Some("scaler_rf.bin".to_string()),
    }
}

fn default_naive_bayes() -> EndpointModelConfig {
    EndpointModelConfig {
        model_file: "diabetes_nb.bin".to_string(),
        scaler_file: Some("scaler_nb.bin".to_string()),
    }
}

fn default_single() -> EndpointModelConfig {
    EndpointModelConfig {
        model_file: "diabetes.bin".to_string(),
        scaler_file: None,
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_service_mode_default() {
        assert_eq!(ServiceMode::default(), ServiceMode::Dual);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.deployment.mode, ServiceMode::Dual);
        assert_eq!(config.models.dir, PathBuf::from("model"));
        assert_eq!(config.models.random_forest.model_file, "diabetes_rf.bin");
        assert_eq!(
            config.models.naive_bayes.scaler_file.as_deref(),
            Some("scaler_nb.bin")
        );
        assert!(config.models.single.scaler_file.is_none());
    }
}
