/// Machine learning module for diabetes screening
///
/// This module provides the serving half of the ML pipeline:
/// - The fixed 8-field patient feature schema and its extraction rules
/// - Classifier wrappers (Random Forest, Gaussian Naive Bayes)
/// - Column standardization for endpoints trained on scaled features
/// - Artifact loading with per-endpoint degraded mode
pub mod artifacts;
pub mod classifier;
pub mod features;
pub mod scaler;

pub use artifacts::{
    load_classifier, load_scaler, save_classifier, save_scaler, ClassifierArtifact,
    LoadedEndpoint, ModelRegistry, ModelSlot, SLOT_NAIVE_BAYES, SLOT_RANDOM_FOREST, SLOT_SINGLE,
};
pub use classifier::{
    diagnosis_label, Classifier, ModelMetadata, ModelType, NaiveBayesModel, RandomForestModel,
};
pub use features::{PatientRecord, FEATURE_NAMES};
pub use scaler::StandardScaler;
