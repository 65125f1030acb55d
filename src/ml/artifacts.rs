use crate::config::{EndpointModelConfig, ModelsConfig, ServiceMode};
use crate::error::{AppError, Result};
use crate::ml::classifier::{Classifier, ModelMetadata, ModelType, NaiveBayesModel, RandomForestModel};
use crate::ml::features::PatientRecord;
use crate::ml::scaler::StandardScaler;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info, warn};

/// Serialized classifier artifact.
///
/// The enum tag makes artifact files self-describing, so the loader does not
/// need out-of-band knowledge of which algorithm a file holds.
#[derive(Serialize, Deserialize)]
pub enum ClassifierArtifact {
    RandomForest(RandomForestModel),
    NaiveBayes(NaiveBayesModel),
}

impl ClassifierArtifact {
    pub fn predict(&self, features: &ndarray::Array2<f64>) -> Result<Vec<usize>> {
        match self {
            ClassifierArtifact::RandomForest(m) => m.predict(features),
            ClassifierArtifact::NaiveBayes(m) => m.predict(features),
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        match self {
            ClassifierArtifact::RandomForest(m) => m.metadata(),
            ClassifierArtifact::NaiveBayes(m) => m.metadata(),
        }
    }

    pub fn model_type(&self) -> ModelType {
        match self {
            ClassifierArtifact::RandomForest(_) => ModelType::RandomForest,
            ClassifierArtifact::NaiveBayes(_) => ModelType::NaiveBayes,
        }
    }
}

/// Write a classifier artifact to disk.
///
/// Serving never calls this; it exists for the training pipeline and tests.
pub fn save_classifier(path: &Path, artifact: &ClassifierArtifact) -> Result<()> {
    let file = File::create(path)?;
    bincode::serialize_into(BufWriter::new(file), artifact)?;
    Ok(())
}

/// Read a classifier artifact from disk
pub fn load_classifier(path: &Path) -> Result<ClassifierArtifact> {
    let file = File::open(path)?;
    let artifact: ClassifierArtifact = bincode::deserialize_from(BufReader::new(file))?;

    debug!(
        path = %path.display(),
        model = %artifact.metadata().name,
        n_features = artifact.metadata().n_features,
        "Classifier artifact loaded"
    );

    Ok(artifact)
}

/// Write a scaler artifact to disk
pub fn save_scaler(path: &Path, scaler: &StandardScaler) -> Result<()> {
    let file = File::create(path)?;
    bincode::serialize_into(BufWriter::new(file), scaler)?;
    Ok(())
}

/// Read a scaler artifact from disk
pub fn load_scaler(path: &Path) -> Result<StandardScaler> {
    let file = File::open(path)?;
    let scaler: StandardScaler = bincode::deserialize_from(BufReader::new(file))?;

    debug!(
        path = %path.display(),
        n_features = scaler.n_features(),
        "Scaler artifact loaded"
    );

    Ok(scaler)
}

/// A classifier and its optional scaler, ready to serve predictions
pub struct LoadedEndpoint {
    classifier: ClassifierArtifact,
    scaler: Option<StandardScaler>,
}

impl LoadedEndpoint {
    pub fn new(classifier: ClassifierArtifact, scaler: Option<StandardScaler>) -> Self {
        Self { classifier, scaler }
    }

    /// Run one record through the (optional) scaler and the classifier,
    /// returning the predicted class index.
    pub fn predict(&self, record: &PatientRecord) -> Result<usize> {
        let row = record.to_feature_row()?;

        let row = match &self.scaler {
            Some(scaler) => {
                let scaled = scaler.transform(&row)?;
                debug!(features = ?scaled, "Feature vector after scaling");
                scaled
            }
            None => row,
        };

        let classes = self.classifier.predict(&row)?;
        classes
            .first()
            .copied()
            .ok_or_else(|| AppError::Inference("classifier returned no prediction".to_string()))
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.classifier.metadata()
    }
}

/// One prediction endpoint's artifacts; `Unavailable` when the startup load
/// failed and the endpoint must answer with a service error.
pub struct ModelSlot {
    display_name: String,
    endpoint: Option<LoadedEndpoint>,
}

impl ModelSlot {
    /// Load a slot from configured artifact paths.
    ///
    /// A failure leaves the slot unavailable and the process running; the
    /// error is logged with its trigger text.
    pub fn load(display_name: &str, dir: &Path, config: &EndpointModelConfig) -> Self {
        let model_path = dir.join(&config.model_file);

        let loaded = load_classifier(&model_path).and_then(|classifier| {
            let scaler = match &config.scaler_file {
                Some(file) => Some(load_scaler(&dir.join(file))?),
                None => None,
            };
            Ok(LoadedEndpoint::new(classifier, scaler))
        });

        match loaded {
            Ok(endpoint) => {
                info!(
                    model = display_name,
                    path = %model_path.display(),
                    scaled = endpoint.has_scaler(),
                    "Model artifacts loaded"
                );
                Self {
                    display_name: display_name.to_string(),
                    endpoint: Some(endpoint),
                }
            }
            Err(e) => {
                warn!(
                    model = display_name,
                    path = %model_path.display(),
                    error = %e,
                    "Failed to load model artifacts, endpoint will be unavailable"
                );
                Self {
                    display_name: display_name.to_string(),
                    endpoint: None,
                }
            }
        }
    }

    /// Construct an already-loaded slot (tests, embedded models)
    pub fn loaded(display_name: &str, endpoint: LoadedEndpoint) -> Self {
        Self {
            display_name: display_name.to_string(),
            endpoint: Some(endpoint),
        }
    }

    /// Construct an unavailable slot
    pub fn unavailable(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            endpoint: None,
        }
    }

    /// Borrow the loaded endpoint, or fail with the fixed service error
    pub fn get(&self) -> Result<&LoadedEndpoint> {
        self.endpoint
            .as_ref()
            .ok_or_else(|| AppError::ArtifactUnavailable(self.display_name.clone()))
    }

    pub fn is_loaded(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Slot key for the Random Forest endpoint
pub const SLOT_RANDOM_FOREST: &str = "random_forest";
/// Slot key for the Naive Bayes endpoint
pub const SLOT_NAIVE_BAYES: &str = "naive_bayes";
/// Slot key for the single-model endpoint
pub const SLOT_SINGLE: &str = "diabetes";

/// All model slots this process serves, built once at startup and shared
/// read-only across requests.
pub struct ModelRegistry {
    slots: BTreeMap<String, ModelSlot>,
}

impl ModelRegistry {
    /// Load every slot the deployment mode requires
    pub fn load(config: &ModelsConfig, mode: ServiceMode) -> Self {
        let mut slots = BTreeMap::new();

        match mode {
            ServiceMode::Dual => {
                slots.insert(
                    SLOT_RANDOM_FOREST.to_string(),
                    ModelSlot::load("Random Forest", &config.dir, &config.random_forest),
                );
                slots.insert(
                    SLOT_NAIVE_BAYES.to_string(),
                    ModelSlot::load("Naive Bayes", &config.dir, &config.naive_bayes),
                );
            }
            ServiceMode::Single => {
                slots.insert(
                    SLOT_SINGLE.to_string(),
                    ModelSlot::load("Diabetes", &config.dir, &config.single),
                );
            }
        }

        Self { slots }
    }

    /// Build a registry from explicit slots (tests)
    pub fn from_slots(slots: Vec<(String, ModelSlot)>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    /// Borrow a loaded endpoint by slot key
    pub fn endpoint(&self, key: &str) -> Result<&LoadedEndpoint> {
        let slot = self
            .slots
            .get(key)
            .ok_or_else(|| AppError::Internal(format!("unknown model slot '{}'", key)))?;
        slot.get()
    }

    /// Per-slot availability, keyed by slot name
    pub fn availability(&self) -> BTreeMap<String, bool> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.is_loaded()))
            .collect()
    }
}
