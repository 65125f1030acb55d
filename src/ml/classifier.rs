use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::naive_bayes::gaussian::GaussianNB;

/// Supported classifier algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    RandomForest,
    NaiveBayes,
}

impl ModelType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::RandomForest => "Random Forest",
            ModelType::NaiveBayes => "Naive Bayes",
        }
    }
}

/// Metadata carried alongside a trained model inside its artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Model version
    pub version: String,

    /// Algorithm
    pub model_type: ModelType,

    /// When the model was trained
    pub trained_at: DateTime<Utc>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Number of input features
    pub n_features: usize,
}

impl ModelMetadata {
    fn new(model_type: ModelType, n_training_samples: usize, n_features: usize) -> Self {
        Self {
            name: model_type.display_name().to_string(),
            version: "1.0".to_string(),
            model_type,
            trained_at: Utc::now(),
            n_training_samples,
            n_features,
        }
    }
}

/// Trait for binary classifiers served by the prediction endpoints
pub trait Classifier: Send + Sync {
    /// Predict class labels for each input row
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>>;

    /// Get model metadata
    fn metadata(&self) -> &ModelMetadata;

    /// Get model type
    fn model_type(&self) -> ModelType;
}

fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
    let shape = arr.shape();
    let data: Vec<f64> = arr.iter().copied().collect();
    DenseMatrix::new(shape[0], shape[1], data, false)
}

fn check_training_input(features: &Array2<f64>, labels: &[usize]) -> Result<()> {
    if features.nrows() == 0 {
        return Err(AppError::Inference(
            "cannot train on an empty feature matrix".to_string(),
        ));
    }
    if features.nrows() != labels.len() {
        return Err(AppError::Inference(format!(
            "feature rows ({}) and labels ({}) differ",
            features.nrows(),
            labels.len()
        )));
    }
    Ok(())
}

/// Random Forest classifier
#[derive(Serialize, Deserialize)]
pub struct RandomForestModel {
    /// Model metadata
    metadata: ModelMetadata,

    /// Trained model
    model: RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

impl RandomForestModel {
    /// Train a Random Forest on a feature matrix and class labels
    pub fn train(features: &Array2<f64>, labels: &[usize]) -> Result<Self> {
        check_training_input(features, labels)?;

        let x = ndarray_to_densematrix(features);
        let y: Vec<i32> = labels.iter().map(|&l| l as i32).collect();

        let model =
            RandomForestClassifier::fit(&x, &y, RandomForestClassifierParameters::default())
                .map_err(|e| {
                    AppError::Inference(format!("Failed to train random forest: {}", e))
                })?;

        Ok(Self {
            metadata: ModelMetadata::new(ModelType::RandomForest, labels.len(), features.ncols()),
            model,
        })
    }
}

impl Classifier for RandomForestModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let x = ndarray_to_densematrix(features);
        let predictions = self
            .model
            .predict(&x)
            .map_err(|e| AppError::Inference(format!("Prediction failed: {}", e)))?;

        Ok(predictions.iter().map(|&p| p as usize).collect())
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn model_type(&self) -> ModelType {
        ModelType::RandomForest
    }
}

/// Gaussian Naive Bayes classifier
#[derive(Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Model metadata
    metadata: ModelMetadata,

    /// Trained model
    model: GaussianNB<f64, usize, DenseMatrix<f64>, Vec<usize>>,
}

impl NaiveBayesModel {
    /// Train a Gaussian Naive Bayes model on a feature matrix and class labels
    pub fn train(features: &Array2<f64>, labels: &[usize]) -> Result<Self> {
        check_training_input(features, labels)?;

        let x = ndarray_to_densematrix(features);
        let y = labels.to_vec();

        let model = GaussianNB::fit(&x, &y, Default::default())
            .map_err(|e| AppError::Inference(format!("Failed to train naive bayes: {}", e)))?;

        Ok(Self {
            metadata: ModelMetadata::new(ModelType::NaiveBayes, labels.len(), features.ncols()),
            model,
        })
    }
}

impl Classifier for NaiveBayesModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let x = ndarray_to_densematrix(features);
        let predictions = self
            .model
            .predict(&x)
            .map_err(|e| AppError::Inference(format!("Prediction failed: {}", e)))?;

        Ok(predictions)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn model_type(&self) -> ModelType {
        ModelType::NaiveBayes
    }
}

/// Map a predicted class index to the diagnosis string returned to clients
pub fn diagnosis_label(class_index: usize) -> &'static str {
    match class_index {
        0 => "Patient does not have diabetes",
        1 => "Patient has diabetes",
        _ => "Diagnosis unknown",
    }
}
