use crate::error::{AppError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Column-wise standardization transform.
///
/// Holds the per-feature mean and scale learned by the training pipeline;
/// at serving time every input row is transformed to (x - mean) / scale
/// before it reaches the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit a scaler on a feature matrix (rows are samples).
    ///
    /// Constant columns get a scale of 1.0 so transforming never divides
    /// by zero.
    pub fn fit(features: &Array2<f64>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(AppError::Inference(
                "cannot fit scaler on an empty feature matrix".to_string(),
            ));
        }

        let mean = features
            .mean_axis(Axis(0))
            .ok_or_else(|| AppError::Inference("failed to compute feature means".to_string()))?;

        let scale = features
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 { 1.0 } else { s });

        Ok(Self { mean, scale })
    }

    /// Transform a feature matrix through the learned standardization.
    pub fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if features.ncols() != self.mean.len() {
            return Err(AppError::Inference(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                features.ncols()
            )));
        }

        Ok((features - &self.mean) / &self.scale)
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_and_transform_standardizes_columns() {
        let x = array![[1.0, 10.0], [3.0, 30.0], [5.0, 50.0]];
        let scaler = StandardScaler::fit(&x).unwrap();

        let scaled = scaler.transform(&x).unwrap();

        // Column means become 0, extremes are symmetric
        for col in 0..2 {
            let mean: f64 = scaled.column(col).mean().unwrap();
            assert!(mean.abs() < 1e-12);
        }
        assert!((scaled[[0, 0]] + scaled[[2, 0]]).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_does_not_divide_by_zero() {
        let x = array![[4.0, 1.0], [4.0, 2.0], [4.0, 3.0]];
        let scaler = StandardScaler::fit(&x).unwrap();

        let scaled = scaler.transform(&x).unwrap();
        assert!(scaled.column(0).iter().all(|v| v.is_finite()));
        assert_eq!(scaled[[0, 0]], 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = StandardScaler::fit(&x).unwrap();

        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(scaler.transform(&wrong).is_err());
    }

    #[test]
    fn test_empty_matrix_is_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(StandardScaler::fit(&x).is_err());
    }

    #[test]
    fn test_n_features() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.n_features(), 3);
    }
}
