use crate::error::{AppError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Required input fields, in the column order the classifiers were trained on.
///
/// This constant is the single source of truth for feature ordering; the
/// order of keys in the submitted JSON object is irrelevant.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// One patient's screening record: the eight numeric attributes every
/// prediction request must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl PatientRecord {
    /// Extract a record from a request body.
    ///
    /// The body must be a JSON object carrying all of [`FEATURE_NAMES`].
    /// A missing key fails with `MissingField` naming that key; a value that
    /// does not convert to a number fails with the generic `InvalidValue`.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            AppError::Validation("request body must be a JSON object".to_string())
        })?;

        let mut values = [0.0f64; 8];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = object
                .get(name)
                .ok_or_else(|| AppError::MissingField(name.to_string()))?;
            *slot = numeric_value(raw)?;
        }

        let [pregnancies, glucose, blood_pressure, skin_thickness, insulin, bmi, diabetes_pedigree_function, age] =
            values;

        Ok(Self {
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        })
    }

    /// Assemble the ordered feature vector as a 1x8 row matrix.
    pub fn to_feature_row(&self) -> Result<Array2<f64>> {
        let values = vec![
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ];

        Array2::from_shape_vec((1, FEATURE_NAMES.len()), values)
            .map_err(|e| AppError::Internal(format!("Failed to create feature array: {}", e)))
    }
}

/// Convert a JSON value to f64 the way the endpoints accept input: JSON
/// numbers pass through, strings are parsed as floats, everything else is
/// rejected.
fn numeric_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(AppError::InvalidValue),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| AppError::InvalidValue),
        _ => Err(AppError::InvalidValue),
    }
}
