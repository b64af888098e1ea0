use serde::{Deserialize, Serialize};

use crate::error::{DiasysLinkError, Result};

/// Clinical measurements submitted to `POST /predict`.
///
/// Glucose, blood pressure, weight, height and age are required; the remaining
/// four measurements default to 0 when unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictRequest {
    /// Plasma glucose (mg/dL)
    pub glucose: f64,
    /// Diastolic blood pressure (mmHg)
    pub blood_pressure: f64,
    /// Body weight (kg)
    pub weight: f64,
    /// Height (m)
    pub height: f64,
    /// Age (years)
    pub age: f64,
    /// Serum insulin (mu U/ml)
    pub insulin: f64,
    /// Triceps skin fold thickness (mm)
    pub skin_thickness: f64,
    pub diabetes_pedigree_function: f64,
    pub pregnancies: f64,
}

const MAX_AGE: f64 = 120.0;
const MAX_DIABETES_PEDIGREE: f64 = 2.5;
const MAX_PREGNANCIES: f64 = 20.0;

impl PredictRequest {
    /// Build a request from the required measurements; optional ones are 0.
    pub fn new(glucose: f64, blood_pressure: f64, weight: f64, height: f64, age: f64) -> Self {
        Self {
            glucose,
            blood_pressure,
            weight,
            height,
            age,
            insulin: 0.0,
            skin_thickness: 0.0,
            diabetes_pedigree_function: 0.0,
            pregnancies: 0.0,
        }
    }

    pub fn with_insulin(mut self, insulin: f64) -> Self {
        self.insulin = insulin;
        self
    }

    pub fn with_skin_thickness(mut self, skin_thickness: f64) -> Self {
        self.skin_thickness = skin_thickness;
        self
    }

    pub fn with_diabetes_pedigree_function(mut self, value: f64) -> Self {
        self.diabetes_pedigree_function = value;
        self
    }

    pub fn with_pregnancies(mut self, pregnancies: f64) -> Self {
        self.pregnancies = pregnancies;
        self
    }

    /// Check the measurements against the input form's bounds.
    ///
    /// Every value must be finite and non-negative, zero included. Age,
    /// pedigree function and pregnancies are also capped.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("glucose", self.glucose),
            ("blood_pressure", self.blood_pressure),
            ("weight", self.weight),
            ("height", self.height),
            ("age", self.age),
            ("insulin", self.insulin),
            ("skin_thickness", self.skin_thickness),
            ("diabetes_pedigree_function", self.diabetes_pedigree_function),
            ("pregnancies", self.pregnancies),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number", name)));
            }
        }

        if self.age > MAX_AGE {
            return Err(invalid(format!("age must be at most {}", MAX_AGE)));
        }
        if self.diabetes_pedigree_function > MAX_DIABETES_PEDIGREE {
            return Err(invalid(format!(
                "diabetes_pedigree_function must be at most {}",
                MAX_DIABETES_PEDIGREE
            )));
        }
        if self.pregnancies > MAX_PREGNANCIES {
            return Err(invalid(format!("pregnancies must be at most {}", MAX_PREGNANCIES)));
        }

        Ok(())
    }
}

fn invalid(message: String) -> DiasysLinkError {
    DiasysLinkError::ValidationError(message)
}
