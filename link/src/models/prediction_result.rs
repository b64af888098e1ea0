use serde::{Deserialize, Serialize};

/// Prediction payload returned by `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub user: PredictionUser,
    pub prediction: Prediction,
    pub health_metrics: HealthMetrics,
    pub input_summary: InputSummary,
    pub model_info: ModelInfo,
    #[serde(default)]
    pub disclaimer: String,
    /// Server timestamp, passed through as sent
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionUser {
    pub name: String,
    pub email: String,
}

/// Model verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// Risk level label, e.g. "TINGGI" (high) or "RENDAH" (low)
    pub risk_level: String,
    pub status: String,
    /// Probability of diabetes, as reported by the model
    pub probability: f64,
    /// Pre-formatted probability, e.g. "72.5%"
    pub probability_text: String,
    /// "red" for high risk, "green" otherwise
    pub color_indicator: String,
    pub advice: String,
}

const HIGH_RISK_LEVEL: &str = "TINGGI";
const HIGH_RISK_COLOR: &str = "red";

impl Prediction {
    pub fn is_high_risk(&self) -> bool {
        self.color_indicator.eq_ignore_ascii_case(HIGH_RISK_COLOR)
            || self.risk_level.eq_ignore_ascii_case(HIGH_RISK_LEVEL)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub bmi_category: String,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub age: f64,
}

/// Echo of the submitted optional measurements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSummary {
    pub weight: f64,
    pub height: f64,
    pub insulin: f64,
    pub skin_thickness: f64,
    pub diabetes_pedigree: f64,
    pub pregnancies: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// Model accuracy in percent
    pub accuracy: f64,
    pub model_type: String,
}
