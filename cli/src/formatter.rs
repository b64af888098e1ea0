//! Output formatters for command results
//!
//! Renders prediction results, session status and plain messages either as
//! human-readable text (colored by risk when enabled) or as JSON.

use colored::{Color, Colorize};
use diasys_link::{PredictionResult, SessionState};
use serde_json::json;

use crate::error::Result;

/// Width of the label column in text output
const LABEL_WIDTH: usize = 16;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Formats command results for display
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn row(label: &str, value: impl std::fmt::Display) -> String {
        format!("  {:<width$}{}", label, value, width = LABEL_WIDTH)
    }

    /// Format a prediction result
    pub fn format_prediction(&self, result: &PredictionResult) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(result)?);
        }

        let prediction = &result.prediction;
        let metrics = &result.health_metrics;
        let risk_color = if prediction.is_high_risk() {
            Color::Red
        } else {
            Color::Green
        };

        let mut lines = vec![
            format!(
                "{} {} <{}>",
                self.heading("Diabetes risk screening for"),
                result.user.name,
                result.user.email
            ),
            String::new(),
            Self::row(
                "Risk level",
                format!("{} ({})", self.paint(&prediction.risk_level, risk_color), prediction.status),
            ),
            Self::row("Probability", &prediction.probability_text),
            String::new(),
            self.heading("Health metrics"),
            Self::row("BMI", format!("{} ({})", metrics.bmi, metrics.bmi_category)),
            Self::row("Glucose", format!("{} mg/dL", metrics.glucose)),
            Self::row("Blood pressure", format!("{} mmHg", metrics.blood_pressure)),
            Self::row("Age", format!("{} years", metrics.age)),
            String::new(),
            self.heading("Advice"),
            format!("  {}", prediction.advice),
            String::new(),
            format!(
                "Model: {} (accuracy {}%)",
                result.model_info.model_type, result.model_info.accuracy
            ),
        ];

        if !result.timestamp.is_empty() {
            lines.push(format!("Screened at: {}", result.timestamp));
        }
        if !result.disclaimer.is_empty() {
            lines.push(String::new());
            lines.push(result.disclaimer.clone());
        }

        Ok(lines.join("\n"))
    }

    /// Format the current session state
    pub fn format_status(&self, state: &SessionState, server_url: &str) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value = json!({
                "server": server_url,
                "logged_in": state.is_logged_in(),
                "user": state.user(),
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let status = match state {
            SessionState::LoggedOut => {
                format!("{} (run `diasys login`)", self.paint("Not logged in", Color::Yellow))
            },
            SessionState::LoggedIn { user: Some(user) } => format!(
                "{} as {} <{}>",
                self.paint("Logged in", Color::Green),
                user.name,
                user.email
            ),
            SessionState::LoggedIn { user: None } => self.paint("Logged in", Color::Green),
        };

        Ok(format!("{}\n{}", status, Self::row("Server", server_url).trim_start()))
    }

    /// Format a one-line confirmation message
    pub fn format_message(&self, message: &str) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&json!({ "message": message }))?);
        }
        Ok(message.to_string())
    }
}
