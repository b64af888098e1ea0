use serde::{Deserialize, Serialize};

use crate::error::{DiasysLinkError, Result};

/// Wrapper around every successful response body: `{status, message, data}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    /// Server-side status string (e.g. "success")
    pub status: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Operation payload
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload of an operation that must return one.
    pub fn into_data(self, operation: &str) -> Result<T> {
        self.data.ok_or_else(|| {
            DiasysLinkError::SerializationError(format!(
                "{} response is missing its data payload",
                operation
            ))
        })
    }
}
