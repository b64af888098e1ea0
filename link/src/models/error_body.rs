use serde::{Deserialize, Serialize};

/// Body of a non-success response. Only `message` is relied upon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
