use serde::{Deserialize, Serialize};

/// Body of `POST /refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
