use serde::{Deserialize, Serialize};

/// Refresh response payload. Only the new access token is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
