use serde::{Deserialize, Serialize};

/// Login request body, sent as `application/x-www-form-urlencoded`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub username: String,
    /// Account password
    pub password: String,
}
