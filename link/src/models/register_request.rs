use serde::{Deserialize, Serialize};

/// Registration request body.
///
/// Validation (password strength, matching confirmation, duplicate email) is
/// left entirely to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
