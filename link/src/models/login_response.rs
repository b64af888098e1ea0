use serde::{Deserialize, Serialize};

use super::token_pair::TokenPair;
use super::user_identity::UserIdentity;

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    /// Bearer token for subsequent API calls
    pub access_token: String,
    /// Longer-lived token exchanged for new access tokens
    pub refresh_token: String,
    /// Token scheme, normally "bearer"
    #[serde(default)]
    pub token_type: String,
    /// Authenticated user
    pub user: UserIdentity,
    /// Lifetimes as reported by the server (display only)
    #[serde(default)]
    pub expires_in: TokenExpiry,
}

/// Token lifetimes as reported by the server, e.g. "30 minutes".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenExpiry {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl LoginResponse {
    /// The token pair to persist.
    pub fn token_pair(&self) -> TokenPair {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
    }
}
