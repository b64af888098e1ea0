//! The remote API contract.
//!
//! [`SessionManager`](crate::SessionManager) is generic over this trait so the
//! transport can be substituted; [`DiasysClient`](crate::DiasysClient) is the
//! HTTP implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    LoginResponse, PredictRequest, PredictionResult, RefreshResponse, RegisterRequest,
};

/// Operations exposed by the DiaSys prediction service.
///
/// Each call is a single attempt: no retries, no backoff. Non-success
/// responses come back as a classified [`DiasysLinkError`](crate::DiasysLinkError).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiasysApi: Send + Sync {
    /// `POST /register`. The payload shape is defined by the server.
    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value>;

    /// `POST /login` with form-urlencoded credentials.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;

    /// `POST /refresh`, exchanging a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse>;

    /// `POST /predict` with bearer authentication.
    async fn predict(
        &self,
        request: &PredictRequest,
        access_token: &str,
    ) -> Result<PredictionResult>;

    /// `POST /logout` with bearer authentication.
    async fn logout(&self, access_token: &str) -> Result<serde_json::Value>;
}
