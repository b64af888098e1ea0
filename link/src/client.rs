//! HTTP client for the DiaSys API, with builder pattern.
//!
//! Translates typed requests into HTTP calls against one fixed base URL and
//! typed responses or classified errors back. The client is stateless: it
//! never stores tokens, callers pass the access token per call.

use std::time::Instant;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    api::DiasysApi,
    auth::AuthProvider,
    error::{DiasysLinkError, Result},
    models::{
        ApiEnvelope, ErrorBody, LoginRequest, LoginResponse, PredictRequest, PredictionResult,
        RefreshRequest, RefreshResponse, RegisterRequest,
    },
};

/// Production API origin
pub const DEFAULT_BASE_URL: &str = "https://diasys-api.duckdns.org";

/// Remote endpoints and their per-operation failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Register,
    Login,
    Refresh,
    Predict,
    Logout,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::Login => "/login",
            Self::Refresh => "/refresh",
            Self::Predict => "/predict",
            Self::Logout => "/logout",
        }
    }

    /// Message used when a failure body carries none.
    fn fallback_message(self) -> &'static str {
        match self {
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::Refresh => "Token refresh failed",
            Self::Predict => "Prediction failed",
            Self::Logout => "Logout failed",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Login => "LOGIN",
            Self::Refresh => "REFRESH",
            Self::Predict => "PREDICT",
            Self::Logout => "LOGOUT",
        }
    }
}

/// DiaSys API client.
///
/// Use [`DiasysClientBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use diasys_link::{DiasysApi, DiasysClient};
///
/// # async fn example() -> diasys_link::Result<()> {
/// let client = DiasysClient::builder()
///     .base_url("http://localhost:8000")
///     .build()?;
///
/// let login = client.login("alice@example.com", "secret123").await?;
/// println!("Welcome {}", login.user.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DiasysClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl DiasysClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> DiasysClientBuilder {
        DiasysClientBuilder::new()
    }

    /// Base URL every request is issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Send a prepared request and unwrap the envelope, classifying failures.
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
        auth: &AuthProvider,
    ) -> Result<ApiEnvelope<T>> {
        let start = Instant::now();
        let response = auth.apply_to_request(request).send().await.map_err(|e| {
            log::debug!("[{}] Transport failure after {:?}: {}", endpoint.tag(), start.elapsed(), e);
            DiasysLinkError::from(e)
        })?;

        let status = response.status();
        log::debug!(
            "[{}] HTTP response received in {:?}, status={}",
            endpoint.tag(),
            start.elapsed(),
            status
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| endpoint.fallback_message().to_string());
            log::debug!("[{}] Request failed: {}", endpoint.tag(), message);
            return Err(DiasysLinkError::from_response(
                auth.is_authenticated(),
                status.as_u16(),
                message,
            ));
        }

        let envelope = response.json::<ApiEnvelope<T>>().await?;
        log::debug!(
            "[{}] Completed in {:?} (status={})",
            endpoint.tag(),
            start.elapsed(),
            envelope.status
        );
        Ok(envelope)
    }
}

#[async_trait]
impl DiasysApi for DiasysClient {
    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value> {
        log::debug!("[REGISTER] Registering '{}'", request.email);
        let builder = self.http_client.post(self.url(Endpoint::Register)).json(request);
        let envelope: ApiEnvelope<serde_json::Value> =
            self.send(Endpoint::Register, builder, &AuthProvider::none()).await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        log::debug!("[LOGIN] Authenticating user '{}'", username);
        let form = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let builder = self.http_client.post(self.url(Endpoint::Login)).form(&form);
        let envelope: ApiEnvelope<LoginResponse> =
            self.send(Endpoint::Login, builder, &AuthProvider::none()).await?;
        envelope.into_data("login")
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let builder = self.http_client.post(self.url(Endpoint::Refresh)).json(&body);
        let envelope: ApiEnvelope<RefreshResponse> =
            self.send(Endpoint::Refresh, builder, &AuthProvider::none()).await?;
        envelope.into_data("refresh")
    }

    async fn predict(
        &self,
        request: &PredictRequest,
        access_token: &str,
    ) -> Result<PredictionResult> {
        let builder = self.http_client.post(self.url(Endpoint::Predict)).json(request);
        let envelope: ApiEnvelope<PredictionResult> = self
            .send(Endpoint::Predict, builder, &AuthProvider::bearer_token(access_token))
            .await?;
        envelope.into_data("predict")
    }

    async fn logout(&self, access_token: &str) -> Result<serde_json::Value> {
        let builder = self.http_client.post(self.url(Endpoint::Logout));
        let envelope: ApiEnvelope<serde_json::Value> = self
            .send(Endpoint::Logout, builder, &AuthProvider::bearer_token(access_token))
            .await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }
}

/// Builder for configuring [`DiasysClient`] instances.
#[derive(Debug)]
pub struct DiasysClientBuilder {
    base_url: String,
    user_agent: Option<String>,
}

impl DiasysClientBuilder {
    fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }

    /// Set the base URL of the DiaSys API (defaults to [`DEFAULT_BASE_URL`])
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DiasysClient> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DiasysLinkError::ConfigurationError("base_url is required".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DiasysLinkError::ConfigurationError(format!(
                "base_url must start with http:// or https:// (got '{}')",
                base_url
            )));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("diasys-link/{}", env!("CARGO_PKG_VERSION")));

        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DiasysLinkError::ConfigurationError(e.to_string()))?;

        Ok(DiasysClient {
            base_url,
            http_client,
        })
    }
}
