//! # diasys-link
//!
//! Client library for the DiaSys diabetes-risk screening service.
//!
//! The crate is split along the same seams as the service itself:
//!
//! - [`DiasysClient`]: stateless HTTP wrapper around the remote API
//!   (register, login, refresh, predict, logout), implementing [`DiasysApi`].
//! - [`TokenStore`]: persistence for the access/refresh token pair and the
//!   cached user identity. [`MemoryTokenStore`] is provided here; durable
//!   stores live with the application that owns the storage.
//! - [`SessionManager`]: composes the two into login-state queries, the
//!   refresh-with-retry protocol and logout, broadcasting a typed
//!   [`SessionEvent`] whenever the session state changes.
//!
//! ```rust,no_run
//! use diasys_link::{DiasysClient, MemoryTokenStore, PredictRequest, SessionManager};
//!
//! # async fn example() -> diasys_link::Result<()> {
//! let client = DiasysClient::builder()
//!     .base_url("https://diasys-api.duckdns.org")
//!     .build()?;
//! let session = SessionManager::new(client, MemoryTokenStore::new());
//!
//! session.login("alice@example.com", "secret123").await?;
//!
//! let request = PredictRequest::new(168.0, 72.0, 85.5, 1.65, 50.0);
//! let result = session.predict(&request).await?;
//! println!("risk: {}", result.prediction.risk_level);
//!
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod session;
pub mod token_store;

pub use api::DiasysApi;
pub use auth::AuthProvider;
pub use client::{DiasysClient, DiasysClientBuilder, DEFAULT_BASE_URL};
pub use error::{DiasysLinkError, Result};
pub use events::{SessionEvent, SessionEventHandlers};
pub use models::{
    ApiEnvelope, LoginResponse, PredictRequest, PredictionResult, RegisterRequest,
    SessionState, TokenPair, UserIdentity,
};
pub use session::SessionManager;
pub use token_store::{MemoryTokenStore, TokenStore};
