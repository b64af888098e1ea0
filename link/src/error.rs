//! Error types for the DiaSys client library.
//!
//! Failures are classified once, at the API client boundary, into a tagged
//! [`DiasysLinkError`]. Callers (the session manager in particular) branch on
//! the variant and never inspect message text.

use thiserror::Error;

/// Result type for diasys-link operations
pub type Result<T> = std::result::Result<T, DiasysLinkError>;

/// Errors returned by the API client, the token stores and the session manager.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiasysLinkError {
    /// Transport-level failure (DNS, connect, TLS, broken body)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Bearer credential rejected by the server (expired or revoked access token)
    #[error("{0}")]
    AuthExpired(String),

    /// Credentials rejected (bad password, unusable refresh token)
    #[error("{0}")]
    Unauthorized(String),

    /// Input rejected, either locally or by the server
    #[error("{0}")]
    ValidationError(String),

    /// Any other non-success response
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Client misconfiguration (missing base URL, bad HTTP client settings)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Token store could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// No access token is stored; no request was sent
    #[error("You must log in first")]
    NotLoggedIn,

    /// The access token expired and could not be refreshed
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// A prediction request is already outstanding for this session
    #[error("A prediction is already in progress")]
    RequestInFlight,
}

impl DiasysLinkError {
    /// Map a non-success HTTP response to an error kind.
    ///
    /// `bearer` is true for calls that carried an access token (predict,
    /// logout). For those, a 401 or a message that talks about the token
    /// means the access token is no longer usable.
    pub fn from_response(bearer: bool, status_code: u16, message: String) -> Self {
        if bearer && (status_code == 401 || mentions_token_expiry(&message)) {
            return Self::AuthExpired(message);
        }

        match status_code {
            401 | 403 => Self::Unauthorized(message),
            400 | 422 => Self::ValidationError(message),
            _ => Self::ServerError {
                status_code,
                message,
            },
        }
    }

    /// True when the failure can be recovered by refreshing the access token.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    /// HTTP status of the failed response, where one is known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServerError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

fn mentions_token_expiry(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("token") || lowered.contains("expired")
}

impl From<reqwest::Error> for DiasysLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::SerializationError(err.to_string())
        } else if err.is_builder() {
            Self::ConfigurationError(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DiasysLinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
