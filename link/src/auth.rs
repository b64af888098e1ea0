//! Authentication provider for DiaSys API requests.
//!
//! Attaches the access token as a bearer credential to the requests that need
//! one (predict, logout).

/// Credential attached to an outgoing request.
///
/// # Examples
///
/// ```rust
/// use diasys_link::AuthProvider;
///
/// let auth = AuthProvider::bearer_token("eyJhbGc...");
/// assert!(auth.is_authenticated());
///
/// let anonymous = AuthProvider::none();
/// assert!(!anonymous.is_authenticated());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum AuthProvider {
    /// `Authorization: Bearer <token>`
    BearerToken(String),

    /// No credential (register, login, refresh)
    None,
}

impl AuthProvider {
    /// Create bearer token authentication
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// No authentication
    pub fn none() -> Self {
        Self::None
    }

    /// Attach the Authorization header, if any, to an HTTP request builder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::BearerToken(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }

    /// Check if a credential is configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

// Tokens must never end up in logs through `{:?}`.
impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BearerToken(_) => write!(f, "AuthProvider::BearerToken(<redacted>)"),
            Self::None => write!(f, "AuthProvider::None"),
        }
    }
}
