//! Token storage abstraction for DiaSys clients.
//!
//! A [`TokenStore`] persists the access/refresh token pair and the cached
//! user identity. Only canonical state is stored: whether the user is logged
//! in and what name to display are derived from it, never kept as separate
//! flags that could drift out of sync.
//!
//! Implementations decide where the state lives (a file, a keychain, memory).
//! No expiry is tracked locally; the server rejects expired tokens on use.

use crate::error::Result;
use crate::models::{TokenPair, UserIdentity};

/// Trait for token storage backends.
///
/// # Invariant
///
/// [`clear`](TokenStore::clear) removes the tokens *and* the cached identity.
/// An identity must never outlive the session it belongs to.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use diasys_link::{TokenPair, TokenStore, UserIdentity};
///
/// struct KeychainStore;
///
/// impl TokenStore for KeychainStore {
///     fn save_tokens(&mut self, tokens: &TokenPair) -> Result<()> { Ok(()) }
///     fn save_access_token(&mut self, access_token: &str) -> Result<()> { Ok(()) }
///     fn access_token(&self) -> Result<Option<String>> { Ok(None) }
///     fn refresh_token(&self) -> Result<Option<String>> { Ok(None) }
///     fn save_identity(&mut self, identity: &UserIdentity) -> Result<()> { Ok(()) }
///     fn identity(&self) -> Result<Option<UserIdentity>> { Ok(None) }
///     fn clear(&mut self) -> Result<()> { Ok(()) }
/// }
/// ```
pub trait TokenStore: Send {
    /// Overwrite both tokens unconditionally.
    fn save_tokens(&mut self, tokens: &TokenPair) -> Result<()>;

    /// Replace the access token only (after a successful refresh).
    fn save_access_token(&mut self, access_token: &str) -> Result<()>;

    /// Stored access token, or `None` if never set or cleared.
    fn access_token(&self) -> Result<Option<String>>;

    /// Stored refresh token, or `None` if never set or cleared.
    fn refresh_token(&self) -> Result<Option<String>>;

    /// Overwrite the cached user identity.
    fn save_identity(&mut self, identity: &UserIdentity) -> Result<()>;

    /// Cached user identity, if any.
    fn identity(&self) -> Result<Option<UserIdentity>>;

    /// Remove tokens and identity. Idempotent.
    fn clear(&mut self) -> Result<()>;

    /// Re-read durable state that another process may have changed.
    ///
    /// Stores without an external backing have nothing to do.
    fn reload(&mut self) -> Result<()> {
        Ok(())
    }

    /// Both tokens, if both are present.
    fn tokens(&self) -> Result<Option<TokenPair>> {
        match (self.access_token()?, self.refresh_token()?) {
            (Some(access), Some(refresh)) => Ok(Some(TokenPair::new(access, refresh))),
            _ => Ok(None),
        }
    }
}

/// In-memory token store for tests and short-lived sessions.
///
/// Nothing survives the process.
///
/// # Example
///
/// ```rust
/// use diasys_link::{MemoryTokenStore, TokenPair, TokenStore};
///
/// let mut store = MemoryTokenStore::new();
/// store.save_tokens(&TokenPair::new("access", "refresh")).unwrap();
/// assert_eq!(store.access_token().unwrap().as_deref(), Some("access"));
///
/// store.clear().unwrap();
/// assert_eq!(store.access_token().unwrap(), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    access_token: Option<String>,
    refresh_token: Option<String>,
    identity: Option<UserIdentity>,
}

impl MemoryTokenStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session
    pub fn with_session(tokens: TokenPair, identity: Option<UserIdentity>) -> Self {
        Self {
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            identity,
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save_tokens(&mut self, tokens: &TokenPair) -> Result<()> {
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        Ok(())
    }

    fn save_access_token(&mut self, access_token: &str) -> Result<()> {
        self.access_token = Some(access_token.to_string());
        Ok(())
    }

    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.access_token.clone())
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.refresh_token.clone())
    }

    fn save_identity(&mut self, identity: &UserIdentity) -> Result<()> {
        self.identity = Some(identity.clone());
        Ok(())
    }

    fn identity(&self) -> Result<Option<UserIdentity>> {
        Ok(self.identity.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.access_token = None;
        self.refresh_token = None;
        self.identity = None;
        Ok(())
    }
}
