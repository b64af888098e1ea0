//! Session management: login state, token refresh and logout.
//!
//! [`SessionManager`] composes a [`DiasysApi`] implementation with a
//! [`TokenStore`]. It is meant to be owned by one composition root and shared
//! with whatever needs the session, instead of every component reading the
//! token store directly.
//!
//! Policies implemented here:
//!
//! - The session is logged in iff a non-empty access token is stored.
//!   Nothing is validated against the server until a request fails.
//! - A failed refresh tears down the whole session (fail-closed).
//! - Logout always succeeds locally, whatever the server says.
//! - A prediction rejected because of an expired access token is retried
//!   exactly once, after a successful refresh.
//! - Only one prediction may be outstanding at a time; a second concurrent
//!   request is rejected with [`DiasysLinkError::RequestInFlight`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::{
    api::DiasysApi,
    error::{DiasysLinkError, Result},
    events::{SessionEvent, SessionEventHandlers},
    models::{PredictRequest, PredictionResult, RegisterRequest, SessionState, TokenPair, UserIdentity},
    token_store::TokenStore,
};

/// Explicit session object over an API client and a token store.
pub struct SessionManager<A, S> {
    api: A,
    store: Mutex<S>,
    handlers: RwLock<SessionEventHandlers>,
    predict_in_flight: AtomicBool,
}

impl<A, S> std::fmt::Debug for SessionManager<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("predict_in_flight", &self.predict_in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<A: DiasysApi, S: TokenStore> SessionManager<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store: Mutex::new(store),
            handlers: RwLock::new(SessionEventHandlers::new()),
            predict_in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the registered event listeners
    pub fn with_event_handlers(self, handlers: SessionEventHandlers) -> Self {
        Self {
            handlers: RwLock::new(handlers),
            ..self
        }
    }

    /// Register an additional listener for session events.
    pub fn subscribe(&self, f: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(std::sync::Arc::new(f));
    }

    /// Consume the manager, returning its parts
    pub fn into_parts(self) -> (A, S) {
        (self.api, self.store.into_inner())
    }

    // ---------------------------------------------------------------
    // State queries
    // ---------------------------------------------------------------

    /// True iff a non-empty access token is stored.
    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(usable(self.store.lock().await.access_token()?).is_some())
    }

    /// Cached identity of the logged-in user.
    pub async fn user_data(&self) -> Result<Option<UserIdentity>> {
        self.store.lock().await.identity()
    }

    /// Stored token pair, if both tokens are present.
    pub async fn tokens(&self) -> Result<Option<TokenPair>> {
        self.store.lock().await.tokens()
    }

    /// Current session state, derived from the store.
    pub async fn state(&self) -> Result<SessionState> {
        derive_state(&*self.store.lock().await)
    }

    // ---------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------

    /// Create an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value> {
        self.api.register(request).await
    }

    /// Log in, persist the token pair and identity, and broadcast the new state.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let response = self.api.login(username, password).await?;

        {
            let mut store = self.store.lock().await;
            store.save_tokens(&response.token_pair())?;
            store.save_identity(&response.user)?;
        }

        log::info!(
            "[SESSION] Logged in as user_id={} (access token valid for {})",
            response.user.user_id,
            if response.expires_in.access_token.is_empty() {
                "an unspecified time"
            } else {
                response.expires_in.access_token.as_str()
            }
        );
        self.emit(SessionEvent::AuthChanged(SessionState::LoggedIn {
            user: Some(response.user.clone()),
        }));

        Ok(response.user)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns `Ok(None)` without any network call when no refresh token is
    /// stored. When the server rejects the refresh (for any reason) the whole
    /// session is cleared, listeners are told the user is logged out, and
    /// `Ok(None)` is returned. `Err` is reserved for token store failures.
    pub async fn refresh_access_token(&self) -> Result<Option<String>> {
        let refresh_token = usable(self.store.lock().await.refresh_token()?);
        let Some(refresh_token) = refresh_token else {
            log::debug!("[REFRESH] No refresh token stored");
            return Ok(None);
        };

        let refreshed = self.api.refresh_token(&refresh_token).await.and_then(|response| {
            usable(Some(response.access_token)).ok_or_else(|| {
                DiasysLinkError::SerializationError(
                    "refresh response carried an empty access token".into(),
                )
            })
        });

        match refreshed {
            Ok(access_token) => {
                self.store.lock().await.save_access_token(&access_token)?;
                log::debug!("[REFRESH] Access token refreshed");
                Ok(Some(access_token))
            },
            Err(e) => {
                log::warn!("[REFRESH] Refresh failed, clearing session: {}", e);
                self.store.lock().await.clear()?;
                self.emit(SessionEvent::AuthChanged(SessionState::LoggedOut));
                Ok(None)
            },
        }
    }

    /// Log out.
    ///
    /// Revokes the access token server-side when one is stored; a failure
    /// there is logged and otherwise ignored. The local session is always
    /// cleared and exactly one `LoggedOut` event is broadcast.
    pub async fn logout(&self) -> Result<()> {
        let access_token = usable(self.store.lock().await.access_token().unwrap_or_else(|e| {
            log::warn!("[LOGOUT] Could not read access token: {}", e);
            None
        }));

        if let Some(token) = access_token {
            if let Err(e) = self.api.logout(&token).await {
                log::warn!("[LOGOUT] Server-side logout failed, clearing local session anyway: {}", e);
            }
        }

        let cleared = self.store.lock().await.clear();
        self.emit(SessionEvent::AuthChanged(SessionState::LoggedOut));
        cleared
    }

    /// Run a prediction with the stored access token.
    ///
    /// Fails with [`DiasysLinkError::NotLoggedIn`] before any network call
    /// when no access token is stored. If the server reports the access token
    /// as expired, one refresh is attempted; on success the prediction is
    /// retried once with the new token and that outcome is returned as is,
    /// otherwise [`DiasysLinkError::SessionExpired`] is returned.
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult> {
        request.validate()?;
        let _in_flight = InFlightGuard::acquire(&self.predict_in_flight)?;

        let access_token = usable(self.store.lock().await.access_token()?)
            .ok_or(DiasysLinkError::NotLoggedIn)?;

        match self.api.predict(request, &access_token).await {
            Err(e) if e.is_auth_expired() => {
                log::info!("[PREDICT] Access token rejected ({}), refreshing", e);
                match self.refresh_access_token().await? {
                    Some(new_token) => self.api.predict(request, &new_token).await,
                    None => Err(DiasysLinkError::SessionExpired),
                }
            },
            other => other,
        }
    }

    /// Re-read the token store and broadcast the state if it changed.
    ///
    /// Picks up changes made by another process sharing the same durable
    /// store, such as a logout from a second terminal.
    pub async fn sync(&self) -> Result<SessionState> {
        let (before, after) = {
            let mut store = self.store.lock().await;
            let before = derive_state(&*store)?;
            store.reload()?;
            (before, derive_state(&*store)?)
        };

        if before != after {
            log::debug!("[SESSION] Store changed externally: {} -> {}", before, after);
            self.emit(SessionEvent::AuthChanged(after.clone()));
        }
        Ok(after)
    }

    fn emit(&self, event: SessionEvent) {
        log::debug!("[SESSION] {}", event);
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .emit(&event);
    }
}

/// An empty token is treated exactly like a missing one.
fn usable(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

fn derive_state<S: TokenStore>(store: &S) -> Result<SessionState> {
    if usable(store.access_token()?).is_some() {
        Ok(SessionState::LoggedIn {
            user: store.identity()?,
        })
    } else {
        Ok(SessionState::LoggedOut)
    }
}

/// Holds the in-flight flag for the duration of one request.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DiasysLinkError::RequestInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDiasysApi;
    use crate::models::{
        HealthMetrics, InputSummary, LoginResponse, ModelInfo, Prediction, PredictionUser,
        RefreshResponse, TokenExpiry,
    };
    use crate::token_store::MemoryTokenStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::sync::Notify;

    fn alice() -> UserIdentity {
        UserIdentity {
            user_id: 42,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn logged_in_store() -> MemoryTokenStore {
        MemoryTokenStore::with_session(TokenPair::new("old_access", "refresh"), Some(alice()))
    }

    fn sample_request() -> PredictRequest {
        PredictRequest::new(168.0, 72.0, 85.5, 1.65, 50.0)
    }

    fn sample_result(advice: &str) -> PredictionResult {
        PredictionResult {
            user: PredictionUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
            prediction: Prediction {
                risk_level: "TINGGI".into(),
                status: "Berisiko".into(),
                probability: 0.72,
                probability_text: "72%".into(),
                color_indicator: "red".into(),
                advice: advice.into(),
            },
            health_metrics: HealthMetrics {
                bmi: 31.4,
                bmi_category: "Obesitas".into(),
                glucose: 168.0,
                blood_pressure: 72.0,
                age: 50.0,
            },
            input_summary: InputSummary {
                weight: 85.5,
                height: 1.65,
                insulin: 0.0,
                skin_thickness: 0.0,
                diabetes_pedigree: 0.0,
                pregnancies: 0.0,
            },
            model_info: ModelInfo {
                accuracy: 78.5,
                model_type: "Random Forest".into(),
            },
            disclaimer: String::new(),
            timestamp: String::new(),
        }
    }

    /// Records every event delivered to the session's listeners.
    fn record_events<A: DiasysApi, S: TokenStore>(
        session: &SessionManager<A, S>,
    ) -> Arc<StdMutex<Vec<SessionEvent>>> {
        let events = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        session.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    /// API whose `predict` parks until released, to hold a request in flight.
    #[derive(Clone, Default)]
    struct GatedApi {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl DiasysApi for GatedApi {
        async fn register(&self, _request: &RegisterRequest) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse> {
            Err(DiasysLinkError::Unauthorized("not used".into()))
        }

        async fn refresh_token(&self, _refresh_token: &str) -> Result<RefreshResponse> {
            Err(DiasysLinkError::Unauthorized("not used".into()))
        }

        async fn predict(
            &self,
            _request: &PredictRequest,
            _access_token: &str,
        ) -> Result<PredictionResult> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(sample_result("gated"))
        }

        async fn logout(&self, _access_token: &str) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    // ==================== State queries ====================

    #[tokio::test]
    async fn test_logged_in_iff_access_token_present() {
        let session = SessionManager::new(MockDiasysApi::new(), MemoryTokenStore::new());
        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(session.state().await.unwrap(), SessionState::LoggedOut);

        let session = SessionManager::new(MockDiasysApi::new(), logged_in_store());
        assert!(session.is_logged_in().await.unwrap());
        assert_eq!(
            session.state().await.unwrap(),
            SessionState::LoggedIn { user: Some(alice()) }
        );

        // Access token alone is enough; no hidden condition on identity or refresh token
        let mut store = MemoryTokenStore::new();
        store.save_access_token("only_access").unwrap();
        let session = SessionManager::new(MockDiasysApi::new(), store);
        assert!(session.is_logged_in().await.unwrap());
        assert_eq!(session.state().await.unwrap(), SessionState::LoggedIn { user: None });
    }

    // ==================== Login ====================

    #[tokio::test]
    async fn test_login_persists_session_and_broadcasts() {
        let mut api = MockDiasysApi::new();
        api.expect_login()
            .times(1)
            .withf(|username, password| username == "alice@example.com" && password == "pw")
            .returning(|_, _| {
                Ok(LoginResponse {
                    access_token: "acc".into(),
                    refresh_token: "ref".into(),
                    token_type: "bearer".into(),
                    user: alice(),
                    expires_in: TokenExpiry::default(),
                })
            });

        let session = SessionManager::new(api, MemoryTokenStore::new());
        let events = record_events(&session);

        let user = session.login("alice@example.com", "pw").await.unwrap();
        assert_eq!(user, alice());
        assert_eq!(session.tokens().await.unwrap(), Some(TokenPair::new("acc", "ref")));
        assert_eq!(session.user_data().await.unwrap(), Some(alice()));

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![SessionEvent::AuthChanged(SessionState::LoggedIn { user: Some(alice()) })]
        );
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_untouched() {
        let mut api = MockDiasysApi::new();
        api.expect_login()
            .times(1)
            .returning(|_, _| Err(DiasysLinkError::Unauthorized("Invalid credentials".into())));

        let session = SessionManager::new(api, MemoryTokenStore::new());
        let events = record_events(&session);

        let err = session.login("alice@example.com", "wrong").await.unwrap_err();
        assert_eq!(err, DiasysLinkError::Unauthorized("Invalid credentials".into()));
        assert!(!session.is_logged_in().await.unwrap());
        assert!(events.lock().unwrap().is_empty());
    }

    // ==================== Refresh ====================

    #[tokio::test]
    async fn test_refresh_without_refresh_token_makes_no_call() {
        let mut api = MockDiasysApi::new();
        api.expect_refresh_token().never();

        let session = SessionManager::new(api, MemoryTokenStore::new());
        assert_eq!(session.refresh_access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_success_replaces_access_token_only() {
        let mut api = MockDiasysApi::new();
        api.expect_refresh_token()
            .times(1)
            .withf(|token| token == "refresh")
            .returning(|_| {
                Ok(RefreshResponse {
                    access_token: "new_access".into(),
                    token_type: Some("bearer".into()),
                })
            });

        let session = SessionManager::new(api, logged_in_store());
        let token = session.refresh_access_token().await.unwrap();

        assert_eq!(token.as_deref(), Some("new_access"));
        assert_eq!(
            session.tokens().await.unwrap(),
            Some(TokenPair::new("new_access", "refresh"))
        );
        assert_eq!(session.user_data().await.unwrap(), Some(alice()));
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_entire_store() {
        let mut api = MockDiasysApi::new();
        api.expect_refresh_token()
            .times(1)
            .returning(|_| Err(DiasysLinkError::ServerError {
                status_code: 500,
                message: "Token refresh failed".into(),
            }));

        let session = SessionManager::new(api, logged_in_store());
        let events = record_events(&session);

        assert_eq!(session.refresh_access_token().await.unwrap(), None);

        let (_, store) = session.into_parts();
        assert_eq!(store.access_token().unwrap(), None);
        assert_eq!(store.refresh_token().unwrap(), None);
        assert_eq!(store.identity().unwrap(), None);
        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::AuthChanged(SessionState::LoggedOut)]
        );
    }

    // ==================== Logout ====================

    #[tokio::test]
    async fn test_logout_clears_store_even_when_server_fails() {
        let mut api = MockDiasysApi::new();
        api.expect_logout()
            .times(1)
            .withf(|token| token == "old_access")
            .returning(|_| Err(DiasysLinkError::NetworkError("connection refused".into())));

        let session = SessionManager::new(api, logged_in_store());
        let events = record_events(&session);

        session.logout().await.unwrap();

        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(session.tokens().await.unwrap(), None);
        assert_eq!(session.user_data().await.unwrap(), None);
        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::AuthChanged(SessionState::LoggedOut)]
        );
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_server_call() {
        let mut api = MockDiasysApi::new();
        api.expect_logout().never();

        let session = SessionManager::new(api, MemoryTokenStore::new());
        let events = record_events(&session);

        session.logout().await.unwrap();
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_logout_success() {
        let mut api = MockDiasysApi::new();
        api.expect_logout()
            .times(1)
            .returning(|_| Ok(serde_json::Value::Null));

        let session = SessionManager::new(api, logged_in_store());
        session.logout().await.unwrap();
        assert!(!session.is_logged_in().await.unwrap());
    }

    // ==================== Predict ====================

    #[tokio::test]
    async fn test_predict_requires_login() {
        let mut api = MockDiasysApi::new();
        api.expect_predict().never();

        let session = SessionManager::new(api, MemoryTokenStore::new());
        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_predict_rejects_invalid_input_locally() {
        let mut api = MockDiasysApi::new();
        api.expect_predict().never();

        let session = SessionManager::new(api, logged_in_store());
        let request = sample_request().with_pregnancies(-1.0);
        let err = session.predict(&request).await.unwrap_err();
        assert!(matches!(err, DiasysLinkError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_predict_success_uses_stored_token() {
        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(1)
            .withf(|_, token| token == "old_access")
            .returning(|_, _| Ok(sample_result("first")));
        api.expect_refresh_token().never();

        let session = SessionManager::new(api, logged_in_store());
        let result = session.predict(&sample_request()).await.unwrap();
        assert_eq!(result.prediction.advice, "first");
    }

    #[tokio::test]
    async fn test_predict_refreshes_and_retries_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(2)
            .returning(move |_, token| {
                match counter.fetch_add(1, Ordering::SeqCst) {
                    0 => {
                        assert_eq!(token.to_string(), "old_access");
                        Err(DiasysLinkError::AuthExpired("Token has expired".into()))
                    },
                    _ => {
                        assert_eq!(token.to_string(), "new_access");
                        Ok(sample_result("second"))
                    },
                }
            });
        api.expect_refresh_token()
            .times(1)
            .returning(|_| {
                Ok(RefreshResponse {
                    access_token: "new_access".into(),
                    token_type: None,
                })
            });

        let session = SessionManager::new(api, logged_in_store());
        let result = session.predict(&sample_request()).await.unwrap();

        assert_eq!(result.prediction.advice, "second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            session.tokens().await.unwrap(),
            Some(TokenPair::new("new_access", "refresh"))
        );
    }

    #[tokio::test]
    async fn test_predict_session_expired_when_refresh_fails() {
        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(1)
            .returning(|_, _| Err(DiasysLinkError::AuthExpired("expired".into())));
        api.expect_refresh_token()
            .times(1)
            .returning(|_| Err(DiasysLinkError::Unauthorized("Invalid refresh token".into())));

        let session = SessionManager::new(api, logged_in_store());
        let events = record_events(&session);

        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::SessionExpired);
        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_predict_session_expired_without_refresh_token() {
        let mut store = MemoryTokenStore::new();
        store.save_access_token("old_access").unwrap();

        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(1)
            .returning(|_, _| Err(DiasysLinkError::AuthExpired("Not authenticated".into())));
        api.expect_refresh_token().never();

        let session = SessionManager::new(api, store);
        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::SessionExpired);
    }

    #[tokio::test]
    async fn test_predict_second_failure_is_not_retried() {
        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(2)
            .returning(|_, _| Err(DiasysLinkError::AuthExpired("Token has expired".into())));
        api.expect_refresh_token()
            .times(1)
            .returning(|_| {
                Ok(RefreshResponse {
                    access_token: "new_access".into(),
                    token_type: None,
                })
            });

        let session = SessionManager::new(api, logged_in_store());
        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::AuthExpired("Token has expired".into()));
    }

    #[tokio::test]
    async fn test_predict_other_errors_propagate_without_refresh() {
        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(1)
            .returning(|_, _| Err(DiasysLinkError::ServerError {
                status_code: 500,
                message: "Prediction failed".into(),
            }));
        api.expect_refresh_token().never();

        let session = SessionManager::new(api, logged_in_store());
        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert!(session.is_logged_in().await.unwrap());
    }

    #[test]
    fn test_in_flight_guard_rejects_concurrent_request() {
        let flag = AtomicBool::new(false);

        let first = InFlightGuard::acquire(&flag).unwrap();
        assert!(matches!(
            InFlightGuard::acquire(&flag),
            Err(DiasysLinkError::RequestInFlight)
        ));

        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_ok());
    }

    #[tokio::test]
    async fn test_overlapping_predict_is_rejected_until_first_completes() {
        let api = GatedApi::default();
        let gate = api.clone();
        let session = Arc::new(SessionManager::new(api, logged_in_store()));

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                let request = sample_request();
                session.predict(&request).await
            }
        });

        // First request is now parked inside the API call
        gate.entered.notified().await;
        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::RequestInFlight);

        gate.release.notify_one();
        assert_eq!(first.await.unwrap().unwrap().prediction.advice, "gated");

        // Flag released: a later request goes through
        gate.release.notify_one();
        assert!(session.predict(&sample_request()).await.is_ok());
    }

    // ==================== Empty tokens ====================

    #[tokio::test]
    async fn test_empty_access_token_counts_as_logged_out() {
        let mut api = MockDiasysApi::new();
        api.expect_predict().never();

        let store = MemoryTokenStore::with_session(TokenPair::new("", "refresh"), Some(alice()));
        let session = SessionManager::new(api, store);

        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(session.state().await.unwrap(), SessionState::LoggedOut);
        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_empty_refresh_token_makes_no_call() {
        let mut api = MockDiasysApi::new();
        api.expect_refresh_token().never();

        let store = MemoryTokenStore::with_session(TokenPair::new("old_access", ""), None);
        let session = SessionManager::new(api, store);
        assert_eq!(session.refresh_access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_yielding_empty_token_expires_session_without_retry() {
        let mut api = MockDiasysApi::new();
        api.expect_predict()
            .times(1)
            .withf(|_, token| token == "old_access")
            .returning(|_, _| Err(DiasysLinkError::AuthExpired("Token has expired".into())));
        api.expect_refresh_token()
            .times(1)
            .returning(|_| {
                Ok(RefreshResponse {
                    access_token: String::new(),
                    token_type: None,
                })
            });

        let session = SessionManager::new(api, logged_in_store());
        let events = record_events(&session);

        let err = session.predict(&sample_request()).await.unwrap_err();
        assert_eq!(err, DiasysLinkError::SessionExpired);
        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(session.tokens().await.unwrap(), None);
        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::AuthChanged(SessionState::LoggedOut)]
        );
    }

    #[tokio::test]
    async fn test_logout_with_empty_access_token_skips_server_call() {
        let mut api = MockDiasysApi::new();
        api.expect_logout().never();

        let store = MemoryTokenStore::with_session(TokenPair::new("", "refresh"), None);
        let session = SessionManager::new(api, store);
        session.logout().await.unwrap();

        let (_, store) = session.into_parts();
        assert_eq!(store.refresh_token().unwrap(), None);
    }

    // ==================== Sync ====================

    /// Store backed by shared "disk" state that only becomes visible on reload.
    struct SharedStore {
        disk: Arc<StdMutex<MemoryTokenStore>>,
        cache: MemoryTokenStore,
    }

    impl TokenStore for SharedStore {
        fn save_tokens(&mut self, tokens: &TokenPair) -> Result<()> {
            self.cache.save_tokens(tokens)
        }
        fn save_access_token(&mut self, access_token: &str) -> Result<()> {
            self.cache.save_access_token(access_token)
        }
        fn access_token(&self) -> Result<Option<String>> {
            self.cache.access_token()
        }
        fn refresh_token(&self) -> Result<Option<String>> {
            self.cache.refresh_token()
        }
        fn save_identity(&mut self, identity: &UserIdentity) -> Result<()> {
            self.cache.save_identity(identity)
        }
        fn identity(&self) -> Result<Option<UserIdentity>> {
            self.cache.identity()
        }
        fn clear(&mut self) -> Result<()> {
            self.cache.clear()
        }
        fn reload(&mut self) -> Result<()> {
            self.cache = self.disk.lock().unwrap().clone();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sync_broadcasts_only_on_change() {
        let disk = Arc::new(StdMutex::new(logged_in_store()));
        let store = SharedStore {
            disk: Arc::clone(&disk),
            cache: logged_in_store(),
        };

        let session = SessionManager::new(MockDiasysApi::new(), store);
        let events = record_events(&session);

        // Nothing changed on disk
        assert!(session.sync().await.unwrap().is_logged_in());
        assert!(events.lock().unwrap().is_empty());

        // Another process logs out
        disk.lock().unwrap().clear().unwrap();
        assert_eq!(session.sync().await.unwrap(), SessionState::LoggedOut);
        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::AuthChanged(SessionState::LoggedOut)]
        );
    }

    #[tokio::test]
    async fn test_event_handlers_from_builder() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let handlers = SessionEventHandlers::new().on_auth_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let session = SessionManager::new(MockDiasysApi::new(), MemoryTokenStore::new())
            .with_event_handlers(handlers);
        session.logout().await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
