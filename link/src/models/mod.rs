//! Data models for the diasys-link client library.
//!
//! Defines the request and response bodies of the remote API, the
//! `{status, message, data}` envelope that wraps every successful response,
//! and the locally derived session state.

pub mod api_envelope;
pub mod error_body;
pub mod login_request;
pub mod login_response;
pub mod predict_request;
pub mod prediction_result;
pub mod refresh_request;
pub mod refresh_response;
pub mod register_request;
pub mod session_state;
pub mod token_pair;
pub mod user_identity;


pub use api_envelope::ApiEnvelope;
pub use error_body::ErrorBody;
pub use login_request::LoginRequest;
pub use login_response::{LoginResponse, TokenExpiry};
pub use predict_request::PredictRequest;
pub use prediction_result::{
    HealthMetrics, InputSummary, ModelInfo, Prediction, PredictionResult, PredictionUser,
};
pub use refresh_request::RefreshRequest;
pub use refresh_response::RefreshResponse;
pub use register_request::RegisterRequest;
pub use session_state::SessionState;
pub use token_pair::TokenPair;
pub use user_identity::UserIdentity;
