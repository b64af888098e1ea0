use serde::{Deserialize, Serialize};

/// Cached copy of the server-side user record, kept for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}
