use serde::{Deserialize, Serialize};
use std::fmt;

use super::user_identity::UserIdentity;

/// Login state, derived from the token store at query time and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    LoggedOut,
    LoggedIn {
        /// Cached identity, if one was stored alongside the tokens
        user: Option<UserIdentity>,
    },
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::LoggedIn { user } => user.as_ref(),
            Self::LoggedOut => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut => write!(f, "logged out"),
            Self::LoggedIn { user: Some(user) } => {
                write!(f, "logged in as {} <{}>", user.name, user.email)
            },
            Self::LoggedIn { user: None } => write!(f, "logged in"),
        }
    }
}
