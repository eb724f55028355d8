use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::token::MalformedTokenError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("credentials rejected: {0}")]
    CredentialsRejected(String),

    #[error(transparent)]
    MalformedToken(#[from] MalformedTokenError),

    #[error("secure storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Failure handed back to callers of login/register.
///
/// Serializes as `{"error": true, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub error: bool,
    pub message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

impl From<SessionError> for AuthFailure {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::CredentialsRejected(message) => Self::new(message),
            other => Self::new(other.to_string()),
        }
    }
}
