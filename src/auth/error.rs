use thiserror::Error;

use crate::error::StrideError;

/// Errors raised by token storage and the refresh exchange.
///
/// `Clone` so that one refresh outcome can be handed to every request
/// waiting on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Refresh rejected with status {status}")]
    RefreshRejected { status: u16 },
    #[error("Refresh abandoned before completion")]
    RefreshAbandoned,
    #[error("Session rejected after token refresh")]
    SessionRejected,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for StrideError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Io(_) | AuthError::Serialization(_) => {
                StrideError::Storage(error.to_string())
            }
            other => StrideError::AuthenticationRequired(other.to_string()),
        }
    }
}
