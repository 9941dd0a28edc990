//! Error types for Stride.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all Stride operations.
#[derive(Error, Debug)]
pub enum StrideError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session cannot be recovered without a fresh login.
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl StrideError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationRequired(_) => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Io(_) | Self::Storage(_) => ErrorCategory::Storage,
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                404 => ErrorCategory::NotFound,
                429 => ErrorCategory::RateLimit,
                400..=499 => ErrorCategory::InvalidInput,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether this error is potentially retryable by the caller.
    ///
    /// The client itself never retries these; only the 401 refresh path
    /// replays a request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Whether the UI should route the user back to the login flow.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthenticationRequired(_))
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        if self.requires_login() {
            return RecoverySuggestion::Login;
        }
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckPermissions,
            ErrorCategory::RateLimit => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Network => RecoverySuggestion::CheckConnectivity,
            ErrorCategory::Timeout => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::InvalidInput | ErrorCategory::NotFound => {
                RecoverySuggestion::FixRequest
            }
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StrideError>;
