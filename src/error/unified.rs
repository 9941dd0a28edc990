//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    NotFound,
    InvalidInput,
    Api,
    Configuration,
    Serialization,
    Storage,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Send the user through the login flow again.
    Login,
    CheckPermissions,
    CheckConnectivity,
    RetryWithBackoff,
    CheckConfiguration,
    FixRequest,
    ContactSupport,
}
