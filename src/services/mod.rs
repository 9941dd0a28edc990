//! Thin request/response wrappers over [`ApiClient`](crate::client::ApiClient).
//!
//! Each method builds a path and payload, sends it through the
//! authenticated client and parses the body. No caching, no retries beyond
//! the client's single token-refresh replay.

pub mod dashboard;
pub mod friends;
pub mod goals;
pub mod session;
pub mod steps;

pub use dashboard::DashboardService;
pub use friends::FriendService;
pub use goals::GoalService;
pub use session::SessionService;
pub use steps::StepService;

use crate::error::{Result, StrideError};

/// Percent-encode an identifier for use as a single path segment.
pub(crate) fn segment(what: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StrideError::InvalidArgument(format!("{what} must not be empty")));
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}
