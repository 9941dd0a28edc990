//! Convenience re-exports.

pub use crate::auth::{Credentials, FileTokenStore, MemoryTokenStore, TokenStore};
pub use crate::client::ApiClient;
pub use crate::config::StrideConfig;
pub use crate::error::{Result, StrideError};
pub use crate::services::{
    DashboardService, FriendService, GoalService, SessionService, StepService,
};
pub use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use crate::types::*;
