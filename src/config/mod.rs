//! Configuration system (layered: code > env > defaults).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{FileTokenStore, TokenStore, TokenStoreConfig};
use crate::error::{Result, StrideError};
use crate::transport::DEFAULT_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

pub const ENV_BASE_URL: &str = "STRIDE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "STRIDE_TIMEOUT_SECS";
pub const ENV_HOME: &str = "STRIDE_HOME";
pub const ENV_PROFILE: &str = "STRIDE_PROFILE";

/// Client configuration.
///
/// Resolution order for each setting:
/// 1. Explicit `with_*` calls
/// 2. Environment variables (a `.env` file is loaded if present)
/// 3. Built-in defaults
#[derive(Debug, Clone)]
pub struct StrideConfig {
    base_url: String,
    timeout: Duration,
    token_dir: PathBuf,
    profile: String,
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_dir: TokenStoreConfig::default_dir(),
            profile: "default".to_string(),
        }
    }
}

impl StrideConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(url)?;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                StrideError::Configuration(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got {raw:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs))?;
        }
        if let Ok(dir) = std::env::var(ENV_HOME) {
            config = config.with_token_dir(dir);
        }
        if let Ok(profile) = std::env::var(ENV_PROFILE) {
            config = config.with_profile(profile);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let parsed = url::Url::parse(&url)
            .map_err(|e| StrideError::Configuration(format!("invalid base URL {url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StrideError::Configuration(format!(
                "base URL must use http or https, got {}",
                parsed.scheme()
            )));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(StrideError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = dir.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn token_dir(&self) -> &Path {
        &self.token_dir
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// File-backed token store for the configured directory and profile.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::new(FileTokenStore::new(
            TokenStoreConfig::new(self.token_dir.clone()).with_profile(self.profile.clone()),
        ))
    }
}
