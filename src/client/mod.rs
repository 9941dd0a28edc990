//! Authenticated API client.
//!
//! Every request goes out with the stored access token as a bearer header.
//! A 401 on the first attempt parks the request and triggers at most one
//! refresh for the whole wave of failures; when the refresh lands, each
//! parked request is replayed once with the new token, in the order it
//! failed. If the refresh cannot succeed the credentials are cleared and the
//! whole wave fails with [`StrideError::AuthenticationRequired`].

mod refresh;

use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

use crate::auth::{AuthError, Credentials, TokenResponse, TokenStore};
use crate::config::StrideConfig;
use crate::error::{Result, StrideError};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

use refresh::{Admission, PendingRequest, RefreshCoordinator, RefreshFlight};

/// Default path of the refresh endpoint, relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// HTTP client that keeps the session alive across access-token expiry.
///
/// Cheap to clone; clones share the token store and the refresh state.
///
/// # Example
/// ```no_run
/// use stride::client::ApiClient;
/// use stride::config::StrideConfig;
/// use stride::transport::ApiRequest;
///
/// # async fn example() -> stride::error::Result<()> {
/// let client = ApiClient::from_config(&StrideConfig::from_env()?)?;
/// let goals: serde_json::Value = client.send_json(ApiRequest::get("/goals")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn TokenStore>,
    refresh_path: String,
    coordinator: RefreshCoordinator,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("refresh_path", &self.inner.refresh_path)
            .field("refreshing", &self.inner.coordinator.is_refreshing())
            .finish()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn TokenStore>) -> Self {
        Self::with_refresh_path(transport, store, DEFAULT_REFRESH_PATH)
    }

    pub fn with_refresh_path(
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
        refresh_path: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                store,
                refresh_path: refresh_path.into(),
                coordinator: RefreshCoordinator::new(),
            }),
        }
    }

    /// Build a reqwest-backed client with a file token store from config.
    pub fn from_config(config: &StrideConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url(), config.timeout())?;
        Ok(Self::new(Arc::new(transport), config.token_store()))
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Send a request through the auth pipeline.
    ///
    /// Non-2xx responses other than a recoverable 401 are returned as-is.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request = self.inner.authorize(request)?;
        let response = self.inner.transport.send(request.clone()).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }
        tracing::debug!(path = %request.path, "Request unauthorized; recovering session");
        self.inner.recover(request).await
    }

    /// Send a request without attaching credentials or refreshing on 401.
    ///
    /// Used for endpoints that establish a session (login, register).
    pub async fn execute_public(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.inner.transport.send(request).await
    }

    /// Send a request and parse a successful JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(request).await?.json()
    }

    /// Send a request and discard the body of a successful response.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await?.error_for_status()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn is_refreshing(&self) -> bool {
        self.inner.coordinator.is_refreshing()
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> usize {
        self.inner.coordinator.queued()
    }
}

impl ClientInner {
    fn authorize(&self, request: ApiRequest) -> Result<ApiRequest> {
        Ok(match self.store.load()? {
            Some(credentials) => request.with_bearer(&credentials.access_token),
            None => request,
        })
    }

    async fn recover(self: &Arc<Self>, request: ApiRequest) -> Result<ApiResponse> {
        let sent_token = request.bearer_token().map(str::to_string);
        let (responder, outcome) = oneshot::channel();
        let pending = PendingRequest { request, responder };

        match self
            .coordinator
            .admit(pending, sent_token.as_deref(), self.store.as_ref())
        {
            Admission::ReplayNow {
                request,
                access_token,
            } => {
                tracing::debug!("Access token already rotated; replaying without refresh");
                return self.replay(request, &access_token).await;
            }
            Admission::Queued => {}
            Admission::Lead(flight) => {
                tokio::spawn(Arc::clone(self).run_refresh(flight));
            }
        }

        outcome.await.unwrap_or_else(|_| {
            Err(StrideError::AuthenticationRequired(
                AuthError::RefreshAbandoned.to_string(),
            ))
        })
    }

    async fn run_refresh(self: Arc<Self>, flight: RefreshFlight) {
        tracing::info!("Refreshing access token");
        let outcome = match self.refresh_credentials().await {
            Ok(credentials) => self.store.save(&credentials).map(|()| credentials),
            Err(err) => Err(err),
        };
        if outcome.is_err() {
            if let Err(err) = self.store.clear() {
                tracing::warn!(error = %err, "Failed to clear credentials after refresh failure");
            }
        }

        let queue = flight.finish();
        match outcome {
            Ok(credentials) => {
                tracing::info!(replaying = queue.len(), "Token refresh succeeded");
                let replays = queue.into_iter().map(|pending| {
                    let token = credentials.access_token.as_str();
                    let inner = &self;
                    async move {
                        let result = inner.replay(pending.request, token).await;
                        let _ = pending.responder.send(result);
                    }
                });
                join_all(replays).await;
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    rejected = queue.len(),
                    "Token refresh failed; credentials cleared"
                );
                for pending in queue {
                    pending.reject(&err);
                }
            }
        }
    }

    async fn refresh_credentials(&self) -> std::result::Result<Credentials, AuthError> {
        let refresh_token = self
            .store
            .load()?
            .map(|credentials| credentials.refresh_token)
            .ok_or(AuthError::NotLoggedIn)?;

        let mut request = ApiRequest::post(self.refresh_path.clone());
        request.body = Some(serde_json::json!({ "refreshToken": refresh_token }));

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if !response.is_success() {
            return Err(AuthError::RefreshRejected {
                status: response.status.as_u16(),
            });
        }

        let payload: TokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        if payload.access_token.is_empty() || payload.refresh_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "refresh response contained an empty token".to_string(),
            ));
        }
        Ok(payload.into())
    }

    /// Send a request for the second and last time.
    async fn replay(&self, request: ApiRequest, access_token: &str) -> Result<ApiResponse> {
        let response = self
            .transport
            .send(request.with_bearer(access_token))
            .await?;
        if response.is_unauthorized() {
            tracing::warn!("Request rejected again after token refresh; clearing credentials");
            self.store.clear()?;
            return Err(StrideError::AuthenticationRequired(
                AuthError::SessionRejected.to_string(),
            ));
        }
        Ok(response)
    }
}
