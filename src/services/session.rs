use serde::Serialize;

use crate::auth::Credentials;
use crate::client::ApiClient;
use crate::error::{Result, StrideError};
use crate::transport::ApiRequest;
use crate::types::{AuthResponse, User};

/// Login, registration and logout.
///
/// All I/O decisions (prompting, printing) belong to the caller; this only
/// returns typed results and keeps the token store in step with the session.
#[derive(Debug, Clone)]
pub struct SessionService {
    client: ApiClient,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutBody<'a> {
    refresh_token: &'a str,
}

impl SessionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`; stores the returned credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        require("email", email)?;
        require("password", password)?;
        let request = ApiRequest::post("/auth/login").json(&LoginBody { email, password })?;
        self.establish(request).await
    }

    /// `POST /auth/register`; stores the returned credentials.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        require("name", name)?;
        require("email", email)?;
        require("password", password)?;
        let request = ApiRequest::post("/auth/register").json(&RegisterBody {
            name,
            email,
            password,
        })?;
        self.establish(request).await
    }

    /// Clear local credentials and tell the backend to revoke the refresh token.
    ///
    /// The local store is cleared even if the backend call fails; that
    /// failure is only logged.
    pub async fn logout(&self) -> Result<()> {
        let Some(credentials) = self.client.store().load()? else {
            return Ok(());
        };
        self.client.store().clear()?;

        let notify = ApiRequest::post("/auth/logout")
            .with_bearer(&credentials.access_token)
            .json(&LogoutBody {
                refresh_token: &credentials.refresh_token,
            })?;
        match self.client.execute_public(notify).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => {
                tracing::warn!(status = response.status.as_u16(), "Backend logout rejected");
            }
            Err(err) => tracing::warn!(error = %err, "Backend logout failed"),
        }
        Ok(())
    }

    /// `GET /auth/me`.
    pub async fn current_user(&self) -> Result<User> {
        self.client.send_json(ApiRequest::get("/auth/me")).await
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.client.store().load()?.is_some())
    }

    async fn establish(&self, request: ApiRequest) -> Result<User> {
        let response: AuthResponse = self.client.execute_public(request).await?.json()?;
        let credentials = Credentials::from(response.tokens);
        self.client.store().save(&credentials)?;
        tracing::info!(user_id = %response.user.id, "Session established");
        Ok(response.user)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StrideError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(())
}
