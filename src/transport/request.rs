//! Transport-level request and response values.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StrideError};

/// A request relative to the transport's base endpoint.
///
/// Requests are plain values so they can be replayed after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace any existing `Authorization` header with a bearer token.
    pub fn with_bearer(mut self, access_token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {access_token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Access token is not a valid header value; sending without it");
                self.headers.remove(AUTHORIZATION);
            }
        }
        self
    }

    /// The bearer token currently attached, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}

/// A fully-read response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx response into [`StrideError::Api`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(status_to_error(self.status.as_u16(), &self.text()))
    }

    /// Parse a successful response body as JSON.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Build an API error from a status and raw body, preferring the backend's
/// `message`/`error` field when the body is JSON.
pub fn status_to_error(status: u16, body: &str) -> StrideError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());
    StrideError::api(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_bearer_replaces_existing_header() {
        let request = ApiRequest::get("/goals")
            .with_bearer("old")
            .with_bearer("new");
        assert_eq!(request.bearer_token(), Some("new"));
        assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn invalid_token_is_dropped() {
        let request = ApiRequest::get("/goals").with_bearer("bad\ntoken");
        assert_eq!(request.bearer_token(), None);
    }

    #[test]
    fn error_for_status_prefers_message_field() {
        let response = ApiResponse::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"target must be positive"}"#,
        );
        match response.error_for_status() {
            Err(StrideError::Api { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "target must be positive");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_success_body_is_a_serialization_error() {
        let response = ApiResponse::new(StatusCode::OK, "not json");
        let result: Result<serde_json::Value> = response.json();
        assert!(matches!(result, Err(StrideError::Serialization(_))));
    }
}
