//! HTTP transport: base endpoint, default headers, fixed timeout.

pub mod request;

pub use request::{status_to_error, ApiRequest, ApiResponse};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};

use crate::error::{Result, StrideError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a single request and reads the whole response.
///
/// Non-2xx statuses are returned as responses, not errors; only failures to
/// get a response at all (connect, timeout) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| StrideError::Configuration(format!("invalid base URL {base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        tracing::debug!(status = status.as_u16(), url = %url, "Received response");

        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

impl HttpTransport {
    fn map_error(&self, error: reqwest::Error) -> StrideError {
        if error.is_timeout() {
            StrideError::Timeout(self.timeout.as_millis() as u64)
        } else {
            StrideError::Network(error)
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("stride/", env!("CARGO_PKG_VERSION"))),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let result = HttpTransport::new("not a url", DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(StrideError::Configuration(_))));
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let transport = HttpTransport::new("http://localhost:3000/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000/api");
        assert_eq!(transport.url_for("/goals"), "http://localhost:3000/api/goals");
        assert_eq!(transport.url_for("goals"), "http://localhost:3000/api/goals");
    }
}
