#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use stride::auth::{Credentials, MemoryTokenStore, TokenStore};
use stride::client::ApiClient;
use stride::transport::HttpTransport;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn credentials(access: &str, refresh: &str) -> Credentials {
    Credentials::new(access, refresh)
}

pub fn logged_in_store(access: &str, refresh: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_credentials(credentials(
        access, refresh,
    )))
}

pub fn client_for(server: &MockServer, store: Arc<dyn TokenStore>) -> ApiClient {
    client_with_timeout(server, store, Duration::from_secs(5))
}

pub fn client_with_timeout(
    server: &MockServer,
    store: Arc<dyn TokenStore>,
    timeout: Duration,
) -> ApiClient {
    let transport = HttpTransport::new(server.uri(), timeout).expect("transport");
    ApiClient::new(Arc::new(transport), store)
}

/// Mount a successful `/auth/refresh` exchange `refresh -> (new_access, new_refresh)`.
pub async fn mount_refresh(
    server: &MockServer,
    refresh: &str,
    new_access: &str,
    new_refresh: &str,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refreshToken": refresh })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "accessToken": new_access,
                    "refreshToken": new_refresh
                }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}
