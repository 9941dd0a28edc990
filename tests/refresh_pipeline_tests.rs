//! Integration tests for the authenticated client: single-flight refresh,
//! replay-once semantics and credential cleanup, against a mock backend.

mod auth_support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;
use stride::auth::{AuthError, Credentials, MemoryTokenStore, TokenStore};
use stride::error::StrideError;
use stride::transport::ApiRequest;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{client_for, client_with_timeout, credentials, logged_in_store, mount_refresh};

async fn mount_goals(server: &MockServer, valid_token: &str, expected_ok: u64) {
    Mock::given(method("GET"))
        .and(path("/goals"))
        .and(header("authorization", format!("Bearer {valid_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "g1" }])))
        .with_priority(1)
        .expect(expected_ok)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .with_priority(10)
        .mount(server)
        .await;
}

fn assert_auth_required<T: std::fmt::Debug>(result: Result<T, StrideError>) -> String {
    match result {
        Err(StrideError::AuthenticationRequired(message)) => message,
        other => panic!("expected AuthenticationRequired, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let server = MockServer::start().await;
    mount_goals(&server, "a2", 1).await;
    mount_refresh(&server, "r1", "a2", "r2", 1).await;

    let store = logged_in_store("a1", "r1");
    let client = client_for(&server, store.clone());

    let response = client.execute(ApiRequest::get("/goals")).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body, json!([{ "id": "g1" }]));
    assert_eq!(store.load().unwrap(), Some(credentials("a2", "r2")));
}

#[tokio::test]
async fn concurrent_failures_share_a_single_refresh() {
    let server = MockServer::start().await;
    mount_goals(&server, "a2", 10).await;
    mount_refresh(&server, "r1", "a2", "r2", 1).await;

    let client = client_for(&server, logged_in_store("a1", "r1"));

    let results = join_all((0..10).map(|_| client.execute(ApiRequest::get("/goals")))).await;

    for result in results {
        assert_eq!(result.expect("every request recovers").status.as_u16(), 200);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_failures_on_worker_threads_share_a_single_refresh() {
    let server = MockServer::start().await;
    mount_goals(&server, "a2", 8).await;
    mount_refresh(&server, "r1", "a2", "r2", 1).await;

    let client = client_for(&server, logged_in_store("a1", "r1"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.execute(ApiRequest::get("/goals")).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().expect("every request recovers");
        assert_eq!(response.status.as_u16(), 200);
    }
}

#[tokio::test]
async fn request_rejected_after_refresh_is_not_retried_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "r1", "a2", "r2", 1).await;

    let store = logged_in_store("a1", "r1");
    let client = client_for(&server, store.clone());

    assert_auth_required(client.execute(ApiRequest::get("/goals")).await);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn missing_refresh_token_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, store.clone());

    let message = assert_auth_required(client.execute(ApiRequest::get("/goals")).await);
    assert_eq!(message, "Not logged in");
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn rejected_refresh_fails_every_waiting_request_alike() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in_store("a1", "r1");
    let client = client_for(&server, store.clone());

    let results = join_all((0..5).map(|_| client.execute(ApiRequest::get("/goals")))).await;
    let messages: Vec<String> = results.into_iter().map(assert_auth_required).collect();

    assert!(messages.iter().all(|m| m == &messages[0]));
    assert_eq!(messages[0], "Refresh rejected with status 401");
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn malformed_refresh_body_is_a_refresh_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "a2", "refreshToken": "r2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in_store("a1", "r1");
    let client = client_for(&server, store.clone());

    let message = assert_auth_required(client.execute(ApiRequest::get("/goals")).await);
    assert!(message.starts_with("Invalid response"), "{message}");
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn new_wave_can_refresh_after_a_failed_one() {
    let server = MockServer::start().await;
    mount_goals(&server, "a2", 1).await;

    let store = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, store.clone());

    assert_auth_required(client.execute(ApiRequest::get("/goals")).await);

    mount_refresh(&server, "r1", "a2", "r2", 1).await;
    store.save(&credentials("a1", "r1")).unwrap();

    let response = client.execute(ApiRequest::get("/goals")).await.unwrap();
    assert_eq!(response.status.as_u16(), 200);
}

#[tokio::test]
async fn consecutive_waves_each_refresh_once() {
    let server = MockServer::start().await;
    mount_goals(&server, "a3", 1).await;
    mount_refresh(&server, "r1", "a2", "r2", 1).await;
    mount_refresh(&server, "r2", "a3", "r3", 1).await;

    let store = logged_in_store("a1", "r1");
    let client = client_for(&server, store.clone());

    // a2 is rejected too, so the first wave ends in a forced logout.
    assert_auth_required(client.execute(ApiRequest::get("/goals")).await);
    assert_eq!(store.load().unwrap(), None);

    store.save(&credentials("a2", "r2")).unwrap();
    let response = client.execute(ApiRequest::get("/goals")).await.unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(store.load().unwrap(), Some(credentials("a3", "r3")));
}

#[tokio::test]
async fn timeout_is_a_transport_error_and_never_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = logged_in_store("a1", "r1");
    let client = client_with_timeout(&server, store.clone(), Duration::from_millis(100));

    let result = client.execute(ApiRequest::get("/goals")).await;

    assert!(matches!(result, Err(StrideError::Timeout(100))), "{result:?}");
    assert_eq!(store.load().unwrap(), Some(credentials("a1", "r1")));
}

#[tokio::test]
async fn non_auth_errors_pass_through_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no such goal" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in_store("a1", "r1"));
    let response = client
        .execute(ApiRequest::get("/goals/missing"))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 404);
    match response.error_for_status() {
        Err(StrideError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such goal");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

/// Hands out `a1` once, then `a2`, as if another device rotated the pair
/// while a request was in flight.
struct RotatedElsewhere {
    reads: Mutex<u32>,
}

impl TokenStore for RotatedElsewhere {
    fn load(&self) -> Result<Option<Credentials>, AuthError> {
        let mut reads = self.reads.lock().unwrap();
        *reads += 1;
        Ok(Some(if *reads == 1 {
            credentials("a1", "r1")
        } else {
            credentials("a2", "r2")
        }))
    }

    fn save(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

#[tokio::test]
async fn request_sent_with_superseded_token_replays_without_refresh() {
    let server = MockServer::start().await;
    mount_goals(&server, "a2", 1).await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(RotatedElsewhere {
        reads: Mutex::new(0),
    });
    let client = client_for(&server, store);

    let response = client.execute(ApiRequest::get("/goals")).await.unwrap();
    assert_eq!(response.status.as_u16(), 200);
}
