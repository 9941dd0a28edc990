use serde::Serialize;

use super::segment;
use crate::client::ApiClient;
use crate::error::{Result, StrideError};
use crate::transport::ApiRequest;
use crate::types::{Friend, FriendRequest, UserSummary};

#[derive(Debug, Clone)]
pub struct FriendService {
    client: ApiClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FriendRequestBody<'a> {
    user_id: &'a str,
}

impl FriendService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Friend>> {
        self.client.send_json(ApiRequest::get("/friends")).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<UserSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StrideError::InvalidArgument(
                "search query must not be empty".to_string(),
            ));
        }
        self.client
            .send_json(ApiRequest::get("/friends/search").query("q", query))
            .await
    }

    pub async fn send_request(&self, user_id: &str) -> Result<FriendRequest> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(StrideError::InvalidArgument(
                "user id must not be empty".to_string(),
            ));
        }
        self.client
            .send_json(ApiRequest::post("/friends/requests").json(&FriendRequestBody { user_id })?)
            .await
    }

    /// Incoming requests awaiting an answer.
    pub async fn pending_requests(&self) -> Result<Vec<FriendRequest>> {
        self.client
            .send_json(ApiRequest::get("/friends/requests"))
            .await
    }

    pub async fn accept(&self, request_id: &str) -> Result<Friend> {
        let path = format!(
            "/friends/requests/{}/accept",
            segment("request id", request_id)?
        );
        self.client.send_json(ApiRequest::post(path)).await
    }

    pub async fn remove(&self, friend_id: &str) -> Result<()> {
        let path = format!("/friends/{}", segment("friend id", friend_id)?);
        self.client.send_empty(ApiRequest::delete(path)).await
    }
}
