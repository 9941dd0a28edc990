use serde::Serialize;

use super::segment;
use crate::client::ApiClient;
use crate::error::{Result, StrideError};
use crate::transport::ApiRequest;
use crate::types::{Goal, GoalUpdate, NewGoal};

/// Goal CRUD and sharing.
#[derive(Debug, Clone)]
pub struct GoalService {
    client: ApiClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareBody<'a> {
    friend_ids: &'a [String],
}

impl GoalService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Goal>> {
        self.client.send_json(ApiRequest::get("/goals")).await
    }

    pub async fn get(&self, id: &str) -> Result<Goal> {
        let path = format!("/goals/{}", segment("goal id", id)?);
        self.client.send_json(ApiRequest::get(path)).await
    }

    pub async fn create(&self, goal: &NewGoal) -> Result<Goal> {
        if goal.title.trim().is_empty() {
            return Err(StrideError::InvalidArgument(
                "goal title must not be empty".to_string(),
            ));
        }
        self.client
            .send_json(ApiRequest::post("/goals").json(goal)?)
            .await
    }

    pub async fn update(&self, id: &str, update: &GoalUpdate) -> Result<Goal> {
        if update.is_empty() {
            return Err(StrideError::InvalidArgument(
                "goal update has no fields set".to_string(),
            ));
        }
        let path = format!("/goals/{}", segment("goal id", id)?);
        self.client
            .send_json(ApiRequest::put(path).json(update)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/goals/{}", segment("goal id", id)?);
        self.client.send_empty(ApiRequest::delete(path)).await
    }

    /// Share a goal with friends; returns the goal with its updated audience.
    pub async fn share(&self, id: &str, friend_ids: &[String]) -> Result<Goal> {
        if friend_ids.is_empty() {
            return Err(StrideError::InvalidArgument(
                "at least one friend is required".to_string(),
            ));
        }
        let path = format!("/goals/{}/share", segment("goal id", id)?);
        self.client
            .send_json(ApiRequest::post(path).json(&ShareBody { friend_ids })?)
            .await
    }
}
