use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;
use crate::types::{DashboardSummary, LeaderboardEntry, Period};

#[derive(Debug, Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        self.client.send_json(ApiRequest::get("/dashboard")).await
    }

    /// Friends ranked by steps over `period`, best first.
    pub async fn leaderboard(&self, period: Period) -> Result<Vec<LeaderboardEntry>> {
        let mut entries: Vec<LeaderboardEntry> = self
            .client
            .send_json(ApiRequest::get("/dashboard/leaderboard").query("period", period))
            .await?;
        entries.sort_by_key(|entry| entry.rank);
        Ok(entries)
    }
}
