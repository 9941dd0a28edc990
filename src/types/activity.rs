use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Step count recorded for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEntry {
    pub date: NaiveDate,
    pub count: u64,
    /// Device or app that produced the count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl StepEntry {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self {
            date,
            count,
            source: None,
        }
    }
}

/// Result of `POST /steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub accepted: u32,
    #[serde(default)]
    pub today_total: u64,
}

/// Aggregates shown on the home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_steps: u64,
    pub weekly_steps: u64,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub active_goals: u32,
    #[serde(default)]
    pub completed_goals: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub name: String,
    pub steps: u64,
}
