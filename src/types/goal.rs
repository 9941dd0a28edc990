use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What a goal measures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GoalMetric {
    Steps,
    Distance,
    ActiveMinutes,
    Calories,
}

/// Window a goal or leaderboard covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub metric: GoalMetric,
    pub target: u64,
    pub period: Period,
    #[serde(default)]
    pub progress: u64,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shared_with: Vec<String>,
}

impl Goal {
    /// Fraction of the target reached, clamped to `0.0..=1.0`.
    pub fn progress_ratio(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (self.progress as f64 / self.target as f64).min(1.0)
    }
}

/// Body of `POST /goals`.
///
/// # Example
/// ```
/// use stride::types::{GoalMetric, NewGoal, Period};
///
/// let goal = NewGoal::builder()
///     .title("10k a day".to_string())
///     .metric(GoalMetric::Steps)
///     .target(10_000)
///     .period(Period::Daily)
///     .build();
/// assert_eq!(goal.target, 10_000);
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub metric: GoalMetric,
    pub target: u64,
    pub period: Period,
}

/// Body of `PUT /goals/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.target.is_none() && self.period.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn metric_parses_snake_case() {
        assert_eq!(
            GoalMetric::from_str("active_minutes").unwrap(),
            GoalMetric::ActiveMinutes
        );
        assert_eq!(Period::Weekly.to_string(), "weekly");
    }

    #[test]
    fn progress_ratio_is_clamped() {
        let goal: Goal = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "title": "Walk",
            "metric": "steps",
            "target": 1000,
            "period": "daily",
            "progress": 2500,
            "createdAt": "2026-03-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(goal.progress_ratio(), 1.0);
        assert!(goal.shared_with.is_empty());
    }

    #[test]
    fn update_omits_unset_fields() {
        let update = GoalUpdate::builder().target(5000).build();
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({ "target": 5000 }));
        assert!(GoalUpdate::default().is_empty());
    }
}
