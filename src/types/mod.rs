//! Wire types for the fitness API.

pub mod activity;
pub mod goal;
pub mod user;

pub use activity::{DashboardSummary, LeaderboardEntry, StepEntry, SyncSummary};
pub use goal::{Goal, GoalMetric, GoalUpdate, NewGoal, Period};
pub use user::{AuthResponse, Friend, FriendRequest, User, UserSummary};
