//! CLI entry point for Stride.

pub mod handlers;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::types::{GoalMetric, Period};

/// Stride fitness CLI
#[derive(Parser, Debug)]
#[command(name = "stride", version, about = "Stride: fitness tracking from the terminal")]
pub struct Cli {
    /// Override the API base URL
    #[arg(long, global = true, env = "STRIDE_API_URL")]
    pub api_url: Option<String>,

    /// Credential profile to use
    #[arg(long, global = true, env = "STRIDE_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management
    Auth(AuthArgs),
    /// Fitness goals
    Goals(GoalsArgs),
    /// Step counts
    Steps(StepsArgs),
    /// Friends and friend requests
    Friends(FriendsArgs),
    /// Summary of today and the week
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with email and password
    Login(LoginArgs),
    /// Create an account and log in
    Register(RegisterArgs),
    /// Show who is logged in
    Status,
    /// Log out and forget stored tokens
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    pub email: String,
    #[arg(long, env = "STRIDE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    #[arg(long, env = "STRIDE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct GoalsArgs {
    #[command(subcommand)]
    pub command: GoalCommands,
}

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// List goals with progress
    List,
    /// Create a goal
    Create(CreateGoalArgs),
    /// Change a goal's target
    SetTarget { id: String, target: u64 },
    /// Delete a goal
    Delete { id: String },
    /// Share a goal with friends
    Share {
        id: String,
        #[arg(required = true)]
        friend_ids: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct CreateGoalArgs {
    pub title: String,
    /// steps, distance, active_minutes or calories
    #[arg(long, default_value = "steps")]
    pub metric: GoalMetric,
    #[arg(long)]
    pub target: u64,
    /// daily, weekly or monthly
    #[arg(long, default_value = "daily")]
    pub period: Period,
}

#[derive(Args, Debug)]
pub struct StepsArgs {
    #[command(subcommand)]
    pub command: StepCommands,
}

#[derive(Subcommand, Debug)]
pub enum StepCommands {
    /// Today's step count
    Today,
    /// Step counts for a date range (YYYY-MM-DD)
    History { from: NaiveDate, to: NaiveDate },
    /// Upload a day's step count
    Sync { date: NaiveDate, count: u64 },
}

#[derive(Args, Debug)]
pub struct FriendsArgs {
    #[command(subcommand)]
    pub command: FriendCommands,
}

#[derive(Subcommand, Debug)]
pub enum FriendCommands {
    /// List friends
    List,
    /// Search users by name or email
    Search { query: String },
    /// Send a friend request
    Add { user_id: String },
    /// Show incoming friend requests
    Requests,
    /// Accept a friend request
    Accept { request_id: String },
    /// Remove a friend
    Remove { friend_id: String },
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Show the leaderboard for this period instead of the summary
    #[arg(long)]
    pub leaderboard: Option<Period>,
}
