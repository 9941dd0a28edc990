//! CLI command handlers.

use chrono::Local;

use super::{
    AuthCommands, Cli, Commands, CreateGoalArgs, DashboardArgs, FriendCommands, GoalCommands,
    StepCommands,
};
use crate::client::ApiClient;
use crate::config::StrideConfig;
use crate::error::Result;
use crate::services::{DashboardService, FriendService, GoalService, SessionService, StepService};
use crate::types::{GoalUpdate, NewGoal, Period, StepEntry};

/// Resolve configuration from the environment plus CLI overrides.
pub fn resolve_config(cli: &Cli) -> Result<StrideConfig> {
    let mut config = StrideConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.clone())?;
    }
    if let Some(profile) = &cli.profile {
        config = config.with_profile(profile.clone());
    }
    Ok(config)
}

/// Run one parsed command to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let client = ApiClient::from_config(&config)?;

    match cli.command {
        Commands::Auth(args) => handle_auth(client, args.command).await,
        Commands::Goals(args) => handle_goals(client, args.command).await,
        Commands::Steps(args) => handle_steps(client, args.command).await,
        Commands::Friends(args) => handle_friends(client, args.command).await,
        Commands::Dashboard(args) => handle_dashboard(client, args).await,
    }
}

async fn handle_auth(client: ApiClient, command: AuthCommands) -> Result<()> {
    let session = SessionService::new(client);
    match command {
        AuthCommands::Login(args) => {
            let user = session.login(&args.email, &args.password).await?;
            println!("✅ Logged in as {} <{}>", user.name, user.email);
        }
        AuthCommands::Register(args) => {
            let user = session.register(&args.name, &args.email, &args.password).await?;
            println!("✅ Account created for {} <{}>", user.name, user.email);
        }
        AuthCommands::Status => {
            if !session.is_logged_in()? {
                println!("❌ Not logged in");
                return Ok(());
            }
            let user = session.current_user().await?;
            println!("✅ Logged in as {} <{}>", user.name, user.email);
        }
        AuthCommands::Logout => {
            session.logout().await?;
            println!("✅ Logged out");
        }
    }
    Ok(())
}

async fn handle_goals(client: ApiClient, command: GoalCommands) -> Result<()> {
    let goals = GoalService::new(client);
    match command {
        GoalCommands::List => {
            let list = goals.list().await?;
            if list.is_empty() {
                println!("No goals yet. Create one with `stride goals create`.");
            }
            for goal in list {
                let mark = if goal.completed { "✅" } else { "🎯" };
                println!(
                    "{mark} {} [{}] {} {}/{} {} ({:.0}%)",
                    goal.id,
                    goal.period,
                    goal.title,
                    goal.progress,
                    goal.target,
                    goal.metric,
                    goal.progress_ratio() * 100.0
                );
            }
        }
        GoalCommands::Create(CreateGoalArgs {
            title,
            metric,
            target,
            period,
        }) => {
            let new_goal = NewGoal::builder()
                .title(title)
                .metric(metric)
                .target(target)
                .period(period)
                .build();
            let goal = goals.create(&new_goal).await?;
            println!("✅ Created goal {} ({})", goal.title, goal.id);
        }
        GoalCommands::SetTarget { id, target } => {
            let update = GoalUpdate::builder().target(target).build();
            let goal = goals.update(&id, &update).await?;
            println!("✅ {} now targets {} {}", goal.title, goal.target, goal.metric);
        }
        GoalCommands::Delete { id } => {
            goals.delete(&id).await?;
            println!("✅ Deleted goal {id}");
        }
        GoalCommands::Share { id, friend_ids } => {
            let goal = goals.share(&id, &friend_ids).await?;
            println!(
                "✅ {} is shared with {} friend(s)",
                goal.title,
                goal.shared_with.len()
            );
        }
    }
    Ok(())
}

async fn handle_steps(client: ApiClient, command: StepCommands) -> Result<()> {
    let steps = StepService::new(client);
    match command {
        StepCommands::Today => {
            let today = steps.today().await?;
            println!("👟 {} steps today", today.count);
        }
        StepCommands::History { from, to } => {
            for entry in steps.history(from, to).await? {
                println!("{}  {:>7}", entry.date, entry.count);
            }
        }
        StepCommands::Sync { date, count } => {
            if date > Local::now().date_naive() {
                println!("⚠️  {date} is in the future; syncing anyway");
            }
            let mut entry = StepEntry::new(date, count);
            entry.source = Some("stride-cli".to_string());
            let summary = steps.sync(&[entry]).await?;
            println!(
                "✅ Synced {} entr{} ({} steps today)",
                summary.accepted,
                if summary.accepted == 1 { "y" } else { "ies" },
                summary.today_total
            );
        }
    }
    Ok(())
}

async fn handle_friends(client: ApiClient, command: FriendCommands) -> Result<()> {
    let friends = FriendService::new(client);
    match command {
        FriendCommands::List => {
            for friend in friends.list().await? {
                println!("{}  {}  {} steps today", friend.id, friend.name, friend.today_steps);
            }
        }
        FriendCommands::Search { query } => {
            for user in friends.search(&query).await? {
                let tag = if user.is_friend { " (friend)" } else { "" };
                println!("{}  {}{tag}", user.id, user.name);
            }
        }
        FriendCommands::Add { user_id } => {
            let request = friends.send_request(&user_id).await?;
            println!("✅ Friend request {} sent", request.id);
        }
        FriendCommands::Requests => {
            for request in friends.pending_requests().await? {
                println!(
                    "{}  from {} on {}",
                    request.id,
                    request.from.name,
                    request.created_at.format("%Y-%m-%d")
                );
            }
        }
        FriendCommands::Accept { request_id } => {
            let friend = friends.accept(&request_id).await?;
            println!("✅ You and {} are now friends", friend.name);
        }
        FriendCommands::Remove { friend_id } => {
            friends.remove(&friend_id).await?;
            println!("✅ Removed friend {friend_id}");
        }
    }
    Ok(())
}

async fn handle_dashboard(client: ApiClient, args: DashboardArgs) -> Result<()> {
    let dashboard = DashboardService::new(client);
    match args.leaderboard {
        Some(period) => print_leaderboard(&dashboard, period).await,
        None => {
            let summary = dashboard.summary().await?;
            println!("👟 Today:   {} steps", summary.today_steps);
            println!("📅 Week:    {} steps", summary.weekly_steps);
            println!("🔥 Streak:  {} day(s)", summary.streak_days);
            println!(
                "🎯 Goals:   {} active, {} completed",
                summary.active_goals, summary.completed_goals
            );
            Ok(())
        }
    }
}

async fn print_leaderboard(dashboard: &DashboardService, period: Period) -> Result<()> {
    println!("🏆 {period} leaderboard");
    for entry in dashboard.leaderboard(period).await? {
        println!("{:>3}. {:<24} {:>8}", entry.rank, entry.name, entry.steps);
    }
    Ok(())
}
