//! Stride: client SDK for the Stride fitness-tracking API.
//!
//! Wraps the REST backend (goals, steps, friends, dashboard) behind an
//! authenticated client that attaches the stored access token to every
//! request and transparently refreshes it on expiry, issuing at most one
//! refresh no matter how many requests fail at once.
//!
//! # Quick Start
//!
//! ```no_run
//! use stride::prelude::*;
//!
//! # async fn example() -> stride::error::Result<()> {
//! let client = ApiClient::from_config(&StrideConfig::from_env()?)?;
//! SessionService::new(client.clone())
//!     .login("runner@example.com", "hunter2")
//!     .await?;
//! for goal in GoalService::new(client).list().await? {
//!     println!("{}: {:.0}%", goal.title, goal.progress_ratio() * 100.0);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod services;
pub mod transport;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
