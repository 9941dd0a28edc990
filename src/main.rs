//! Stride CLI binary entry point.

use clap::Parser;
use stride::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env("STRIDE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = stride::cli::handlers::run(cli).await {
        eprintln!("Error: {e}");
        if e.requires_login() {
            eprintln!("Run `stride auth login <email>` to sign in again.");
        }
        std::process::exit(1);
    }
}
