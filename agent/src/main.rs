//! Fleet agent - executes controller-issued actions on a managed VM

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout carries only action results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
