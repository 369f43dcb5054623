//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use fleet_agent::app::AgentContext;
use fleet_agent::commands;
use fleet_agent::infra::config::load_from_env;

/// Executes controller-issued actions on a managed VM
#[derive(Parser)]
#[command(
    name = "fleet-agent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported action names
    Actions,

    /// Run one action and print its result as JSON
    Invoke(commands::invoke::InvokeArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Actions => {
                commands::actions::run();
                Ok(())
            }
            Command::Invoke(args) => {
                let config = load_from_env()?;
                let ctx = AgentContext::from_config(config)?;
                commands::invoke::run(&ctx, args).await
            }
        }
    }
}
