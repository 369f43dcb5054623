//! `fleet-agent invoke`: run one action locally and print its JSON result.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::app::AgentContext;
use crate::application::services::{Invocation, await_task, invoke};

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Method name, e.g. `ping` or `get_state`
    pub method: String,

    /// Positional arguments as a JSON array
    #[arg(long, default_value = "[]")]
    pub args: String,

    /// How often to poll a started task, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub poll_ms: u64,
}

/// Parse the `--args` value into positional arguments.
///
/// # Errors
///
/// Returns an error unless `raw` is a JSON array.
pub fn parse_args(raw: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(raw).context("--args must be valid JSON")? {
        Value::Array(items) => Ok(items),
        other => anyhow::bail!("--args must be a JSON array, got {other}"),
    }
}

/// Invoke the method, wait for it if it runs as a task, and print the result.
///
/// # Errors
///
/// Returns an error if the method is unknown, the arguments are malformed,
/// or the action fails.
pub async fn run(ctx: &AgentContext, args: InvokeArgs) -> Result<()> {
    let positional = parse_args(&args.args)?;
    let result = match invoke(&ctx.factory, &args.method, positional).await? {
        Invocation::Completed(value) => value,
        Invocation::Started(task) => {
            tracing::info!(task_id = %task.id, "waiting for task");
            await_task(
                ctx.factory.tasks(),
                task.id.as_str(),
                Duration::from_millis(args.poll_ms),
            )
            .await?
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("serializing result")?
    );
    Ok(())
}
