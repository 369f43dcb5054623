//! Resolve a method and run it, inline or as a background task.

use std::time::Duration;

use serde_json::Value;

use crate::application::factory::ActionFactory;
use crate::application::ports::TaskService;
use crate::domain::{ActionError, TaskInfo};

/// Outcome of handing a method to the agent.
#[derive(Debug)]
pub enum Invocation {
    /// A synchronous action finished with this value.
    Completed(Value),
    /// An asynchronous action was started; poll it with `get_task`.
    Started(TaskInfo),
}

impl Invocation {
    /// The value the controller receives in reply.
    #[must_use]
    pub fn into_reply(self) -> Value {
        match self {
            Self::Completed(value) => value,
            Self::Started(info) => info.handle(),
        }
    }
}

/// Resolve `method` and run it. Asynchronous actions are started on the
/// factory's own task service, so `get_task` can always find them.
///
/// # Errors
///
/// Returns `ActionError::UnknownAction` for unsupported methods; errors from
/// synchronous actions are returned unchanged.
pub async fn invoke(
    factory: &ActionFactory,
    method: &str,
    args: Vec<Value>,
) -> Result<Invocation, ActionError> {
    let action = factory.require(method)?;

    if action.is_asynchronous() {
        let task = factory.tasks().start(
            method,
            Box::pin(async move { action.run(&args).await }),
        );
        tracing::debug!(method, task_id = %task.id, "action started as task");
        return Ok(Invocation::Started(task));
    }

    tracing::debug!(method, "running action inline");
    action.run(&args).await.map(Invocation::Completed)
}

/// Poll `tasks` until task `id` finishes.
///
/// # Errors
///
/// Returns `ActionError::TaskNotFound` if the task disappears and
/// `ActionError::TaskFailed` if it failed.
pub async fn await_task(
    tasks: &dyn TaskService,
    id: &str,
    poll_interval: Duration,
) -> Result<Value, ActionError> {
    loop {
        let info = tasks
            .find(id)
            .ok_or_else(|| ActionError::TaskNotFound(id.to_string()))?;
        if let Some(outcome) = info.into_outcome() {
            return outcome;
        }
        tokio::time::sleep(poll_interval).await;
    }
}
