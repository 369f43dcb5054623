//! Asynchronous task bookkeeping.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ActionError;

/// Identifier handed back to the controller for a long-running action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a task. Only `Running` can change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum TaskState {
    Running,
    Done { value: Value },
    Failed { error: String },
}

/// Snapshot of a task as recorded by the task service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: TaskId,
    pub method: String,
    #[serde(flatten)]
    pub state: TaskState,
    pub started_at: DateTime<Utc>,
}

impl TaskInfo {
    #[must_use]
    pub fn running(id: TaskId, method: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            method: method.into(),
            state: TaskState::Running,
            started_at,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TaskState::Running)
    }

    /// Final result of a finished task, `None` while it is still running.
    #[must_use]
    pub fn into_outcome(self) -> Option<Result<Value, ActionError>> {
        match self.state {
            TaskState::Running => None,
            TaskState::Done { value } => Some(Ok(value)),
            TaskState::Failed { error } => Some(Err(ActionError::TaskFailed {
                id: self.id.0,
                message: error,
            })),
        }
    }

    /// The handle the controller polls with `get_task`.
    #[must_use]
    pub fn handle(&self) -> Value {
        serde_json::json!({
            "agent_task_id": self.id.as_str(),
            "state": "running",
        })
    }
}
