use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::string_arg;
use crate::application::action::Action;
use crate::application::ports::TaskService;
use crate::domain::ActionError;

/// Reports progress or the result of a previously started task.
pub struct GetTaskAction {
    task_service: Arc<dyn TaskService>,
}

impl GetTaskAction {
    #[must_use]
    pub fn new(task_service: Arc<dyn TaskService>) -> Self {
        Self { task_service }
    }
}

#[async_trait]
impl Action for GetTaskAction {
    async fn run(&self, args: &[Value]) -> Result<Value, ActionError> {
        let id = string_arg("get_task", args, 0)?;
        let info = self
            .task_service
            .find(id)
            .ok_or_else(|| ActionError::TaskNotFound(id.to_string()))?;

        let handle = info.handle();
        match info.into_outcome() {
            None => Ok(handle),
            Some(outcome) => outcome,
        }
    }
}
