use async_trait::async_trait;
use serde_json::Value;

use crate::application::action::Action;
use crate::domain::ActionError;

/// Liveness probe. Needs no collaborators.
#[derive(Debug, Default, Clone, Copy)]
pub struct PingAction;

#[async_trait]
impl Action for PingAction {
    async fn run(&self, _args: &[Value]) -> Result<Value, ActionError> {
        Ok(Value::from("pong"))
    }
}
