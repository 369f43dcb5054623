//! The contract every controller-invocable operation satisfies.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ActionError;

/// One invocable operation, bound at construction to the collaborators it needs.
///
/// Object-safe: the factory stores actions as `Arc<dyn Action>`.
#[async_trait]
pub trait Action: Send + Sync {
    /// Perform the operation with the controller's positional arguments.
    ///
    /// Errors are the action's own; callers propagate them unchanged.
    async fn run(&self, args: &[Value]) -> Result<Value, ActionError>;

    /// Long-running actions are started on the task service instead of
    /// being awaited inline.
    fn is_asynchronous(&self) -> bool {
        false
    }
}
