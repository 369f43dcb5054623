//! Concrete actions, one per controller method.

mod apply;
mod get_state;
mod get_task;
mod logs;
mod ping;
mod ssh;

pub use apply::ApplyAction;
pub use get_state::GetStateAction;
pub use get_task::GetTaskAction;
pub use logs::LogsAction;
pub use ping::PingAction;
pub use ssh::SshAction;

use serde_json::Value;

use crate::domain::ActionError;

/// Positional argument `index` as a string.
fn string_arg<'a>(
    action: &'static str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, ActionError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| ActionError::invalid(action, format!("argument {index} must be a string")))
}
