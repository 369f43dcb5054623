//! Operation-name vocabulary shared with the controller.

use std::fmt;
use std::str::FromStr;

use super::error::ActionError;

/// A controller method the agent knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Apply,
    Ping,
    GetTask,
    GetState,
    Ssh,
    FetchLogs,
}

impl Method {
    /// Every supported method, in registration order.
    pub const ALL: [Self; 6] = [
        Self::Apply,
        Self::Ping,
        Self::GetTask,
        Self::GetState,
        Self::Ssh,
        Self::FetchLogs,
    ];

    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Ping => "ping",
            Self::GetTask => "get_task",
            Self::GetState => "get_state",
            Self::Ssh => "ssh",
            Self::FetchLogs => "fetch_logs",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}
