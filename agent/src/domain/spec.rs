//! The apply spec: the controller's description of what should run here.
//!
//! The agent treats the spec as an opaque JSON object; only a couple of
//! well-known keys are read for logging.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object previously delivered by `apply`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ApplySpec(Map<String, Value>);

impl ApplySpec {
    /// Accept a JSON value only if it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    #[must_use]
    pub fn deployment(&self) -> Option<&str> {
        self.0.get("deployment").and_then(Value::as_str)
    }

    /// `job.name`, when the spec carries one.
    #[must_use]
    pub fn job_name(&self) -> Option<&str> {
        self.0
            .get("job")
            .and_then(|job| job.get("name"))
            .and_then(Value::as_str)
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
