use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::application::action::Action;
use crate::application::ports::FileSystem;
use crate::domain::{ActionError, ApplySpec, Settings};

/// Protocol version reported to the controller.
pub const PROTOCOL_VERSION: &str = "1";

/// Reports the agent's identity together with the last applied spec.
pub struct GetStateAction {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    spec_path: PathBuf,
}

impl GetStateAction {
    #[must_use]
    pub fn new(settings: Arc<Settings>, fs: Arc<dyn FileSystem>, spec_path: PathBuf) -> Self {
        Self {
            settings,
            fs,
            spec_path,
        }
    }

    fn applied_spec(&self) -> anyhow::Result<Option<ApplySpec>> {
        if !self.fs.exists(&self.spec_path) {
            return Ok(None);
        }
        let content = self.fs.read_to_string(&self.spec_path)?;
        let spec = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.spec_path.display()))?;
        Ok(Some(spec))
    }
}

#[async_trait]
impl Action for GetStateAction {
    async fn run(&self, _args: &[Value]) -> Result<Value, ActionError> {
        let spec = self.applied_spec()?;
        let job_state = if spec.is_some() { "running" } else { "unknown" };

        let mut state: Map<String, Value> = spec.map(ApplySpec::into_map).unwrap_or_default();
        state.insert("agent_id".into(), json!(self.settings.agent_id));
        state.insert("bosh_protocol".into(), json!(PROTOCOL_VERSION));
        state.insert("job_state".into(), json!(job_state));
        state.insert("vm".into(), json!({ "name": self.settings.vm.name }));
        Ok(Value::Object(state))
    }
}
