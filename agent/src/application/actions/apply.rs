use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use crate::application::action::Action;
use crate::application::ports::FileSystem;
use crate::domain::{ActionError, ApplySpec};

/// Persists the controller's apply spec.
pub struct ApplyAction {
    fs: Arc<dyn FileSystem>,
    spec_path: PathBuf,
}

impl ApplyAction {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, spec_path: PathBuf) -> Self {
        Self { fs, spec_path }
    }
}

#[async_trait]
impl Action for ApplyAction {
    async fn run(&self, args: &[Value]) -> Result<Value, ActionError> {
        let spec = args
            .first()
            .cloned()
            .and_then(ApplySpec::from_value)
            .ok_or_else(|| ActionError::invalid("apply", "argument 0 must be a spec object"))?;

        tracing::info!(
            deployment = spec.deployment().unwrap_or("-"),
            job = spec.job_name().unwrap_or("-"),
            "applying spec",
        );

        if let Some(parent) = self.spec_path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&spec).context("serializing apply spec")?;
        self.fs.write_private(&self.spec_path, &content)?;

        Ok(Value::from("applied"))
    }

    fn is_asynchronous(&self) -> bool {
        true
    }
}
