//! Agent context: the collaborators and registry built once at startup.
//!
//! Whatever receives controller requests holds an `AgentContext` (or clones
//! of its `Arc`s) and resolves every request through `factory`.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ActionFactory;
use crate::domain::AgentConfig;
use crate::infra::settings::load_settings;
use crate::infra::{InMemoryTaskService, LinuxPlatform, blobstore_from_settings};

/// Unified agent state passed to request handlers.
pub struct AgentContext {
    pub config: AgentConfig,
    pub factory: Arc<ActionFactory>,
}

impl AgentContext {
    /// Load settings and wire the production collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be loaded or names an
    /// unsupported blobstore.
    pub fn from_config(config: AgentConfig) -> Result<Self> {
        let settings = load_settings(&config.settings_path())?;
        let blobstore =
            blobstore_from_settings(&settings.blobstore).context("configuring blobstore")?;
        let platform = Arc::new(LinuxPlatform::default_runner(
            config.dirs(),
            config.command_timeout(),
        ));
        let tasks = Arc::new(InMemoryTaskService::new());

        let factory = ActionFactory::new(settings, platform, blobstore, tasks);
        tracing::info!(
            base_dir = %config.base_dir.display(),
            methods = ?factory.methods(),
            "agent context ready",
        );

        Ok(Self {
            config,
            factory: Arc::new(factory),
        })
    }
}
