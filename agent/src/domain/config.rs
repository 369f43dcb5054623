//! Process-level configuration and the on-disk directory layout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Agent configuration, loaded from `FLEET_AGENT_*` environment variables.
///
/// Each field maps to `FLEET_AGENT_<FIELD>`:
///   - `FLEET_AGENT_BASE_DIR`             (default `/var/fleet`)
///   - `FLEET_AGENT_SETTINGS_PATH`        (default `<base_dir>/agent/settings.json`)
///   - `FLEET_AGENT_COMMAND_TIMEOUT_SECS` (default `30`)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    /// Root of everything the agent reads and writes.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Explicit settings file location.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// Upper bound for a single host command.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("/var/fleet")
}

const fn default_command_timeout_secs() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            settings_path: None,
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl AgentConfig {
    #[must_use]
    pub fn dirs(&self) -> AgentDirs {
        AgentDirs::new(&self.base_dir)
    }

    /// Settings file, honouring an explicit override.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(|| self.dirs().settings_json())
    }

    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Well-known paths below the agent base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDirs {
    base: PathBuf,
}

impl AgentDirs {
    #[must_use]
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `<base>/agent`: the agent's private state.
    #[must_use]
    pub fn agent_dir(&self) -> PathBuf {
        self.base.join("agent")
    }

    #[must_use]
    pub fn settings_json(&self) -> PathBuf {
        self.agent_dir().join("settings.json")
    }

    /// Last spec applied by the controller.
    #[must_use]
    pub fn spec_json(&self) -> PathBuf {
        self.agent_dir().join("spec.json")
    }

    #[must_use]
    pub fn agent_logs_dir(&self) -> PathBuf {
        self.agent_dir().join("log")
    }

    /// Logs written by jobs running on the VM.
    #[must_use]
    pub fn job_logs_dir(&self) -> PathBuf {
        self.base.join("sys").join("log")
    }

    /// Home directories for ephemeral SSH users.
    #[must_use]
    pub fn ssh_users_dir(&self) -> PathBuf {
        self.base.join("agent_ssh")
    }

    #[must_use]
    pub fn tmp_dir(&self) -> PathBuf {
        self.base.join("data").join("tmp")
    }
}
