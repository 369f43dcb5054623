//! Loads `AgentConfig` from the process environment.

use anyhow::{Context, Result};

use crate::domain::AgentConfig;

/// Prefix of every agent environment variable.
pub const ENV_PREFIX: &str = "FLEET_AGENT_";

/// Read `FLEET_AGENT_*` variables from the process environment.
///
/// # Errors
///
/// Returns an error if a variable is present but cannot be parsed.
pub fn load_from_env() -> Result<AgentConfig> {
    envy::prefixed(ENV_PREFIX)
        .from_env()
        .with_context(|| format!("failed to load config from {ENV_PREFIX}* env vars"))
}

/// Same as [`load_from_env`] over an explicit set of variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed.
pub fn load_from_iter<I>(vars: I) -> Result<AgentConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    envy::prefixed(ENV_PREFIX)
        .from_iter(vars)
        .with_context(|| format!("failed to load config from {ENV_PREFIX}* vars"))
}
