//! Reads the settings document delivered by the infrastructure.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::Settings;

/// Load and parse the JSON settings file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid settings JSON.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    tracing::info!(agent_id = %settings.agent_id, path = %path.display(), "settings loaded");
    Ok(settings)
}
