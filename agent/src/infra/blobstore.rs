//! Blobstore implementations and provider selection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::fs::sha256_file;
use crate::application::ports::Blobstore;
use crate::domain::SettingsError;
use crate::domain::settings::BlobstoreSettings;

/// Provider name for [`LocalBlobstore`].
pub const LOCAL_PROVIDER: &str = "local";

/// Content-addressed blobstore backed by a local (or mounted) directory.
///
/// Blob ids are the SHA-256 of the content, so re-uploading identical
/// content is idempotent.
#[derive(Debug, Clone)]
pub struct LocalBlobstore {
    dir: PathBuf,
}

impl LocalBlobstore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, blob_id: &str) -> Result<PathBuf> {
        anyhow::ensure!(
            blob_id.len() == 64 && blob_id.chars().all(|c| c.is_ascii_hexdigit()),
            "malformed blob id '{blob_id}'"
        );
        Ok(self.dir.join(blob_id))
    }
}

#[async_trait]
impl Blobstore for LocalBlobstore {
    async fn create(&self, path: &Path) -> Result<String> {
        let src = path.to_path_buf();
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating blobstore dir {}", dir.display()))?;
            let blob_id = sha256_file(&src)?;
            let dest = dir.join(&blob_id);
            std::fs::copy(&src, &dest)
                .with_context(|| format!("storing {} as {}", src.display(), dest.display()))?;
            Ok::<String, anyhow::Error>(blob_id)
        })
        .await
        .context("spawn_blocking for blobstore create")?
    }

    async fn get(&self, blob_id: &str, dest: &Path) -> Result<()> {
        let src = self.blob_path(blob_id)?;
        anyhow::ensure!(src.is_file(), "blob '{blob_id}' not found");
        tokio::fs::copy(&src, dest)
            .await
            .with_context(|| format!("fetching blob {blob_id} to {}", dest.display()))?;
        Ok(())
    }
}

/// Build the blobstore named by `settings.provider`.
///
/// # Errors
///
/// Returns `SettingsError` when the provider is unknown or misconfigured.
pub fn blobstore_from_settings(
    settings: &BlobstoreSettings,
) -> Result<Arc<dyn Blobstore>, SettingsError> {
    match settings.provider.as_str() {
        LOCAL_PROVIDER => {
            let path = settings
                .options
                .get("blobstore_path")
                .and_then(serde_json::Value::as_str)
                .ok_or(SettingsError::MissingBlobstoreOption("blobstore_path"))?;
            Ok(Arc::new(LocalBlobstore::new(path)))
        }
        other => Err(SettingsError::UnsupportedBlobstore(other.to_string())),
    }
}
