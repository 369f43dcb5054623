//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! Every port is `Send + Sync`: a single instance is shared by all actions
//! that need it and may be used from concurrently running tasks.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::domain::{ActionError, AgentDirs, TaskInfo};

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts raw file operations so actions can be tested against memory.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Write `content` to a file only its owner can read. The file never
    /// holds content under a wider mode, even when it already existed.
    fn write_private(&self, path: &Path, content: &str) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program with the runner's default timeout and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Platform Port ─────────────────────────────────────────────────────────────

/// Host-level capabilities needed by actions.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Filesystem handle. Called once by the factory and shared thereafter.
    fn fs(&self) -> Arc<dyn FileSystem>;

    /// Directory layout this platform operates in.
    fn dirs(&self) -> &AgentDirs;

    /// Create a login user whose home lives below `base_dir`.
    async fn create_user(&self, user: &str, password: Option<&str>, base_dir: &Path)
    -> Result<()>;

    async fn add_user_to_groups(&self, user: &str, groups: &[&str]) -> Result<()>;

    /// Install `public_key` as the user's only authorized key.
    async fn setup_ssh(&self, user: &str, public_key: &str) -> Result<()>;

    /// Delete every user whose name matches `pattern`; returns the deleted names.
    async fn delete_ephemeral_users_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Pack the files below `dir` matching any of `filters` into a gzipped
    /// tarball and return its path. The caller owns the tarball.
    async fn compress_files_in_dir(&self, dir: &Path, filters: &[String]) -> Result<PathBuf>;
}

// ── Blobstore Port ────────────────────────────────────────────────────────────

/// Opaque content storage shared with the controller.
#[async_trait]
pub trait Blobstore: Send + Sync {
    /// Upload the file at `path`; returns the blob id.
    async fn create(&self, path: &Path) -> Result<String>;
    /// Download blob `blob_id` into `dest`.
    async fn get(&self, blob_id: &str, dest: &Path) -> Result<()>;
}

// ── Task Service Port ─────────────────────────────────────────────────────────

/// Work handed to the task service.
pub type TaskFuture = BoxFuture<'static, Result<Value, ActionError>>;

/// Tracks long-running actions so the controller can poll them.
pub trait TaskService: Send + Sync {
    /// Start `task` in the background and return its running snapshot.
    fn start(&self, method: &str, task: TaskFuture) -> TaskInfo;
    /// Latest snapshot of task `id`.
    fn find(&self, id: &str) -> Option<TaskInfo>;
}
