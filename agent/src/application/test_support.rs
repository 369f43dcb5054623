//! Shared stub collaborators for action and factory tests.
//!
//! Each stub records what it was asked to do so tests can assert on the
//! calls without touching the host.

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use super::ports::{Blobstore, FileSystem, Platform, TaskFuture, TaskService};
use crate::domain::{AgentDirs, Settings, TaskId, TaskInfo};

// ── Filesystem ────────────────────────────────────────────────────────────────

/// In-memory filesystem keyed by full path.
#[derive(Default)]
pub struct MemoryFs {
    pub files: Mutex<HashMap<PathBuf, String>>,
    pub modes: Mutex<HashMap<PathBuf, u32>>,
}

impl MemoryFs {
    pub fn with_file(path: impl Into<PathBuf>, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .expect("lock")
            .insert(path.into(), content.to_string());
        fs
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("lock").get(path).cloned()
    }

    pub fn mode(&self, path: &Path) -> Option<u32> {
        self.modes.lock().expect("lock").get(path).copied()
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().expect("lock").contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.get(path)
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path.display()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn write_private(&self, path: &Path, content: &str) -> Result<()> {
        self.modes
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), 0o600);
        self.write(path, content)
    }

    fn create_dir_all(&self, _: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files
            .lock()
            .expect("lock")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path.display()))
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.modes
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), mode);
        Ok(())
    }
}

// ── Platform ──────────────────────────────────────────────────────────────────

/// Platform stub that records calls and produces a fixed tarball path.
pub struct StubPlatform {
    pub fs: Arc<MemoryFs>,
    pub dirs: AgentDirs,
    pub calls: Mutex<Vec<String>>,
    pub deletable_users: Vec<String>,
    pub fail_compress: bool,
}

impl StubPlatform {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(MemoryFs::default()))
    }

    pub fn with_fs(fs: Arc<MemoryFs>) -> Self {
        Self {
            fs,
            dirs: AgentDirs::new("/var/fleet"),
            calls: Mutex::new(Vec::new()),
            deletable_users: Vec::new(),
            fail_compress: false,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    pub fn tarball_path(&self) -> PathBuf {
        self.dirs.tmp_dir().join("logs.tgz")
    }
}

#[async_trait]
impl Platform for StubPlatform {
    fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs) as Arc<dyn FileSystem>
    }

    fn dirs(&self) -> &AgentDirs {
        &self.dirs
    }

    async fn create_user(&self, user: &str, password: Option<&str>, base_dir: &Path) -> Result<()> {
        self.record(format!(
            "create_user {user} {} {}",
            password.unwrap_or("-"),
            base_dir.display()
        ));
        Ok(())
    }

    async fn add_user_to_groups(&self, user: &str, groups: &[&str]) -> Result<()> {
        self.record(format!("add_user_to_groups {user} {}", groups.join(",")));
        Ok(())
    }

    async fn setup_ssh(&self, user: &str, public_key: &str) -> Result<()> {
        self.record(format!("setup_ssh {user} {public_key}"));
        Ok(())
    }

    async fn delete_ephemeral_users_matching(&self, pattern: &str) -> Result<Vec<String>> {
        self.record(format!("delete_ephemeral_users_matching {pattern}"));
        Ok(self.deletable_users.clone())
    }

    async fn compress_files_in_dir(&self, dir: &Path, filters: &[String]) -> Result<PathBuf> {
        self.record(format!(
            "compress_files_in_dir {} {}",
            dir.display(),
            filters.join(",")
        ));
        if self.fail_compress {
            anyhow::bail!("tar failed");
        }
        let tarball = self.tarball_path();
        self.fs.write(&tarball, "tarball")?;
        Ok(tarball)
    }
}

// ── Blobstore ─────────────────────────────────────────────────────────────────

/// Blobstore stub that hands out sequential ids.
#[derive(Default)]
pub struct StubBlobstore {
    pub uploads: Mutex<Vec<PathBuf>>,
    pub fail: bool,
}

#[async_trait]
impl Blobstore for StubBlobstore {
    async fn create(&self, path: &Path) -> Result<String> {
        if self.fail {
            anyhow::bail!("blobstore unavailable");
        }
        let mut uploads = self.uploads.lock().expect("lock");
        uploads.push(path.to_path_buf());
        Ok(format!("blob-{}", uploads.len()))
    }

    async fn get(&self, blob_id: &str, _: &Path) -> Result<()> {
        anyhow::bail!("blob {blob_id} not found")
    }
}

// ── Task service ──────────────────────────────────────────────────────────────

/// Task service stub: `start` records a running task and drops the work.
#[derive(Default)]
pub struct StubTaskService {
    pub tasks: Mutex<HashMap<String, TaskInfo>>,
}

impl StubTaskService {
    pub fn insert(&self, info: TaskInfo) {
        self.tasks
            .lock()
            .expect("lock")
            .insert(info.id.as_str().to_string(), info);
    }
}

impl TaskService for StubTaskService {
    fn start(&self, method: &str, _task: TaskFuture) -> TaskInfo {
        let mut tasks = self.tasks.lock().expect("lock");
        let info = TaskInfo::running(
            TaskId::new(format!("stub-{}", tasks.len() + 1)),
            method,
            Utc::now(),
        );
        tasks.insert(info.id.as_str().to_string(), info.clone());
        info
    }

    fn find(&self, id: &str) -> Option<TaskInfo> {
        self.tasks.lock().expect("lock").get(id).cloned()
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Minimal settings with one gateway network.
pub fn settings() -> Settings {
    serde_json::from_value(serde_json::json!({
        "agent_id": "agent-test",
        "blobstore": {"provider": "local", "options": {"blobstore_path": "/tmp/blobs"}},
        "networks": {"default": {"default": ["dns", "gateway"], "ip": "10.0.0.5"}},
        "vm": {"name": "vm-test"}
    }))
    .expect("valid settings")
}
