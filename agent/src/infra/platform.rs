//! Linux implementation of the `Platform` port.
//!
//! User management shells out to the shadow-utils binaries through a
//! `CommandRunner`; file work goes through `OsFileSystem`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use regex::Regex;

use super::command_runner::{TokioCommandRunner, ensure_success};
use super::fs::OsFileSystem;
use crate::application::ports::{CommandRunner, FileSystem, Platform};
use crate::domain::AgentDirs;
use crate::domain::logs::glob_to_regex;

/// Default location of the account database.
pub const PASSWD_PATH: &str = "/etc/passwd";

/// One line of `/etc/passwd`, reduced to what the agent needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub home: PathBuf,
}

/// Parse `passwd(5)` content, skipping blank, comment and malformed lines.
#[must_use]
pub fn parse_passwd(content: &str) -> Vec<PasswdEntry> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() < 7 || fields[0].is_empty() {
                return None;
            }
            Some(PasswdEntry {
                name: fields[0].to_string(),
                home: PathBuf::from(fields[5]),
            })
        })
        .collect()
}

/// Production platform for Linux hosts.
pub struct LinuxPlatform<R> {
    fs: Arc<OsFileSystem>,
    dirs: AgentDirs,
    runner: R,
    passwd_path: PathBuf,
}

impl<R: CommandRunner> LinuxPlatform<R> {
    #[must_use]
    pub fn new(dirs: AgentDirs, runner: R) -> Self {
        Self {
            fs: Arc::new(OsFileSystem),
            dirs,
            runner,
            passwd_path: PathBuf::from(PASSWD_PATH),
        }
    }

    /// Read accounts from `path` instead of `/etc/passwd`.
    #[must_use]
    pub fn with_passwd_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd_path = path.into();
        self
    }

    async fn run_checked(&self, program: &str, args: &[&str]) -> Result<()> {
        let output = self.runner.run(program, args).await?;
        ensure_success(program, &output)
    }

    fn accounts(&self) -> Result<Vec<PasswdEntry>> {
        let content = self.fs.read_to_string(&self.passwd_path)?;
        Ok(parse_passwd(&content))
    }

    fn home_of(&self, user: &str) -> Result<PathBuf> {
        self.accounts()?
            .into_iter()
            .find(|entry| entry.name == user)
            .map(|entry| entry.home)
            .ok_or_else(|| anyhow::anyhow!("user '{user}' does not exist"))
    }
}

impl LinuxPlatform<TokioCommandRunner> {
    /// Platform backed by a `TokioCommandRunner` with the given timeout.
    #[must_use]
    pub fn default_runner(dirs: AgentDirs, timeout: Duration) -> Self {
        Self::new(dirs, TokioCommandRunner::new(timeout))
    }
}

#[async_trait]
impl<R: CommandRunner> Platform for LinuxPlatform<R> {
    fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs) as Arc<dyn FileSystem>
    }

    fn dirs(&self) -> &AgentDirs {
        &self.dirs
    }

    async fn create_user(
        &self,
        user: &str,
        password: Option<&str>,
        base_dir: &Path,
    ) -> Result<()> {
        self.fs.create_dir_all(base_dir)?;
        let base = base_dir.to_string_lossy();
        let mut args = vec!["-m", "-b", &*base, "-s", "/bin/bash"];
        if let Some(password) = password {
            args.extend(["-p", password]);
        }
        args.push(user);
        self.run_checked("useradd", &args).await
    }

    async fn add_user_to_groups(&self, user: &str, groups: &[&str]) -> Result<()> {
        let groups = groups.join(",");
        self.run_checked("usermod", &["-G", groups.as_str(), user])
            .await
    }

    async fn setup_ssh(&self, user: &str, public_key: &str) -> Result<()> {
        let ssh_dir = self.home_of(user)?.join(".ssh");
        let authorized_keys = ssh_dir.join("authorized_keys");

        self.fs.create_dir_all(&ssh_dir)?;
        self.fs.set_permissions(&ssh_dir, 0o700)?;
        self.fs
            .write_private(&authorized_keys, &format!("{}\n", public_key.trim()))?;

        let owner = format!("{user}:{user}");
        let ssh_dir = ssh_dir.to_string_lossy();
        self.run_checked("chown", &["-R", owner.as_str(), &*ssh_dir])
            .await
    }

    async fn delete_ephemeral_users_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher =
            Regex::new(pattern).with_context(|| format!("invalid user pattern '{pattern}'"))?;
        let users: Vec<String> = self
            .accounts()?
            .into_iter()
            .map(|entry| entry.name)
            .filter(|name| matcher.is_match(name))
            .collect();

        for user in &users {
            self.run_checked("userdel", &["-r", user.as_str()]).await?;
            tracing::debug!(user = %user, "deleted ephemeral user");
        }
        Ok(users)
    }

    async fn compress_files_in_dir(&self, dir: &Path, filters: &[String]) -> Result<PathBuf> {
        let tmp_dir = self.dirs.tmp_dir();
        self.fs.create_dir_all(&tmp_dir)?;

        let dir = dir.to_path_buf();
        let filters = filters.to_vec();
        tokio::task::spawn_blocking(move || write_tarball(&dir, &filters, &tmp_dir))
            .await
            .context("spawn_blocking for compress_files_in_dir")?
    }
}

/// Pack every file below `dir` matching one of `filters` into a new
/// `.tgz` inside `tmp_dir`.
fn write_tarball(dir: &Path, filters: &[String], tmp_dir: &Path) -> Result<PathBuf> {
    let matchers = filters
        .iter()
        .map(|glob| {
            Regex::new(&glob_to_regex(glob)).with_context(|| format!("invalid filter '{glob}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::new();
    if dir.is_dir() {
        collect_files(dir, dir, &mut files)?;
    }
    files.retain(|rel| {
        let rel = rel.to_string_lossy();
        matchers.iter().any(|m| m.is_match(&rel))
    });
    files.sort();

    let (file, path) = tempfile::Builder::new()
        .prefix("logs-")
        .suffix(".tgz")
        .tempfile_in(tmp_dir)
        .with_context(|| format!("creating tarball in {}", tmp_dir.display()))?
        .keep()
        .context("keeping tarball")?;

    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for rel in &files {
        builder
            .append_path_with_name(dir.join(rel), rel)
            .with_context(|| format!("adding {} to tarball", rel.display()))?;
    }
    builder
        .into_inner()
        .context("finishing tar stream")?
        .finish()
        .context("finishing gzip stream")?;

    tracing::debug!(count = files.len(), path = %path.display(), "logs compressed");
    Ok(path)
}

fn collect_files(root: &Path, current: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(current)
        .with_context(|| format!("reading directory {}", current.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", current.display()))?;
        let file_type = entry.file_type().context("reading file type")?;
        let path = entry.path();
        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            let rel = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            out.push(rel);
        }
    }
    Ok(())
}
