//! Domain layer: pure types, vocabulary, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod logs;
pub mod method;
pub mod settings;
pub mod spec;
pub mod ssh;
pub mod task;

pub use config::{AgentConfig, AgentDirs};
pub use error::{ActionError, SettingsError};
pub use logs::LogType;
pub use method::Method;
pub use settings::Settings;
pub use spec::ApplySpec;
pub use ssh::{SshCommand, SshParams};
pub use task::{TaskId, TaskInfo, TaskState};
