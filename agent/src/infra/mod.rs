//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, user management, log archiving, blob storage, and task tracking.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` are forbidden.

pub mod blobstore;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod platform;
pub mod settings;
pub mod task;

pub use blobstore::{LocalBlobstore, blobstore_from_settings};
pub use command_runner::TokioCommandRunner;
pub use fs::OsFileSystem;
pub use platform::LinuxPlatform;
pub use task::InMemoryTaskService;
