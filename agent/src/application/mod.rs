//! Application layer: port traits, the action contract, and dispatch.
//!
//! This module depends only on `crate::domain` and never on `crate::infra`
//! or `crate::commands`.

pub mod action;
pub mod actions;
pub mod factory;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use action::Action;
pub use factory::ActionFactory;
pub use ports::{Blobstore, CommandRunner, FileSystem, Platform, TaskFuture, TaskService};
