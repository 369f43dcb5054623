//! Use-case orchestration on top of the action registry.

pub mod invoke;

pub use invoke::{Invocation, await_task, invoke};
