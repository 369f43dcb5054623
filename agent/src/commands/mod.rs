//! Command handlers for the `fleet-agent` binary.

pub mod actions;
pub mod invoke;
