//! `fleet-agent actions`: list the methods the agent answers.

use crate::domain::Method;

/// Print one supported method per line.
pub fn run() {
    let mut names: Vec<_> = Method::ALL.iter().map(|m| m.as_str()).collect();
    names.sort_unstable();
    for name in names {
        println!("{name}");
    }
}
