//! Ephemeral SSH access requests.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Every user created through `ssh setup` carries this prefix, which is what
/// `ssh cleanup` keys on.
pub const EPHEMERAL_USER_PREFIX: &str = "fleet_";

/// Supplementary groups granted to ephemeral users.
pub const SSH_GROUPS: [&str; 2] = ["admin", "fleet_sshers"];

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$").expect("valid regex")
});

/// Sub-command carried in the first `ssh` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshCommand {
    Setup,
    Cleanup,
}

impl SshCommand {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "setup" => Some(Self::Setup),
            "cleanup" => Some(Self::Cleanup),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Cleanup => "cleanup",
        }
    }
}

/// Parameters of `ssh setup`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SshParams {
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    pub public_key: String,
}

impl SshParams {
    /// Check the request before any host state is touched.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the user name is not an
    /// ephemeral login or the public key is blank.
    pub fn validate(&self) -> Result<(), String> {
        validate_username(&self.user)?;
        if self.public_key.trim().is_empty() {
            return Err("public_key must not be empty".to_string());
        }
        Ok(())
    }
}

/// Accept only POSIX-style logins that carry the ephemeral prefix.
///
/// # Errors
///
/// Returns a human-readable reason on rejection.
pub fn validate_username(user: &str) -> Result<(), String> {
    if !user.starts_with(EPHEMERAL_USER_PREFIX) {
        return Err(format!(
            "user '{user}' must start with '{EPHEMERAL_USER_PREFIX}'"
        ));
    }
    if !USERNAME_RE.is_match(user) {
        return Err(format!("user '{user}' is not a valid login name"));
    }
    Ok(())
}

/// Regex source matching every ephemeral user.
#[must_use]
pub fn ephemeral_user_pattern() -> String {
    format!("^{}", regex::escape(EPHEMERAL_USER_PREFIX))
}
