//! Log collection vocabulary for `fetch_logs`.

use std::path::PathBuf;

use super::config::AgentDirs;

/// Which family of logs the controller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Job,
    Agent,
}

impl LogType {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "job" => Some(Self::Job),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }

    /// Filters applied when the request carries none.
    #[must_use]
    pub fn default_filters(self) -> Vec<String> {
        let filter = match self {
            Self::Job => "**/*.log",
            Self::Agent => "**/*",
        };
        vec![filter.to_string()]
    }

    #[must_use]
    pub fn dir(self, dirs: &AgentDirs) -> PathBuf {
        match self {
            Self::Job => dirs.job_logs_dir(),
            Self::Agent => dirs.agent_logs_dir(),
        }
    }
}

/// Translate a shell-style glob into an anchored regex source.
///
/// `**/` matches zero or more directories, `*` and `?` never cross `/`.
#[must_use]
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut rest = glob;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("**/") {
            out.push_str("(?:.*/)?");
            rest = tail;
            continue;
        }
        if let Some(tail) = rest.strip_prefix("**") {
            out.push_str(".*");
            rest = tail;
            continue;
        }
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
        rest = &rest[c.len_utf8()..];
    }
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn matches(glob: &str, path: &str) -> bool {
        Regex::new(&glob_to_regex(glob))
            .expect("valid regex")
            .is_match(path)
    }

    #[test]
    fn double_star_spans_directories() {
        assert!(matches("**/*.log", "app.log"));
        assert!(matches("**/*.log", "router/access.log"));
        assert!(matches("**/*.log", "a/b/c/d.log"));
        assert!(!matches("**/*.log", "a/b/c/d.txt"));
    }

    #[test]
    fn single_star_stays_in_directory() {
        assert!(matches("*.log", "app.log"));
        assert!(!matches("*.log", "router/app.log"));
    }

    #[test]
    fn literal_characters_are_escaped() {
        assert!(matches("app.(1).log", "app.(1).log"));
        assert!(!matches("app.log", "appXlog"));
    }

    #[test]
    fn log_types() {
        let dirs = AgentDirs::new("/var/fleet");
        assert_eq!(LogType::parse("job"), Some(LogType::Job));
        assert_eq!(LogType::parse("kernel"), None);
        assert_eq!(LogType::Job.dir(&dirs), PathBuf::from("/var/fleet/sys/log"));
        assert_eq!(LogType::Agent.default_filters(), vec!["**/*".to_string()]);
    }
}
