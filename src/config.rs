// Process configuration loaded from environment variables.

use std::path::PathBuf;

use crate::cache::default_cache_file;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub github_token: Option<String>,
    /// Wrap listings in Slack-friendly code fences and bold markers.
    pub slack_mode: bool,
    /// Log cache hits and misses and raise the default log level.
    pub debug: bool,
    pub cache_file: PathBuf,
    /// Replaces the built-in supplementary repository list when set.
    pub additional_repos_file: Option<PathBuf>,
    /// Bypass cache reads and writes. Set from the command line.
    pub no_cache: bool,
}

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            github_token: lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()),
            slack_mode: is_truthy(lookup("SLACK_MODE").as_deref()),
            debug: is_truthy(lookup("DEBUG").as_deref()),
            cache_file: lookup("GH_FLOX_CACHE_FILE")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_file),
            additional_repos_file: lookup("GH_FLOX_ADDITIONAL_REPOS")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            no_cache: false,
        }
    }
}

/// Any non-empty value other than `0` or `false` (case-insensitive) is on.
fn is_truthy(value: Option<&str>) -> bool {
    match value {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}
