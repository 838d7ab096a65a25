// Application context shared by all commands.
// Owns the configuration, the persisted cache, the GitHub client, and the supplementary list.

use std::fs;

use tracing::debug;

use crate::cache::ExpiringCache;
use crate::config::Config;
use crate::discovery::SearchOptions;
use crate::discovery::index::parse_repo_list;
use crate::error::{GhFloxError, Result};
use crate::github::{GitHubApi, GitHubClient, RepoRef};

/// Built-in supplementary repository list.
const ADDITIONAL_REPOS_JSON: &str = include_str!("../additional_repos.json");

/// Main application state.
pub struct App {
    pub config: Config,
    /// Loaded once at startup, saved once at shutdown.
    pub cache: ExpiringCache,
    /// Read on first use.
    additional_repos: Option<Vec<RepoRef>>,
    client: Option<Box<dyn GitHubApi>>,
}

impl App {
    /// Load the cache for `config`.
    pub fn new(config: Config) -> Self {
        let cache = ExpiringCache::load_from_file(&config.cache_file);
        debug!(path = %config.cache_file.display(), entries = cache.len(), "cache loaded");

        Self::with_parts(config, cache)
    }

    pub fn with_parts(config: Config, cache: ExpiringCache) -> Self {
        Self {
            config,
            cache,
            additional_repos: None,
            client: None,
        }
    }

    /// Use a given supplementary list instead of reading the configured one.
    pub fn with_additional_repos(mut self, repos: Vec<RepoRef>) -> Self {
        self.additional_repos = Some(repos);
        self
    }

    /// Use a preconfigured API client instead of creating one from the token.
    pub fn with_client(mut self, client: Box<dyn GitHubApi>) -> Self {
        self.client = Some(client);
        self
    }

    /// The API client and the cache, creating the client on first use.
    pub fn parts(&mut self) -> Result<(&dyn GitHubApi, &mut ExpiringCache)> {
        if self.client.is_none() {
            let token = self
                .config
                .github_token
                .as_deref()
                .ok_or(GhFloxError::MissingToken)?;
            self.client = Some(Box::new(GitHubClient::new(token)?));
        }

        let client = self.client.as_deref().ok_or(GhFloxError::MissingToken)?;
        Ok((client, &mut self.cache))
    }

    /// The supplementary repository list, read from config on first call.
    pub fn additional_repos(&mut self) -> Result<Vec<RepoRef>> {
        if let Some(repos) = &self.additional_repos {
            return Ok(repos.clone());
        }

        let repos = load_additional_repos(&self.config)?;
        self.additional_repos = Some(repos.clone());
        Ok(repos)
    }

    /// Discovery options for this process.
    pub fn search_options(&self, show_full: bool, verbose: bool) -> SearchOptions {
        SearchOptions {
            show_full,
            verbose,
            no_cache: self.config.no_cache,
            debug: self.config.debug,
        }
    }

    /// Persist the cache unless caching is disabled.
    pub fn save_cache(&self) -> Result<()> {
        if self.config.no_cache {
            return Ok(());
        }
        self.cache.save_to_file(&self.config.cache_file)
    }
}

/// Read the supplementary list from the configured file, or the built-in one.
pub fn load_additional_repos(config: &Config) -> Result<Vec<RepoRef>> {
    let entries: Vec<String> = match &config.additional_repos_file {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => serde_json::from_str(ADDITIONAL_REPOS_JSON)?,
    };
    Ok(parse_repo_list(&entries))
}
