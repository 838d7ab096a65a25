// GitHub API response types.
// Wire structs for GitHub REST responses and the repository reference used by discovery.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GhFloxError;

/// GitHub user or organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub id: u64,
}

/// GitHub repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub owner: Owner,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single code search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub repository: Repository,
}

/// Response body of the code search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<CodeResult>,
}

/// One page of code search results plus the cursor for the following page.
#[derive(Debug, Clone, Default)]
pub struct CodeSearchPage {
    pub items: Vec<CodeResult>,
    /// Page number to request next; `None` on the last page.
    pub next_page: Option<u32>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

/// Repository identity with an optional star count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    /// Zero unless enrichment ran.
    pub stars: u64,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            stars: 0,
        }
    }

    /// The `owner/name` identity.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = GhFloxError;

    /// Parse `owner/name`; exactly one slash with non-empty parts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(GhFloxError::InvalidRepoName(s.to_string())),
        }
    }
}

impl From<&CodeResult> for RepoRef {
    fn from(item: &CodeResult) -> Self {
        Self::new(
            item.repository.owner.login.clone(),
            item.repository.name.clone(),
        )
    }
}
