// Capability trait the discovery engine depends on.
// Implemented by the HTTP client and by test doubles.

use async_trait::async_trait;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{CodeSearchPage, Repository};

/// The subset of the GitHub API used by discovery.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetch one page of code search results.
    async fn search_code(&self, query: &str, page: u32, per_page: u32) -> Result<CodeSearchPage>;

    /// Look up a repository.
    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository>;

    /// Check whether `user` belongs to `org`.
    async fn is_org_member(&self, org: &str, user: &str) -> Result<bool>;

    /// Download a file's raw content from a branch.
    async fn get_raw_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Vec<u8>>;
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn search_code(&self, query: &str, page: u32, per_page: u32) -> Result<CodeSearchPage> {
        GitHubClient::search_code(self, query, page, per_page).await
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository> {
        self.get_repo(owner, name).await
    }

    async fn is_org_member(&self, org: &str, user: &str) -> Result<bool> {
        GitHubClient::is_org_member(self, org, user).await
    }

    async fn get_raw_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        GitHubClient::get_raw_file(self, owner, repo, branch, path).await
    }
}
