// GitHub API endpoint functions.
// Provides typed methods for the search, repository, and organization REST endpoints.

use reqwest::StatusCode;

use crate::error::{GhFloxError, Result};

use super::client::{GitHubClient, next_page, rate_limited};
use super::types::{CodeSearchPage, CodeSearchResponse, RateLimit, Repository};

impl GitHubClient {
    /// Search code, returning one page of results.
    pub async fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<CodeSearchPage> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let params = [
            ("q", query),
            ("page", page.as_str()),
            ("per_page", per_page.as_str()),
        ];
        let response = self.get_with_params("/search/code", &params).await?;
        let next_page = next_page(&response);
        let wrapper: CodeSearchResponse = response.json().await?;
        Ok(CodeSearchPage {
            items: wrapper.items,
            next_page,
        })
    }

    /// Get a specific repository.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<Repository> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// Check whether `user` is a member of `org`.
    pub async fn is_org_member(&self, org: &str, user: &str) -> Result<bool> {
        let status = self
            .get_status(&format!("/orgs/{}/members/{}", org, user))
            .await?;
        membership_from_status(status, &self.rate_limit(), org, user)
    }

    /// Download a file's raw content from a repository branch.
    pub async fn get_raw_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let url = raw_file_url(owner, repo, branch, path);
        let response = self.get_raw(&url).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Interpret the status of an org membership request.
///
/// Redirects are followed by the client, so a requester outside the org sees
/// the public membership answer.
fn membership_from_status(
    status: StatusCode,
    rate_limit: &RateLimit,
    org: &str,
    user: &str,
) -> Result<bool> {
    match status {
        StatusCode::NO_CONTENT => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        StatusCode::UNAUTHORIZED => Err(GhFloxError::Unauthorized),
        StatusCode::FORBIDDEN if rate_limit.remaining == 0 => Err(rate_limited(rate_limit)),
        status => Err(GhFloxError::Other(format!(
            "HTTP {} checking membership of {} in {}",
            status, user, org
        ))),
    }
}

/// URL of a file on raw.githubusercontent.com.
pub fn raw_file_url(owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/{}/{}/{}",
        owner, repo, branch, path
    )
}
