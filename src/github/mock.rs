// Scripted GitHub API double for tests.
// Serves canned search pages, membership answers, and star counts while counting calls.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{GhFloxError, Result};

use super::api::GitHubApi;
use super::types::{CodeResult, CodeSearchPage, Owner, Repository};

type Pages = Vec<Vec<CodeResult>>;

#[derive(Default)]
pub struct MockGitHub {
    default_pages: Pages,
    query_pages: HashMap<String, Pages>,
    members: HashSet<(String, String)>,
    stars: HashMap<String, u64>,
    default_stars: u64,
    fail_search_on_page: Option<u32>,
    failing_members: HashSet<String>,
    membership_rate_limited: bool,
    failing_repos: HashSet<String>,
    search_calls: AtomicUsize,
    repo_calls: AtomicUsize,
    member_calls: AtomicUsize,
}

pub fn code_result(owner: &str, name: &str) -> CodeResult {
    CodeResult {
        name: "manifest.toml".to_string(),
        path: ".flox/env/manifest.toml".to_string(),
        repository: repository(owner, name, 0),
    }
}

fn repository(owner: &str, name: &str, stars: u64) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: format!("{}/{}", owner, name),
        owner: Owner {
            login: owner.to_string(),
            id: 0,
        },
        stargazers_count: stars,
        description: None,
    }
}

fn to_pages(pages: &[&[(&str, &str)]]) -> Pages {
    pages
        .iter()
        .map(|page| page.iter().map(|(o, n)| code_result(o, n)).collect())
        .collect()
}

impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages served for any query without its own script.
    pub fn with_pages(mut self, pages: &[&[(&str, &str)]]) -> Self {
        self.default_pages = to_pages(pages);
        self
    }

    /// Pages served for one exact query text.
    pub fn with_query_pages(mut self, query: &str, pages: &[&[(&str, &str)]]) -> Self {
        self.query_pages.insert(query.to_string(), to_pages(pages));
        self
    }

    pub fn with_member(mut self, org: &str, user: &str) -> Self {
        self.members.insert((org.to_string(), user.to_string()));
        self
    }

    pub fn with_stars(mut self, full_name: &str, stars: u64) -> Self {
        self.stars.insert(full_name.to_string(), stars);
        self
    }

    pub fn with_default_stars(mut self, stars: u64) -> Self {
        self.default_stars = stars;
        self
    }

    pub fn failing_search_on_page(mut self, page: u32) -> Self {
        self.fail_search_on_page = Some(page);
        self
    }

    pub fn failing_membership(mut self, user: &str) -> Self {
        self.failing_members.insert(user.to_string());
        self
    }

    pub fn rate_limited_membership(mut self) -> Self {
        self.membership_rate_limited = true;
        self
    }

    pub fn failing_repo(mut self, full_name: &str) -> Self {
        self.failing_repos.insert(full_name.to_string());
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn repo_calls(&self) -> usize {
        self.repo_calls.load(Ordering::SeqCst)
    }

    pub fn member_calls(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn search_code(&self, query: &str, page: u32, _per_page: u32) -> Result<CodeSearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_search_on_page == Some(page) {
            return Err(GhFloxError::Other("search failed".to_string()));
        }

        let pages = self.query_pages.get(query).unwrap_or(&self.default_pages);
        let index = page.saturating_sub(1) as usize;
        let items = pages.get(index).cloned().unwrap_or_default();
        let next_page = (index + 1 < pages.len()).then_some(page + 1);

        Ok(CodeSearchPage { items, next_page })
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);

        let full_name = format!("{}/{}", owner, name);
        if self.failing_repos.contains(&full_name) {
            return Err(GhFloxError::NotFound(full_name));
        }

        let stars = self
            .stars
            .get(&full_name)
            .copied()
            .unwrap_or(self.default_stars);
        Ok(repository(owner, name, stars))
    }

    async fn is_org_member(&self, org: &str, user: &str) -> Result<bool> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);

        if self.membership_rate_limited {
            return Err(GhFloxError::RateLimited {
                reset_at: "00:00:00".to_string(),
            });
        }
        if self.failing_members.contains(user) {
            return Err(GhFloxError::Other("membership check failed".to_string()));
        }

        Ok(self.members.contains(&(org.to_string(), user.to_string())))
    }

    async fn get_raw_file(
        &self,
        owner: &str,
        repo: &str,
        _branch: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let full_name = format!("{}/{}", owner, repo);
        if self.failing_repos.contains(&full_name) {
            return Err(GhFloxError::NotFound(full_name));
        }
        Ok(format!("# {} from {}\n", path, full_name).into_bytes())
    }
}
