// Paginated repository search with dedup, org filtering, and enrichment.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::cache::{CacheValue, ExpiringCache, search_key};
use crate::error::{GhFloxError, Result};
use crate::github::{CodeResult, GitHubApi, RepoRef};

use super::membership::MembershipMemo;
use super::stars::StarCountResolver;
use super::{EXCLUDED_ORGS, FLOX_ORG, SearchOptions};

/// Results requested per search page.
pub const PER_PAGE: u32 = 100;

/// The search variants the tool knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoQuery {
    /// Repositories containing a flox environment manifest.
    Manifest,
    /// Repositories whose README mentions `flox install`.
    Readme,
}

impl RepoQuery {
    pub fn query(&self) -> &'static str {
        match self {
            RepoQuery::Manifest => ".flox/env/manifest.toml in:path",
            RepoQuery::Readme => "\"flox install\" in:file filename:README",
        }
    }

    pub fn cache_key_prefix(&self) -> &'static str {
        match self {
            RepoQuery::Manifest => "floxManifestRepos",
            RepoQuery::Readme => "floxReadmeRepos",
        }
    }
}

/// Lazy cursor over the pages of a code search.
///
/// A failed fetch leaves the cursor in place, so the sequence can be resumed.
pub struct SearchPages<'a, C: ?Sized> {
    client: &'a C,
    query: &'a str,
    per_page: u32,
    cursor: Option<u32>,
}

impl<'a, C: GitHubApi + ?Sized> SearchPages<'a, C> {
    pub fn new(client: &'a C, query: &'a str) -> Self {
        Self::starting_at(client, query, 1)
    }

    pub fn starting_at(client: &'a C, query: &'a str, page: u32) -> Self {
        Self {
            client,
            query,
            per_page: PER_PAGE,
            cursor: Some(page),
        }
    }

    /// Page that the next call will request; `None` once exhausted.
    pub fn cursor(&self) -> Option<u32> {
        self.cursor
    }

    /// Fetch the next page, or `None` when the search has no more pages.
    pub async fn next_page(&mut self) -> Result<Option<Vec<CodeResult>>> {
        let Some(page) = self.cursor else {
            return Ok(None);
        };

        let result = self
            .client
            .search_code(self.query, page, self.per_page)
            .await?;
        debug!(
            query = self.query,
            page,
            items = result.items.len(),
            "fetched search page"
        );

        self.cursor = result.next_page;
        Ok(Some(result.items))
    }
}

/// Repositories containing `.flox/env/manifest.toml`.
pub async fn find_manifest_repos<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    opts: &SearchOptions,
) -> Result<Vec<RepoRef>> {
    let query = RepoQuery::Manifest;
    find_repos(client, cache, query.query(), query.cache_key_prefix(), opts).await
}

/// Repositories with `flox install` in their README.
pub async fn find_readme_repos<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    opts: &SearchOptions,
) -> Result<Vec<RepoRef>> {
    let query = RepoQuery::Readme;
    find_repos(client, cache, query.query(), query.cache_key_prefix(), opts).await
}

/// Run `query` across all pages and return the unique, filtered, sorted repositories.
///
/// The result is cached under `{cache_key_prefix}:{show_full}:{verbose}` unless
/// `no_cache` is set. A search failure on any page aborts the run and nothing
/// is cached.
pub async fn find_repos<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    query: &str,
    cache_key_prefix: &str,
    opts: &SearchOptions,
) -> Result<Vec<RepoRef>> {
    let cache_key = search_key(cache_key_prefix, opts.show_full, opts.verbose);

    if !opts.no_cache {
        match cache.get(&cache_key) {
            Some(CacheValue::Repos(repos)) => {
                if opts.debug {
                    debug!(key = %cache_key, "cache hit");
                }
                return Ok(repos.clone());
            }
            Some(CacheValue::StarCount(_)) => {
                warn!(key = %cache_key, "cache entry has unexpected type, searching again");
            }
            None => {
                if opts.debug {
                    debug!(key = %cache_key, "cache miss");
                }
            }
        }
    }

    let resolver = StarCountResolver::from(opts);
    let mut memo = MembershipMemo::new();
    let mut seen = HashSet::new();
    let mut repos = Vec::new();
    let mut total_stars = 0u64;

    let mut pages = SearchPages::new(client, query);
    while let Some(items) = pages.next_page().await? {
        for item in &items {
            let mut repo = RepoRef::from(item);
            if !seen.insert(repo.full_name()) {
                continue;
            }

            if !opts.show_full && is_filtered_out(client, &mut memo, &repo.owner).await? {
                continue;
            }

            if opts.verbose {
                repo.stars = resolver
                    .resolve(client, cache, &repo.owner, &repo.name)
                    .await?;
                total_stars += repo.stars;
            }
            repos.push(repo);
        }
    }

    repos.sort_by_cached_key(RepoRef::full_name);
    info!(query, repos = repos.len(), total_stars, "search complete");

    if !opts.no_cache {
        cache.set(cache_key, CacheValue::Repos(repos.clone()));
    }
    Ok(repos)
}

/// Whether a result owned by `owner` is dropped from the non-full listing.
///
/// A failed membership lookup drops the item and the run continues, except
/// when the API quota is exhausted.
async fn is_filtered_out<C: GitHubApi + ?Sized>(
    client: &C,
    memo: &mut MembershipMemo,
    owner: &str,
) -> Result<bool> {
    match memo.check(client, FLOX_ORG, owner).await {
        Ok(true) => return Ok(true),
        Ok(false) => {}
        Err(e @ GhFloxError::RateLimited { .. }) => return Err(e),
        Err(e) => {
            warn!(
                org = FLOX_ORG,
                user = owner,
                error = %e,
                "membership check failed, skipping repository"
            );
            return Ok(true);
        }
    }

    Ok(EXCLUDED_ORGS.contains(&owner))
}
