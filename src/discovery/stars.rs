// Cache-backed star count lookup.

use tracing::{debug, warn};

use crate::cache::{CacheValue, ExpiringCache, star_count_key};
use crate::error::Result;
use crate::github::GitHubApi;

use super::SearchOptions;

/// Resolves repository star counts, consulting the cache first.
#[derive(Debug, Clone, Copy, Default)]
pub struct StarCountResolver {
    no_cache: bool,
    debug: bool,
}

impl StarCountResolver {
    pub fn new(no_cache: bool, debug: bool) -> Self {
        Self { no_cache, debug }
    }

    /// Star count of `owner/name`.
    ///
    /// A cache hit returns without a network call. Lookup failures propagate and
    /// leave the cache untouched.
    pub async fn resolve<C: GitHubApi + ?Sized>(
        &self,
        client: &C,
        cache: &mut ExpiringCache,
        owner: &str,
        name: &str,
    ) -> Result<u64> {
        let key = star_count_key(owner, name);

        if !self.no_cache {
            match cache.get(&key) {
                Some(CacheValue::StarCount(stars)) => {
                    if self.debug {
                        debug!(key = %key, "cache hit");
                    }
                    return Ok(*stars);
                }
                Some(CacheValue::Repos(_)) => {
                    warn!(key = %key, "cache entry has unexpected type, refetching");
                }
                None => {
                    if self.debug {
                        debug!(key = %key, "cache miss");
                    }
                }
            }
        }

        let repository = client.get_repository(owner, name).await?;
        let stars = repository.stargazers_count;
        if !self.no_cache {
            cache.set(key, CacheValue::StarCount(stars));
        }
        Ok(stars)
    }
}

impl From<&SearchOptions> for StarCountResolver {
    fn from(opts: &SearchOptions) -> Self {
        Self::new(opts.no_cache, opts.debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::MockGitHub;

    #[tokio::test]
    async fn test_cache_hit_skips_lookup() {
        let client = MockGitHub::new().with_default_stars(5);
        let mut cache = ExpiringCache::new();
        cache.set("starCount:owner/repo", CacheValue::StarCount(99));

        let stars = StarCountResolver::new(false, false)
            .resolve(&client, &mut cache, "owner", "repo")
            .await
            .unwrap();

        assert_eq!(stars, 99);
        assert_eq!(client.repo_calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let client = MockGitHub::new().with_stars("flox/flox", 3000);
        let mut cache = ExpiringCache::new();
        let resolver = StarCountResolver::new(false, true);

        let first = resolver
            .resolve(&client, &mut cache, "flox", "flox")
            .await
            .unwrap();
        let second = resolver
            .resolve(&client, &mut cache, "flox", "flox")
            .await
            .unwrap();

        assert_eq!(first, 3000);
        assert_eq!(second, 3000);
        assert_eq!(client.repo_calls(), 1);
        assert_eq!(
            cache.get("starCount:flox/flox"),
            Some(&CacheValue::StarCount(3000))
        );
    }

    #[tokio::test]
    async fn test_no_cache_always_fetches() {
        let client = MockGitHub::new().with_default_stars(10);
        let mut cache = ExpiringCache::new();
        cache.set("starCount:owner/repo", CacheValue::StarCount(99));
        let resolver = StarCountResolver::new(true, false);

        assert_eq!(
            resolver
                .resolve(&client, &mut cache, "owner", "repo")
                .await
                .unwrap(),
            10
        );
        assert_eq!(
            resolver
                .resolve(&client, &mut cache, "owner", "repo")
                .await
                .unwrap(),
            10
        );
        assert_eq!(client.repo_calls(), 2);
        // Existing entry is neither read nor overwritten
        assert_eq!(
            cache.get("starCount:owner/repo"),
            Some(&CacheValue::StarCount(99))
        );
    }

    #[tokio::test]
    async fn test_failure_propagates_and_caches_nothing() {
        let client = MockGitHub::new().failing_repo("gone/repo");
        let mut cache = ExpiringCache::new();

        let result = StarCountResolver::new(false, false)
            .resolve(&client, &mut cache, "gone", "repo")
            .await;

        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_mistyped_entry_is_refetched() {
        let client = MockGitHub::new().with_default_stars(8);
        let mut cache = ExpiringCache::new();
        cache.set("starCount:owner/repo", CacheValue::Repos(Vec::new()));

        let stars = StarCountResolver::new(false, false)
            .resolve(&client, &mut cache, "owner", "repo")
            .await
            .unwrap();

        assert_eq!(stars, 8);
        assert_eq!(
            cache.get("starCount:owner/repo"),
            Some(&CacheValue::StarCount(8))
        );
    }
}
