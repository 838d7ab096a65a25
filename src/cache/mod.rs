// Cache module for the persisted expiring key-value store.
// Holds star counts and search aggregates between runs.

pub mod paths;
pub mod store;

pub use paths::default_cache_file;
pub use store::{CacheEntry, CacheValue, DEFAULT_TTL, ExpiringCache, SWEEP_INTERVAL};

/// Cache key for a repository's star count.
pub fn star_count_key(owner: &str, name: &str) -> String {
    format!("starCount:{}/{}", owner, name)
}

/// Cache key for a search aggregate.
pub fn search_key(prefix: &str, show_full: bool, verbose: bool) -> String {
    format!("{}:{}:{}", prefix, show_full, verbose)
}
