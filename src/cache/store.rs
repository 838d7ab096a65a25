// Expiring key-value store with single-blob disk persistence.
// Entries carry their own expiry; expired entries are invisible to reads and purged on sweep.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::github::RepoRef;

/// Default entry lifetime: 4 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Interval between expiry sweeps: twice the default lifetime.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(2 * 4 * 60 * 60);

/// A value held in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheValue {
    /// Star count for a single repository.
    StarCount(u64),
    /// Aggregate result of a repository search.
    Repos(Vec<RepoRef>),
}

/// A cached value together with its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: CacheValue,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Check whether the entry is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache with a default lifetime per entry.
#[derive(Debug)]
pub struct ExpiringCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    sweep_interval: Duration,
    last_sweep: DateTime<Utc>,
}

impl Default for ExpiringCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpiringCache {
    /// Create an empty cache with the default lifetime and sweep interval.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL, SWEEP_INTERVAL)
    }

    /// Create an empty cache with a custom lifetime and sweep interval.
    pub fn with_ttl(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            sweep_interval,
            last_sweep: Utc::now(),
        }
    }

    /// Look up a live entry.
    pub fn get(&self, key: &str) -> Option<&CacheValue> {
        let now = Utc::now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| &entry.value)
    }

    /// Store a value with the default lifetime, replacing any previous entry.
    pub fn set(&mut self, key: impl Into<String>, value: CacheValue) {
        let now = Utc::now();
        if elapsed_since(self.last_sweep, now) >= self.sweep_interval {
            self.delete_expired();
        }

        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Remove every entry.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    /// Purge entries past their expiry.
    pub fn delete_expired(&mut self) {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        self.last_sweep = now;

        let purged = before - self.entries.len();
        if purged > 0 {
            debug!(purged, "swept expired cache entries");
        }
    }

    /// Number of physically held entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a cache from disk.
    ///
    /// Never fails: a missing, unreadable, or corrupt file yields an empty cache.
    pub fn load_from_file(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache read failed, starting fresh");
                return Self::new();
            }
        };

        match bincode::deserialize::<HashMap<String, CacheEntry>>(&bytes) {
            Ok(entries) => {
                let mut cache = Self::new();
                cache.entries = entries;
                cache.delete_expired();
                cache
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache decode failed, starting fresh");
                Self::new()
            }
        }
    }

    /// Write every held entry to `path` as a single blob.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = bincode::serialize(&self.entries)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Insert an entry with an explicit expiry.
    #[cfg(test)]
    pub(crate) fn insert_entry(&mut self, key: &str, entry: CacheEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    #[cfg(test)]
    pub(crate) fn set_last_sweep(&mut self, at: DateTime<Utc>) {
        self.last_sweep = at;
    }
}

fn elapsed_since(then: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(then)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(owner: &str, name: &str, stars: u64) -> RepoRef {
        RepoRef {
            owner: owner.to_string(),
            name: name.to_string(),
            stars,
        }
    }

    fn expired(value: CacheValue) -> CacheEntry {
        CacheEntry {
            value,
            expires_at: Utc::now() - chrono::Duration::seconds(1),
        }
    }

    #[test]
    fn test_get_set() {
        let mut cache = ExpiringCache::new();
        cache.set("starCount:alice/p1", CacheValue::StarCount(42));

        assert_eq!(
            cache.get("starCount:alice/p1"),
            Some(&CacheValue::StarCount(42))
        );
    }

    #[test]
    fn test_get_missing() {
        let cache = ExpiringCache::new();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut cache = ExpiringCache::new();
        cache.set("k", CacheValue::StarCount(1));
        cache.set("k", CacheValue::StarCount(2));

        assert_eq!(cache.get("k"), Some(&CacheValue::StarCount(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_refreshes_expiry() {
        let mut cache = ExpiringCache::with_ttl(Duration::from_millis(400), SWEEP_INTERVAL);
        cache.set("k", CacheValue::StarCount(1));

        std::thread::sleep(Duration::from_millis(250));
        cache.set("k", CacheValue::StarCount(1));

        // Past the first write's expiry, inside the second's
        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(cache.get("k"), Some(&CacheValue::StarCount(1)));
    }

    #[test]
    fn test_expired_entry_is_invisible() {
        let mut cache = ExpiringCache::new();
        cache.insert_entry("old", expired(CacheValue::StarCount(7)));

        assert!(cache.get("old").is_none());
        // Still physically present until swept
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = ExpiringCache::with_ttl(Duration::ZERO, SWEEP_INTERVAL);
        cache.set("k", CacheValue::StarCount(1));

        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_flush() {
        let mut cache = ExpiringCache::new();
        cache.set("a", CacheValue::StarCount(1));
        cache.set("b", CacheValue::Repos(vec![repo("alice", "p1", 0)]));
        cache.flush();

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_expired() {
        let mut cache = ExpiringCache::new();
        cache.insert_entry("old", expired(CacheValue::StarCount(1)));
        cache.set("fresh", CacheValue::StarCount(2));

        cache.delete_expired();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(&CacheValue::StarCount(2)));
    }

    #[test]
    fn test_set_sweeps_after_interval() {
        let mut cache = ExpiringCache::new();
        cache.insert_entry("old", expired(CacheValue::StarCount(1)));
        cache.set_last_sweep(Utc::now() - chrono::Duration::hours(9));

        cache.set("fresh", CacheValue::StarCount(2));

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_does_not_sweep_before_interval() {
        let mut cache = ExpiringCache::new();
        cache.insert_entry("old", expired(CacheValue::StarCount(1)));

        cache.set("fresh", CacheValue::StarCount(2));

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_save_and_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.bin");

        let repos = vec![repo("alice", "p1", 3), repo("bob", "p2", 0)];
        let mut cache = ExpiringCache::new();
        cache.set("starCount:flox/flox", CacheValue::StarCount(100));
        cache.set(
            "floxManifestRepos:false:true",
            CacheValue::Repos(repos.clone()),
        );
        cache.save_to_file(&path).unwrap();

        let loaded = ExpiringCache::load_from_file(&path);
        assert_eq!(
            loaded.get("starCount:flox/flox"),
            Some(&CacheValue::StarCount(100))
        );
        assert_eq!(
            loaded.get("floxManifestRepos:false:true"),
            Some(&CacheValue::Repos(repos))
        );
    }

    #[test]
    fn test_load_drops_expired_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.bin");

        let mut cache = ExpiringCache::new();
        cache.insert_entry("old", expired(CacheValue::StarCount(1)));
        cache.set("fresh", CacheValue::StarCount(2));
        cache.save_to_file(&path).unwrap();

        let loaded = ExpiringCache::load_from_file(&path);
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get("old").is_none());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.bin");

        let cache = ExpiringCache::load_from_file(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.bin");
        fs::write(&path, b"not valid cache data").unwrap();

        let cache = ExpiringCache::load_from_file(&path);
        assert!(cache.is_empty());
        assert!(cache.get("anything").is_none());
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("cache.bin");

        ExpiringCache::new().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file cannot be used as a parent directory
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let result = ExpiringCache::new().save_to_file(&blocker.join("cache.bin"));
        assert!(result.is_err());
    }
}
