// Cache path utilities.
// Resolves where the persisted cache blob lives.

use std::path::PathBuf;

use directories::ProjectDirs;

const CACHE_FILE_NAME: &str = "cache.bin";
const FALLBACK_CACHE_FILE: &str = "/tmp/gh-flox-cache.bin";

/// Get the base cache directory (~/.cache/gh-flox on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gh-flox").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default location of the persisted cache file.
pub fn default_cache_file() -> PathBuf {
    cache_dir()
        .map(|dir| dir.join(CACHE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_FILE))
}
