// Download of flox environment manifests from discovered repositories.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cache::ExpiringCache;
use crate::error::Result;
use crate::github::{GitHubApi, RepoRef};

use super::SearchOptions;
use super::search::find_manifest_repos;

/// Branch the manifest is fetched from.
pub const MANIFEST_BRANCH: &str = "main";

/// Path of the manifest inside `owner/name`, if the search index knows one.
pub async fn fetch_manifest_path<C: GitHubApi + ?Sized>(
    client: &C,
    owner: &str,
    name: &str,
) -> Result<Option<String>> {
    let query = manifest_path_query(owner, name);
    let page = client.search_code(&query, 1, 1).await?;
    Ok(page.items.into_iter().next().map(|item| item.path))
}

pub fn manifest_path_query(owner: &str, name: &str) -> String {
    format!("manifest.toml repo:{}/{} path:.flox/env", owner, name)
}

/// Local file name for a downloaded manifest.
pub fn local_manifest_path(dir: &Path, repo: &RepoRef) -> PathBuf {
    dir.join(format!("{}_{}_manifest.toml", repo.owner, repo.name))
}

/// Download the manifest of every filtered manifest repository into `dir`.
///
/// Per-repository failures are logged and skipped. Returns the written paths.
pub async fn download_manifests<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    dir: &Path,
    opts: &SearchOptions,
) -> Result<Vec<PathBuf>> {
    let opts = SearchOptions {
        show_full: false,
        verbose: false,
        ..*opts
    };
    let repos = find_manifest_repos(client, cache, &opts).await?;

    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::new();
    for repo in &repos {
        match download_manifest(client, repo, dir).await {
            Ok(Some(path)) => written.push(path),
            Ok(None) => info!(repo = %repo, "no manifest.toml found"),
            Err(e) => warn!(repo = %repo, error = %e, "manifest download failed"),
        }
    }
    Ok(written)
}

async fn download_manifest<C: GitHubApi + ?Sized>(
    client: &C,
    repo: &RepoRef,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(path) = fetch_manifest_path(client, &repo.owner, &repo.name).await? else {
        return Ok(None);
    };

    let content = client
        .get_raw_file(&repo.owner, &repo.name, MANIFEST_BRANCH, &path)
        .await?;
    let local = local_manifest_path(dir, repo);
    tokio::fs::write(&local, content).await?;
    Ok(Some(local))
}
