// Aggregation across searches and the supplementary repository list.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{info, warn};

use crate::cache::ExpiringCache;
use crate::error::Result;
use crate::github::{GitHubApi, RepoRef};

use super::SearchOptions;
use super::search::{RepoQuery, find_repos};
use super::stars::StarCountResolver;

/// Parse `owner/name` entries, skipping malformed ones with a warning.
pub fn parse_repo_list<S: AsRef<str>>(entries: &[S]) -> Vec<RepoRef> {
    entries
        .iter()
        .filter_map(|entry| match entry.as_ref().parse::<RepoRef>() {
            Ok(repo) => Some(repo),
            Err(e) => {
                warn!(error = %e, "skipping supplementary repository");
                None
            }
        })
        .collect()
}

/// Total stars across manifest repos, README repos, and the supplementary list.
///
/// Every star count is resolved individually, so the searches need not run in
/// verbose mode. Any lookup failure aborts the whole computation.
pub async fn compute_floxindex<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    additional: &[RepoRef],
    opts: &SearchOptions,
) -> Result<u64> {
    let resolver = StarCountResolver::from(opts);
    let mut total = 0u64;

    for query in [RepoQuery::Manifest, RepoQuery::Readme] {
        let prefix = query.cache_key_prefix();
        let repos = find_repos(client, cache, query.query(), prefix, opts).await?;
        let mut subtotal = 0u64;
        for repo in &repos {
            subtotal += resolver
                .resolve(client, cache, &repo.owner, &repo.name)
                .await?;
        }
        info!(query = ?query, repos = repos.len(), stars = subtotal, "floxindex component");
        total += subtotal;
    }

    for repo in additional {
        total += resolver
            .resolve(client, cache, &repo.owner, &repo.name)
            .await?;
    }

    Ok(total)
}

/// Merge search results with the supplementary list.
///
/// Search results win on identity collisions and keep the star counts they
/// already carry. The merged list is sorted by `owner/name`; with `verbose`,
/// only entries contributed by the supplementary list are resolved.
pub async fn merge_supplementary<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    found: Vec<RepoRef>,
    additional: &[RepoRef],
    opts: &SearchOptions,
) -> Result<Vec<RepoRef>> {
    let resolver = StarCountResolver::from(opts);
    let mut merged: BTreeMap<String, RepoRef> = found
        .into_iter()
        .map(|repo| (repo.full_name(), repo))
        .collect();

    for repo in additional {
        let Entry::Vacant(slot) = merged.entry(repo.full_name()) else {
            continue;
        };
        let mut repo = repo.clone();
        if opts.verbose {
            repo.stars = resolver
                .resolve(client, cache, &repo.owner, &repo.name)
                .await?;
        }
        slot.insert(repo);
    }

    Ok(merged.into_values().collect())
}
