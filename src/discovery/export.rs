// Export records combining both searches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cache::ExpiringCache;
use crate::error::Result;
use crate::github::{GitHubApi, RepoRef};

use super::SearchOptions;
use super::search::{RepoQuery, find_repos};

/// One exported repository row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub date: String,
    pub repository: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "starcount")]
    pub star_count: u64,
}

impl RepoQuery {
    /// Label used for this search in exported records.
    pub fn export_type(&self) -> &'static str {
        match self {
            RepoQuery::Manifest => "dotflox",
            RepoQuery::Readme => "readme",
        }
    }
}

/// Date stamp in exported records, e.g. `2026-Oct-19`.
pub fn export_date(date: NaiveDate) -> String {
    date.format("%Y-%b-%d").to_string()
}

/// Run both searches with star enrichment and flatten them into export rows.
pub async fn collect_export<C: GitHubApi + ?Sized>(
    client: &C,
    cache: &mut ExpiringCache,
    opts: &SearchOptions,
    date: NaiveDate,
) -> Result<Vec<RepoInfo>> {
    let opts = SearchOptions {
        verbose: true,
        ..*opts
    };
    let date = export_date(date);
    let mut rows = Vec::new();

    for query in [RepoQuery::Manifest, RepoQuery::Readme] {
        let prefix = query.cache_key_prefix();
        let repos = find_repos(client, cache, query.query(), prefix, &opts).await?;
        rows.extend(repos.iter().map(|repo| to_row(repo, query, &date)));
    }

    Ok(rows)
}

fn to_row(repo: &RepoRef, query: RepoQuery, date: &str) -> RepoInfo {
    RepoInfo {
        date: date.to_string(),
        repository: repo.full_name(),
        kind: query.export_type().to_string(),
        star_count: repo.stars,
    }
}
