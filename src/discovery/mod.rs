// Repository discovery engine.
// Paginated search, org filtering, star enrichment, and aggregation over the cache.

pub mod export;
pub mod index;
pub mod manifests;
pub mod membership;
pub mod search;
pub mod stars;

pub use index::{compute_floxindex, merge_supplementary};
pub use membership::MembershipMemo;
pub use search::{RepoQuery, SearchPages, find_manifest_repos, find_readme_repos, find_repos};
pub use stars::StarCountResolver;

use crate::github::RepoRef;

/// Organization whose members' repositories are filtered out.
pub const FLOX_ORG: &str = "flox";

/// Owners always filtered out unless showing the full list.
pub const EXCLUDED_ORGS: &[&str] = &["flox", "flox-examples"];

/// Options for a discovery run. Passed explicitly to every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Skip org membership and exclusion filtering.
    pub show_full: bool,
    /// Enrich each result with its star count.
    pub verbose: bool,
    /// Neither read nor write the cache.
    pub no_cache: bool,
    /// Log cache hits and misses.
    pub debug: bool,
}

/// Sum of star counts over a result set.
pub fn total_stars(repos: &[RepoRef]) -> u64 {
    repos.iter().map(|r| r.stars).sum()
}
