// Command implementations.
// Each command runs discovery through the app context and writes its report to `out`.

use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::app::App;
use crate::discovery::export::collect_export;
use crate::discovery::manifests::download_manifests;
use crate::discovery::{
    StarCountResolver, compute_floxindex, find_manifest_repos, find_readme_repos,
    merge_supplementary, total_stars,
};
use crate::error::Result;
use crate::format::{count, write_json, write_repo_lines};

/// Build metadata reported by `version`.
const GIT_SHA: Option<&str> = option_env!("GH_FLOX_GIT_SHA");
const GIT_DIRTY: Option<&str> = option_env!("GH_FLOX_GIT_DIRTY");

impl App {
    /// List repositories containing a flox manifest.
    pub async fn run_repos<W: Write>(
        &mut self,
        out: &mut W,
        show_full: bool,
        verbose: bool,
    ) -> Result<()> {
        let opts = self.search_options(show_full, verbose);
        let slack = self.config.slack_mode;
        let (client, cache) = self.parts()?;

        let repos = find_manifest_repos(client, cache, &opts).await?;

        if verbose {
            writeln!(
                out,
                "Total unique repositories found: {}, Total stars: {}",
                count(repos.len(), slack),
                count(total_stars(&repos), slack)
            )?;
            write_repo_lines(out, &repos, slack)?;
        } else {
            writeln!(
                out,
                "Total unique repositories found: {}",
                count(repos.len(), slack)
            )?;
        }
        Ok(())
    }

    /// List repositories with `flox install` in the README, plus the supplementary list.
    pub async fn run_readmes<W: Write>(
        &mut self,
        out: &mut W,
        show_full: bool,
        verbose: bool,
    ) -> Result<()> {
        let opts = self.search_options(show_full, verbose);
        let slack = self.config.slack_mode;
        let additional = self.additional_repos()?;
        let (client, cache) = self.parts()?;

        let found = find_readme_repos(client, cache, &opts).await?;
        let repos = merge_supplementary(client, cache, found, &additional, &opts).await?;

        let label = "Total repositories with 'flox install' in README found";
        if verbose {
            writeln!(
                out,
                "{}: {}, Total stars: {}",
                label,
                count(repos.len(), slack),
                count(total_stars(&repos), slack)
            )?;
            write_repo_lines(out, &repos, slack)?;
        } else {
            writeln!(out, "{}: {}", label, count(repos.len(), slack))?;
        }
        Ok(())
    }

    /// Star count of the flox/flox repository.
    pub async fn run_stars<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let opts = self.search_options(false, false);
        let slack = self.config.slack_mode;
        let (client, cache) = self.parts()?;

        let stars = StarCountResolver::from(&opts)
            .resolve(client, cache, "flox", "flox")
            .await?;

        if slack {
            writeln!(
                out,
                "The repository :star2: `flox/flox` has {} stars :star2:.",
                stars
            )?;
        } else {
            writeln!(out, "The repository flox/flox has {} stars", stars)?;
        }
        Ok(())
    }

    /// Total stars across every flox-related repository.
    pub async fn run_floxindex<W: Write>(&mut self, out: &mut W, show_full: bool) -> Result<()> {
        let opts = self.search_options(show_full, false);
        let additional = self.additional_repos()?;
        let (client, cache) = self.parts()?;

        let total = compute_floxindex(client, cache, &additional, &opts).await?;

        writeln!(out, "Total floxindex (sum of stars): {}", total)?;
        Ok(())
    }

    /// Export both searches as JSON records.
    pub async fn run_export<W: Write>(&mut self, out: &mut W, show_full: bool) -> Result<()> {
        let opts = self.search_options(show_full, true);
        let slack = self.config.slack_mode;
        let (client, cache) = self.parts()?;

        let rows = collect_export(client, cache, &opts, Local::now().date_naive()).await?;

        write_json(out, &rows, slack)
    }

    /// Download manifests of discovered repositories into `dir`.
    pub async fn run_download_manifests<W: Write>(
        &mut self,
        out: &mut W,
        dir: &Path,
    ) -> Result<()> {
        let opts = self.search_options(false, false);
        let (client, cache) = self.parts()?;

        let written = download_manifests(client, cache, dir, &opts).await?;

        for path in &written {
            writeln!(out, "Downloaded manifest.toml to {}", path.display())?;
        }
        Ok(())
    }

    /// Empty the cache and persist the empty state.
    pub fn run_clear_cache<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.cache.flush();
        self.cache.save_to_file(&self.config.cache_file)?;
        writeln!(out, "Cache cleared.")?;
        Ok(())
    }

    /// Crate version and build metadata.
    pub fn run_version<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "gh-flox {}", env!("CARGO_PKG_VERSION"))?;
        if let Some(sha) = GIT_SHA {
            writeln!(out, "Git SHA: {}", sha)?;
        }
        if GIT_DIRTY.is_some_and(|d| !d.is_empty()) {
            writeln!(out, "Git Dirty: true")?;
        }
        Ok(())
    }
}
