// Output helpers for command results.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::github::RepoRef;

/// Write `value` as pretty JSON, fenced for Slack when requested.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    w: &mut W,
    value: &T,
    slack_mode: bool,
) -> Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    write_fence(w, slack_mode)?;
    writeln!(w, "{}", output)?;
    write_fence(w, slack_mode)?;
    Ok(())
}

/// Write `owner/name,stars` lines, fenced for Slack when requested.
pub fn write_repo_lines<W: Write>(w: &mut W, repos: &[RepoRef], slack_mode: bool) -> Result<()> {
    write_fence(w, slack_mode)?;
    for repo in repos {
        writeln!(w, "{},{}", repo.full_name(), repo.stars)?;
    }
    write_fence(w, slack_mode)?;
    Ok(())
}

/// Render a count, bolded for Slack.
pub fn count(n: impl std::fmt::Display, slack_mode: bool) -> String {
    if slack_mode {
        format!("*{}*", n)
    } else {
        n.to_string()
    }
}

fn write_fence<W: Write>(w: &mut W, slack_mode: bool) -> Result<()> {
    if slack_mode {
        writeln!(w, "```")?;
    }
    Ok(())
}
