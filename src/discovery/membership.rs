// Per-run memo of organization membership lookups.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::github::GitHubApi;

/// Remembers `(org, user)` membership answers for the lifetime of one run.
///
/// Failed lookups are never stored, so the next check retries.
#[derive(Debug, Default)]
pub struct MembershipMemo {
    entries: HashMap<(String, String), bool>,
}

impl MembershipMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `user` is a member of `org`, asking the API at most once per pair.
    pub async fn check<C: GitHubApi + ?Sized>(
        &mut self,
        client: &C,
        org: &str,
        user: &str,
    ) -> Result<bool> {
        let key = (org.to_string(), user.to_string());
        if let Some(&member) = self.entries.get(&key) {
            return Ok(member);
        }

        let member = client.is_org_member(org, user).await?;
        debug!(org, user, member, "membership looked up");
        self.entries.insert(key, member);
        Ok(member)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
