// GitHub API module.
// Provides the client, capability trait, and types for the GitHub REST API.

pub mod api;
pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use api::GitHubApi;
pub use client::GitHubClient;
pub use types::*;
