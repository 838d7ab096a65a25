// Error types for gh-flox.
// Covers GitHub API failures, cache persistence, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhFloxError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("GITHUB_TOKEN must be set")]
    MissingToken,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("Invalid repository name {0:?}, expected owner/name")]
    InvalidRepoName(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GhFloxError>;
