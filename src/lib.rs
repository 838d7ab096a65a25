// gh-flox library crate.
// Repository discovery, star counting, and the expiring cache behind the CLI.

pub mod app;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod format;
pub mod github;
