// gh-flox entry point.
// Parses arguments, sets up logging, runs one command, and persists the cache.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gh_flox::app::App;
use gh_flox::cli::Cli;
use gh_flox::config::Config;
use gh_flox::error::{GhFloxError, Result};

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    if cli.command.needs_api() && config.github_token.is_none() {
        return Err(GhFloxError::MissingToken);
    }

    let mut app = App::new(config);
    let mut stdout = io::stdout().lock();
    cli.command.execute(&mut app, &mut stdout).await?;

    app.save_cache()?;
    debug!(entries = app.cache.len(), "cache saved");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    config.no_cache |= cli.no_cache;

    init_tracing(config.debug);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
