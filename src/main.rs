//! offline-fetch - Fetch JSON with an offline disk cache fallback
//!
//! Runs a single fetch or cache read and prints the outcome as JSON on stdout.
//! Logs go to stderr.

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use offline_fetch::cli::{Cli, Command};
use offline_fetch::OfflineFallbackFetcher;

/// Installs the stderr log subscriber, preferring `RUST_LOG` when set
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter());

    let fetcher = OfflineFallbackFetcher::from_config(&cli.fetcher_config())?;

    let outcome = match cli.command {
        Command::Fetch(ref args) => fetcher.fetch_with_fallback(args.to_request(), &args.name).await,
        Command::Read { ref name } => fetcher.read_cache(name).await,
    };

    for diagnostic in outcome.diagnostics() {
        debug!(?diagnostic, "Outcome diagnostic");
    }
    if !outcome.has_body() {
        warn!("No response body and no cached copy available");
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
