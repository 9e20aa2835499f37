//! PSS CLI - Neo4j schema explorer
//!
//! Reports node labels, relationship types and property keys of a Neo4j database.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing with optional file logging.
///
/// Logs go to stderr so stdout stays clean for schema and JSON output.
fn init_tracing(log_file: Option<&std::path::Path>, verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "pss=debug,pss_graph=debug"
    } else {
        "pss=warn,pss_graph=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log.as_deref(), cli.verbose)?;

    // Environment is loaded once, before any configuration is read.
    if let Some(path) = pss_graph::load_dotenv(cli.env_file.as_deref())? {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    cli.execute().await
}
