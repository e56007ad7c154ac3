//! Rockflint CLI - browse listings and manage a marketplace account from
//! the terminal.

mod app;
mod commands;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rockflint_core::{ApiError, ClientConfig};

use app::App;
use commands::Cli;

/// Log file prefix inside the state directory
const LOG_FILE_NAME: &str = "rockflint.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr, filtered by RUST_LOG (default `warn`). With
/// `--log-file` they are also written to a daily rolling file; the returned
/// guard must live until exit so buffered lines get flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ApiError>() {
            // Show the server's own message rather than the bare status
            Some(api) => eprintln!("Error: {}: {}", e, api.message()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env()?;

    let _guard = init_tracing(cli.log_file.then_some(config.state_dir.as_path()));
    info!(base_url = %config.base_url, "Rockflint CLI starting");

    let mut app = App::new(&config)?;
    app.run(cli.command).await
}
