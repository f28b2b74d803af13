//! kfeed - bounded cluster-event feed
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default), reading watch notifications from stdin
//! kubectl-watch-json | kfeed
//! kfeed serve --config configs/kfeed.toml
//!
//! # Stream live events from a running server
//! kfeed tail
//! kfeed tail --resource Pod --namespace default --from-start
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// kfeed - bounded cluster-event feed
#[derive(Parser, Debug)]
#[command(name = "kfeed")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Global args that apply to serve when no subcommand given
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/kfeed.toml", global = true)]
    config: std::path::PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the feed server
    Serve(cmd::serve::ServeArgs),

    /// Stream live events from a running server
    Tail(cmd::tail::TailArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Explicit subcommand
        Some(Command::Serve(args)) => {
            init_logging(&cli.log_level)?;
            cmd::serve::run(args).await
        }
        Some(Command::Tail(args)) => {
            // Tail initializes its own logging
            cmd::tail::run(args).await
        }
        // No subcommand = run server (default behavior)
        None => {
            init_logging(&cli.log_level)?;
            let args = cmd::serve::ServeArgs { config: cli.config };
            cmd::serve::run(args).await
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
