//! Serve command - run the feed server
//!
//! Wires the whole process together: config, the event log, the ingest
//! adapter fed by JSON-lines watch notifications on stdin, the HTTP API,
//! and the TCP feed server. Ctrl-C tears everything down through one
//! cancellation token.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Args;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use kfeed_api::{AppState, build_router};
use kfeed_config::Config;
use kfeed_stream::{EventLog, FeedServer, FeedServerConfig, WatchNotification, spawn_ingest};

/// Capacity of the ingest channel between the stdin reader and the adapter
const INGEST_QUEUE_SIZE: usize = 1024;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/kfeed.toml")]
    pub config: std::path::PathBuf,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        capacity = config.feed.capacity,
        http_addr = %config.server.http_addr,
        stream_addr = %config.server.stream_addr,
        "starting kfeed"
    );

    let log = Arc::new(EventLog::new(config.feed.capacity)?);
    let shutdown = CancellationToken::new();

    // Watch-source boundary: JSON-lines notifications on stdin
    let (notify_tx, notify_rx) = mpsc::channel(INGEST_QUEUE_SIZE);
    let ingest = spawn_ingest(Arc::clone(&log), notify_rx, shutdown.clone());
    let stdin_reader = tokio::spawn(read_watch_input(notify_tx));

    // TCP feed server (live tailing)
    let feed_config = FeedServerConfig {
        bind_addr: config.server.stream_addr.clone(),
        heartbeat_interval_secs: config.server.heartbeat_interval_secs,
        ..FeedServerConfig::default()
    };
    let feed_server = FeedServer::bind(Arc::clone(&log), feed_config)
        .await
        .context("failed to bind feed server")?;
    let feed_task = feed_server.spawn(shutdown.clone());

    // HTTP API (snapshot queries)
    let app = build_router(AppState::new(Arc::clone(&log)));
    let http_listener = tokio::net::TcpListener::bind(&config.server.http_addr)
        .await
        .with_context(|| format!("failed to bind http api on {}", config.server.http_addr))?;
    info!(addr = %config.server.http_addr, "http api listening");
    let http_shutdown = shutdown.clone();
    let http_task = tokio::spawn(async move {
        axum::serve(http_listener, app)
            .with_graceful_shutdown(http_shutdown.cancelled_owned())
            .await
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutting down");
    shutdown.cancel();

    // stdin reads cannot be cancelled, abort the reader instead
    stdin_reader.abort();
    let _ = ingest.await;
    let _ = feed_task.await;
    let _ = http_task.await;

    Ok(())
}

/// Load config, falling back to defaults when the default path is absent
fn load_config(args: &ServeArgs) -> Result<Config> {
    if args.config.exists() {
        Config::from_file(&args.config)
            .with_context(|| format!("failed to load config from {}", args.config.display()))
    } else {
        info!(
            path = %args.config.display(),
            "config file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// One watch notification as accepted on stdin, one JSON object per line
///
/// Matches the shape cluster watch tooling emits: a raw change tag plus the
/// changed object. The object travels into the log as an opaque payload.
#[derive(Debug, Deserialize)]
struct StdinNotification {
    resource: String,
    #[serde(rename = "type")]
    change: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    object: serde_json::Value,
}

/// Read JSON-lines watch notifications from stdin into the ingest channel
///
/// Malformed lines are logged and skipped; they never stop the stream.
async fn read_watch_input(tx: mpsc::Sender<WatchNotification>) {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<StdinNotification>(line) {
                    Ok(raw) => {
                        let payload = if raw.object.is_null() {
                            Bytes::new()
                        } else {
                            Bytes::from(serde_json::to_vec(&raw.object).unwrap_or_default())
                        };
                        let notification = WatchNotification {
                            resource: raw.resource,
                            change: raw.change,
                            namespace: raw.namespace,
                            name: raw.name,
                            payload,
                        };
                        if tx.send(notification).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping malformed watch notification");
                    }
                }
            }
            Ok(None) => {
                info!("watch input closed");
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to read watch input");
                // Back off briefly so a persistent stdin error cannot spin
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
