//! Tail command - live streaming CLI for kfeed
//!
//! Connect to a running kfeed server and stream events in real time.

mod client;
mod output;

use anyhow::Result;
use clap::Args;
use tracing_subscriber::EnvFilter;

use kfeed_protocol::{FeedMessage, StartPosition, SubscribeRequest};

/// Tail command arguments
#[derive(Args, Debug)]
pub struct TailArgs {
    /// Server address to connect to
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    addr: String,

    /// Filter by watched kind (e.g. Pod)
    #[arg(short, long, value_name = "KIND")]
    resource: Option<String>,

    /// Filter by namespace
    #[arg(short, long, value_name = "NS")]
    namespace: Option<String>,

    /// Replay retained history before streaming live
    #[arg(long)]
    from_start: bool,

    /// Output format: text (default), json
    #[arg(short = 'o', long = "output", default_value = "text")]
    format: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose output (show heartbeats)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress connection messages)
    #[arg(short, long)]
    quiet: bool,
}

/// Run the tail command
pub async fn run(args: TailArgs) -> Result<()> {
    // Set up logging for tail command
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();

    // Build subscribe request
    let mut request = SubscribeRequest::new();
    if let Some(ref resource) = args.resource {
        request = request.with_resource(resource.clone());
    }
    if let Some(ref namespace) = args.namespace {
        request = request.with_namespace(namespace.clone());
    }
    if args.from_start {
        request = request.with_start(StartPosition::Oldest);
    }

    // Enable color only if: stdout is TTY AND --no-color not set
    let use_color = atty::is(atty::Stream::Stdout) && !args.no_color;
    let formatter = output::Formatter::new(&args.format).with_color(use_color);

    if !args.quiet {
        tracing::info!(addr = %args.addr, "connecting to server");
    }

    let mut client = client::FeedClient::connect(&args.addr).await?;
    client.subscribe(&request).await?;

    if !args.quiet {
        tracing::info!("streaming events (Ctrl+C to stop)");
    }

    // Main loop with signal handling
    loop {
        tokio::select! {
            result = client.recv() => {
                match result {
                    Ok(Some(msg)) => match msg {
                        FeedMessage::Event(frame) => {
                            formatter.print(&frame);
                        }
                        FeedMessage::Gap { dropped } => {
                            tracing::warn!(dropped, "events were evicted before delivery");
                        }
                        FeedMessage::Heartbeat => {
                            if args.verbose {
                                tracing::debug!("heartbeat");
                            }
                        }
                        FeedMessage::Error(e) => {
                            tracing::error!(error = %e, "server error");
                        }
                        FeedMessage::Subscribe(_) => {
                            // Server shouldn't send this
                        }
                    },
                    Ok(None) => {
                        if !args.quiet {
                            tracing::info!("connection closed");
                        }
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "receive error");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if !args.quiet {
                    tracing::info!("interrupted, shutting down");
                }
                break;
            }
        }
    }

    Ok(())
}
