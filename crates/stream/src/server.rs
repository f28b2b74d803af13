//! TCP feed server
//!
//! `FeedServer` listens on a TCP socket and serves the live tailing
//! protocol: a client connects, sends one `Subscribe` message, and receives
//! an ordered stream of matching events, gap notifications when it fell
//! behind the retained window, and periodic heartbeats.
//!
//! # Protocol
//!
//! All messages are length-prefixed: `[4-byte big-endian length][payload]`
//!
//! Client → Server:
//! - `Subscribe` - filter criteria and start position
//!
//! Server → Client:
//! - `Event` - one event in sequence order
//! - `Gap` - events were evicted before delivery
//! - `Heartbeat` - keep-alive
//! - `Error` - error message (e.g., bad handshake)

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use kfeed_protocol::{EventFrame, FeedMessage, ProtocolError, SubscribeRequest, read_length_prefix};

use crate::error::{Result, StreamError};
use crate::filter::EventFilter;
use crate::log::EventLog;
use crate::session::{TailItem, TailSession};

/// Default listen address
pub const DEFAULT_FEED_ADDR: &str = "127.0.0.1:50051";

/// Server configuration
#[derive(Debug, Clone)]
pub struct FeedServerConfig {
    /// Address to listen on
    pub bind_addr: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Per-session delivery channel capacity
    pub channel_capacity: usize,
    /// Read buffer size for the subscribe handshake
    pub read_buffer_size: usize,
}

impl Default for FeedServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_FEED_ADDR.to_string(),
            heartbeat_interval_secs: 30,
            channel_capacity: 256,
            read_buffer_size: 64 * 1024,
        }
    }
}

impl FeedServerConfig {
    /// Create config with a custom listen address
    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }
}

/// TCP server for tail connections
pub struct FeedServer {
    listener: TcpListener,
    log: Arc<EventLog>,
    config: FeedServerConfig,
}

impl FeedServer {
    /// Bind the listener
    ///
    /// Binding up front (instead of inside `run`) lets callers learn the
    /// actual address when the config asks for an ephemeral port.
    pub async fn bind(log: Arc<EventLog>, config: FeedServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_addr)
            .await
            .map_err(StreamError::Io)?;
        Ok(Self {
            listener,
            log,
            config,
        })
    }

    /// The address the server is listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(StreamError::Io)
    }

    /// Run the accept loop until `shutdown` fires
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        info!(addr = %self.local_addr()?, "feed server listening");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("feed server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let log = Arc::clone(&self.log);
                        let config = self.config.clone();
                        let cancel = shutdown.child_token();

                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, log, config, cancel).await {
                                debug!(error = %e, %peer, "feed client connection ended");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                    }
                }
            }
        }
    }

    /// Start the server in a background task
    pub fn spawn(self, shutdown: CancellationToken) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

/// Handle a single client connection
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    log: Arc<EventLog>,
    config: FeedServerConfig,
    cancel: CancellationToken,
) -> Result<()> {
    debug!(%peer, "new feed client");

    let request = match read_subscribe(&mut stream, &config).await {
        Ok(request) => request,
        Err(e) => {
            let error_msg = FeedMessage::Error(e.to_string());
            let _ = stream.write_all(&error_msg.encode()).await;
            return Err(e);
        }
    };

    let filter = EventFilter::from_subscribe(&request);
    info!(
        %peer,
        resource = ?filter.resource(),
        namespace = ?filter.namespace(),
        start = ?request.start,
        "client subscribed"
    );

    let session = TailSession::open(log, filter, request.start);

    // The session pumps into a channel; this loop owns the socket. A failed
    // write cancels the session, a dead session ends the loop.
    let (tx, mut rx) = mpsc::channel(config.channel_capacity);
    let session_cancel = cancel.child_token();
    let pump = tokio::spawn(session.run(tx, session_cancel.clone()));

    let heartbeat_interval = tokio::time::Duration::from_secs(config.heartbeat_interval_secs);
    let mut heartbeat_timer = tokio::time::interval(heartbeat_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            item = rx.recv() => {
                match item {
                    Some(TailItem::Event(event)) => {
                        let msg = FeedMessage::Event(EventFrame::from(event.as_ref()));
                        if let Err(e) = stream.write_all(&msg.encode()).await {
                            warn!(error = %e, %peer, "failed to send event to client");
                            break;
                        }
                    }
                    Some(TailItem::Gap { dropped }) => {
                        warn!(%peer, dropped, "client fell behind; reporting gap");
                        let msg = FeedMessage::Gap { dropped };
                        if let Err(e) = stream.write_all(&msg.encode()).await {
                            warn!(error = %e, %peer, "failed to send gap to client");
                            break;
                        }
                    }
                    None => break,
                }
            }

            _ = heartbeat_timer.tick() => {
                let msg = FeedMessage::Heartbeat;
                if let Err(e) = stream.write_all(&msg.encode()).await {
                    debug!(error = %e, %peer, "failed to send heartbeat");
                    break;
                }
            }
        }
    }

    session_cancel.cancel();
    let _ = pump.await;
    info!(%peer, "client disconnected");

    Ok(())
}

/// Read and validate the subscribe handshake
async fn read_subscribe(
    stream: &mut TcpStream,
    config: &FeedServerConfig,
) -> Result<SubscribeRequest> {
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(StreamError::Io)?;

    let msg_len = read_length_prefix(&len_buf)
        .ok_or_else(|| ProtocolError::Malformed("invalid length prefix".into()))?
        as usize;

    if msg_len > config.read_buffer_size {
        return Err(StreamError::Protocol(ProtocolError::Malformed(format!(
            "subscribe message too large: {msg_len} bytes"
        ))));
    }

    let mut buf = BytesMut::with_capacity(msg_len);
    buf.resize(msg_len, 0);
    stream.read_exact(&mut buf).await.map_err(StreamError::Io)?;

    match FeedMessage::decode(buf.freeze())? {
        FeedMessage::Subscribe(request) => Ok(request),
        _ => Err(StreamError::ExpectedSubscribe),
    }
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
