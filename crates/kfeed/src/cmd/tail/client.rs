//! Feed client - connects to the kfeed server

use anyhow::{Context, Result};
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use kfeed_protocol::{FeedMessage, SubscribeRequest, read_length_prefix};

/// Client for connecting to the feed server
pub struct FeedClient {
    stream: TcpStream,
    read_buf: BytesMut,
}

impl FeedClient {
    /// Connect to the feed server at the given address
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("failed to connect to {addr}"))?;

        Ok(Self {
            stream,
            read_buf: BytesMut::with_capacity(64 * 1024),
        })
    }

    /// Send a subscribe request to the server
    pub async fn subscribe(&mut self, request: &SubscribeRequest) -> Result<()> {
        let msg = FeedMessage::Subscribe(request.clone());
        let encoded = msg.encode();

        self.stream
            .write_all(&encoded)
            .await
            .context("failed to send subscribe request")?;

        Ok(())
    }

    /// Receive the next message from the server
    ///
    /// Returns `Ok(None)` if the connection is closed.
    pub async fn recv(&mut self) -> Result<Option<FeedMessage>> {
        loop {
            // Try to parse a complete message from the buffer
            if self.read_buf.len() >= 4 {
                let len = read_length_prefix(&self.read_buf)
                    .context("invalid length prefix")? as usize;

                if self.read_buf.len() >= 4 + len {
                    // We have a complete message
                    self.read_buf.advance(4);
                    let payload = self.read_buf.split_to(len).freeze();
                    let msg =
                        FeedMessage::decode(payload).context("failed to decode feed message")?;
                    return Ok(Some(msg));
                }
            }

            // Need more data - read from socket
            let n = self
                .stream
                .read_buf(&mut self.read_buf)
                .await
                .context("failed to read from socket")?;

            if n == 0 {
                // Connection closed
                return Ok(None);
            }
        }
    }
}
