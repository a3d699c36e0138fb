//! TCP engine: one framed request per send, one framed ack back.
//!
//! The connection is dialed lazily on the first send, so an unreachable
//! endpoint surfaces as `Unavailable` at send time rather than at open.
//! A mutex guards the stream for the full request/ack exchange, which is
//! what makes the shared handle safe for concurrent producers.

use super::{Channel, ChannelError, ChannelOptions};
use crate::record::{Ack, RecordRequest};
use crate::wire;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const MAX_ACK_LEN: u32 = 64 * 1024;

pub async fn open(
    address: &str,
    opts: ChannelOptions,
) -> Result<Arc<dyn Channel>, ChannelError> {
    let timeout_ms = opts
        .params
        .get("timeout_ms")
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    Ok(Arc::new(TcpChannel {
        address: address.to_string(),
        send_timeout: Duration::from_millis(timeout_ms),
        conn: Mutex::new(None),
    }))
}

pub struct TcpChannel {
    address: String,
    send_timeout: Duration,
    conn: Mutex<Option<TcpStream>>,
}

impl TcpChannel {
    async fn exchange(
        &self,
        conn: &mut Option<TcpStream>,
        request: &RecordRequest,
    ) -> Result<Ack, ChannelError> {
        if conn.is_none() {
            let stream = TcpStream::connect(&self.address).await.map_err(|e| {
                ChannelError::Unavailable(format!("connect {}: {}", self.address, e))
            })?;
            *conn = Some(stream);
        }
        let Some(stream) = conn.as_mut() else {
            return Err(ChannelError::Unavailable("no connection".to_string()));
        };

        let frame = wire::frame_record(&request.payload);
        stream
            .write_all(&frame)
            .await
            .map_err(|e| ChannelError::Unavailable(format!("write: {e}")))?;

        let mut len_buf = [0u8; 4];
        stream
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| ChannelError::Unavailable(format!("read ack: {e}")))?;
        let len = u32::from_le_bytes(len_buf);
        if len == 0 || len > MAX_ACK_LEN {
            return Err(ChannelError::Unavailable(format!(
                "garbled ack frame (length {len})"
            )));
        }
        let mut body = vec![0u8; len as usize];
        stream
            .read_exact(&mut body)
            .await
            .map_err(|e| ChannelError::Unavailable(format!("read ack: {e}")))?;

        match wire::parse_ack(&body) {
            Some((wire::ACK_OK, _)) => Ok(Ack),
            Some((_, message)) => Err(ChannelError::Rejected(message)),
            None => Err(ChannelError::Unavailable("unparseable ack frame".to_string())),
        }
    }

    async fn reset(&self) {
        self.conn.lock().await.take();
    }
}

#[async_trait::async_trait]
impl Channel for TcpChannel {
    async fn send(&self, request: RecordRequest) -> Result<Ack, ChannelError> {
        // The lock spans the timeout as well as the exchange: a timed-out
        // request's stream must be dropped before the next sender can take
        // the guard, or that sender would read this request's late ack as
        // its own.
        let mut guard = self.conn.lock().await;
        match timeout(self.send_timeout, self.exchange(&mut guard, &request)).await {
            Ok(Ok(ack)) => Ok(ack),
            Ok(Err(err)) => {
                // A rejection leaves the stream framed correctly; anything
                // else may have desynced it, so re-dial on the next send.
                if !matches!(err, ChannelError::Rejected(_)) {
                    guard.take();
                }
                Err(err)
            }
            Err(_) => {
                guard.take();
                Err(ChannelError::Timeout(self.send_timeout))
            }
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        self.reset().await;
        Ok(())
    }
}
