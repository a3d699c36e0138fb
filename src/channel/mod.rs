//! Channel abstraction: trait, failure taxonomy, and engine factory.

pub mod config;
#[cfg(any(test, feature = "channel-mock"))]
pub mod mock;
pub mod tcp;

use crate::record::{Ack, RecordRequest};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
pub enum Engine {
    Tcp,
    #[cfg(any(test, feature = "channel-mock"))]
    Mock,
}

#[derive(Clone, Debug, Default)]
pub struct ChannelOptions {
    pub params: BTreeMap<String, String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("rejected: {0}")]
    Rejected(String),
}

impl ChannelError {
    /// Short tag used in failure descriptors and summary rows.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Shared handle to the remote node. Implementations own their internal
/// synchronization; `send` must be safe to interleave from many producers
/// without external locking.
#[async_trait::async_trait]
pub trait Channel: Send + Sync {
    /// Unary call: submit one record and block until acked or failed.
    async fn send(&self, request: RecordRequest) -> Result<Ack, ChannelError>;
    async fn shutdown(&self) -> Result<(), ChannelError>;
}

pub struct ChannelBuilder;

impl ChannelBuilder {
    /// Opens a channel handle bound to `address`. Establishment may be
    /// lazy; a dead endpoint can surface as `Unavailable` on first send.
    pub async fn open(
        engine: Engine,
        address: &str,
        opts: ChannelOptions,
    ) -> Result<Arc<dyn Channel>, ChannelError> {
        match engine {
            Engine::Tcp => tcp::open(address, opts).await,
            #[cfg(any(test, feature = "channel-mock"))]
            Engine::Mock => mock::open(address, opts).await,
        }
    }
}
