//! Mock engine with deterministic failure injection, for tests and dry
//! runs against no live endpoint.
//!
//! Options:
//! - `fail_every=N`: fail every Nth send (1-based, counted across all
//!   producers sharing the handle)
//! - `fail_contains=SUBSTR`: fail any payload containing the substring
//! - `fail_kind=unavailable|timeout|rejected`: failure flavor (default
//!   unavailable)

use super::{Channel, ChannelError, ChannelOptions};
use crate::record::{Ack, RecordRequest};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailKind {
    Unavailable,
    Timeout,
    Rejected,
}

impl FailKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "unavailable" => Some(Self::Unavailable),
            "timeout" => Some(Self::Timeout),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    fn into_error(self, message: String) -> ChannelError {
        match self {
            Self::Unavailable => ChannelError::Unavailable(message),
            Self::Timeout => ChannelError::Timeout(Duration::ZERO),
            Self::Rejected => ChannelError::Rejected(message),
        }
    }
}

pub async fn open(
    _address: &str,
    opts: ChannelOptions,
) -> Result<Arc<dyn Channel>, ChannelError> {
    Ok(MockChannel::from_options(&opts))
}

pub struct MockChannel {
    fail_every: Option<u64>,
    fail_contains: Option<String>,
    fail_kind: FailKind,
    calls: AtomicU64,
    delivered: Mutex<Vec<String>>,
}

impl MockChannel {
    pub fn from_options(opts: &ChannelOptions) -> Arc<Self> {
        let fail_every = opts
            .params
            .get("fail_every")
            .and_then(|s| s.parse().ok())
            .filter(|n: &u64| *n > 0);
        let fail_contains = opts.params.get("fail_contains").cloned();
        let fail_kind = opts
            .params
            .get("fail_kind")
            .and_then(|s| FailKind::parse(s))
            .unwrap_or(FailKind::Unavailable);
        Arc::new(Self {
            fail_every,
            fail_contains,
            fail_kind,
            calls: AtomicU64::new(0),
            delivered: Mutex::new(Vec::new()),
        })
    }

    pub fn always_ok() -> Arc<Self> {
        Self::from_options(&ChannelOptions::default())
    }

    /// Payloads accepted so far, in arrival order.
    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Channel for MockChannel {
    async fn send(&self, request: RecordRequest) -> Result<Ack, ChannelError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let payload = request.payload_str().into_owned();

        if let Some(every) = self.fail_every {
            if n % every == 0 {
                return Err(self.fail_kind.into_error(format!("injected failure on call {n}")));
            }
        }
        if let Some(needle) = &self.fail_contains {
            if payload.contains(needle.as_str()) {
                return Err(self
                    .fail_kind
                    .into_error(format!("injected failure for payload containing '{needle}'")));
            }
        }

        self.delivered.lock().unwrap().push(payload);
        Ok(Ack)
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
