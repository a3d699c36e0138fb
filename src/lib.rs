//! Synthetic record injection harness: fans out one producer task per
//! record source and drives a shared request/ack channel to a remote
//! ingestion node, reporting per-producer and aggregate outcomes.

pub mod channel;
pub mod dispatch;
pub mod logging;
pub mod output;
pub mod rate;
pub mod record;
pub mod roles;
pub mod routing;
pub mod source;
pub mod summary;
pub mod wire;
