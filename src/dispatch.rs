//! Dispatcher: one full run from address resolution to summary.

use crate::channel::{Channel, ChannelBuilder, ChannelOptions, Engine};
use crate::roles::producer::run_producer;
use crate::routing::RoutingTable;
use crate::summary::DispatchSummary;
use anyhow::{Context, Result, bail};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// What to do when no record source could be opened at all. Individual
/// open failures are always isolated to their own producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyRunPolicy {
    /// Treat a run that performed no work as fatal.
    Abort,
    /// Report the zero-count summary instead.
    Degrade,
}

pub struct DispatchConfig {
    pub routing_config: PathBuf,
    pub node: String,
    pub sources: Vec<PathBuf>,
    pub engine: Engine,
    pub options: ChannelOptions,
    pub empty_policy: EmptyRunPolicy,
}

/// Resolves the target address, opens the shared channel, fans out one
/// producer per source, joins them all, and aggregates. Resolution and
/// channel-open failures are fatal and happen before any send; everything
/// after that is data in the summary.
pub async fn run_dispatch(config: DispatchConfig) -> Result<DispatchSummary> {
    let started = Instant::now();

    let table = RoutingTable::load(&config.routing_config)
        .await
        .context("loading routing config")?;
    let address = table
        .resolve(&config.node)
        .context("resolving target node")?
        .to_string();
    info!(node = %config.node, %address, "resolved target address");

    let channel: Arc<dyn Channel> =
        ChannelBuilder::open(config.engine.clone(), &address, config.options.clone())
            .await
            .context("opening channel")?;

    let mut handles = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        handles.push(tokio::spawn(run_producer(source.clone(), channel.clone())));
    }
    info!(producers = handles.len(), "producers spawned");

    let mut producers = Vec::with_capacity(handles.len());
    for joined in join_all(handles).await {
        producers.push(joined.context("producer task panicked")?);
    }

    if let Err(err) = channel.shutdown().await {
        debug!(%err, "channel shutdown failed");
    }

    let summary = DispatchSummary::aggregate(producers, started.elapsed());
    if summary.all_sources_failed() && config.empty_policy == EmptyRunPolicy::Abort {
        bail!("no record source could be opened");
    }
    Ok(summary)
}
