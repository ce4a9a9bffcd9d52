use std::io::Write;
use std::sync::Arc;

use dw_core::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::aggregator::ManifestAggregator;
use crate::errors::DiscoveryError;
use crate::source::PodEventSource;
use crate::watcher::{
    NamespaceWatcher,
    Receiver,
    Sender,
};

// Start one watcher per namespace plus the aggregator, all sharing a single bounded channel, and
// wait for everything to finish.  Watcher failures are logged and swallowed (they only affect
// their own namespace); an aggregator failure is returned, since it means no manifest was emitted.
//
// The aggregator is started alongside the watchers, not gated on them.  The channel is bounded so
// an early send just waits until the aggregator is receiving.  The flip side is that if the
// aggregator dies, the watchers keep running until the run ends and their results are discarded.
#[instrument(skip_all, fields(namespaces = namespaces.len()))]
pub async fn watch_for_workloads<W: Write + Send + 'static>(
    namespaces: &[String],
    source: Arc<dyn PodEventSource>,
    aggregator: ManifestAggregator<W>,
    channel_capacity: usize,
    cancel: CancellationToken,
) -> EmptyResult {
    let (tx, rx): (Sender, Receiver) = mpsc::channel(channel_capacity);
    let aggregator_task = tokio::spawn(aggregator.start(rx, cancel.clone()).in_current_span());

    let mut js = JoinSet::new();
    for ns in namespaces {
        let watcher = NamespaceWatcher::new(ns, source.clone(), tx.clone());
        js.spawn(watcher.start(cancel.clone()).in_current_span());
    }

    // Every watcher owns a clone of the sender; once ours is gone, the channel closes as soon as the
    // last watcher exits, which is the aggregator's signal that there's no more input coming.
    drop(tx);

    let mut failed = 0;
    while let Some(res) = js.join_next().await {
        match res {
            Ok(Ok(())) => (),
            Ok(Err(err)) => {
                failed += 1;
                error!("pod monitor failed: {err:#}");
            },
            Err(err) => {
                failed += 1;
                error!("pod monitor task did not complete: {err}");
            },
        }
    }
    if failed > 0 {
        warn!("{failed} of {} namespace watcher(s) exited with an error", namespaces.len());
    }

    match aggregator_task.await {
        Ok(res) => res?,
        Err(err) => return Err(DiscoveryError::aggregator_failed(&err.to_string())),
    }

    info!("watch completed");
    Ok(())
}
