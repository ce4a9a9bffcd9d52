use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use dw_core::prelude::*;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::aggregator::ManifestAggregator;
use crate::config::DiscoveryConfig;
use crate::manager::watch_for_workloads;
use crate::notifier::Notifier;
use crate::source::PodEventSource;

// How an observation window came to an end.  None of these are errors: a run that hits its
// deadline still emits whatever it collected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Termination {
    Exhausted,
    DeadlineReached,
    Interrupted,
}

pub struct DiscoveryRun {
    config: DiscoveryConfig,
    source: Arc<dyn PodEventSource>,
}

impl DiscoveryRun {
    pub fn new(config: DiscoveryConfig, source: Arc<dyn PodEventSource>) -> anyhow::Result<DiscoveryRun> {
        Ok(DiscoveryRun { config: config.validate()?, source })
    }

    // Run the whole pipeline under a single cancellation token.  The token fires when the
    // deadline passes, when `interrupt` resolves, or when every watcher has finished on its own;
    // the notifier is always fully stopped before this returns.
    pub async fn run<W, F>(self, sink: W, interrupt: F) -> anyhow::Result<Termination>
    where
        W: Write + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let notifier = Notifier::new(self.config.notify_interval, self.config.notify_start_delay);
        let notifier_task = tokio::spawn(notifier.start(cancel.clone()).in_current_span());
        let trigger = cancel_on_trigger(self.config.duration, interrupt, cancel.clone());
        let trigger_task = tokio::spawn(trigger.in_current_span());

        info!("starting to watch for workloads for {:?}", self.config.duration);
        let aggregator = ManifestAggregator::new(sink, self.config.output_format);
        let res = watch_for_workloads(
            &self.config.namespaces,
            self.source,
            aggregator,
            self.config.channel_capacity,
            cancel.clone(),
        )
        .await;

        // If the watchers all ran dry on their own nothing has cancelled the token yet, and the
        // notifier and trigger tasks are still waiting on it.
        cancel.cancel();
        let termination = trigger_task.await.unwrap_or_else(|err| {
            warn!("run trigger task did not complete: {err}");
            Termination::Exhausted
        });
        match notifier_task.await {
            Ok(count) => debug!("notifier emitted {count} liveness message(s)"),
            Err(err) => warn!("notifier task did not complete: {err}"),
        }

        res?;
        match termination {
            Termination::Exhausted => info!("completed execution because every namespace watch finished"),
            Termination::DeadlineReached => info!("completed execution because the max watch duration was reached"),
            Termination::Interrupted => info!("completed execution because the run was interrupted"),
        }
        Ok(termination)
    }
}

async fn cancel_on_trigger<F: Future<Output = ()>>(
    deadline: Duration,
    interrupt: F,
    cancel: CancellationToken,
) -> Termination {
    let termination = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Termination::Exhausted,
        _ = interrupt => Termination::Interrupted,
        _ = sleep(deadline) => Termination::DeadlineReached,
    };
    cancel.cancel();
    termination
}
