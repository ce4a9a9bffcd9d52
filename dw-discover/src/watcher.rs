use std::collections::HashSet;
use std::sync::Arc;

use dw_core::prelude::*;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::manifest::{
    DiscoveredContainer,
    DiscoveredImage,
    DiscoveredPod,
};
use crate::source::PodEventSource;

pub type Sender = mpsc::Sender<DiscoveredImage>;
pub type Receiver = mpsc::Receiver<DiscoveredImage>;

// Build one single-container DiscoveredImage per container slot that has an image set.  The
// namespace comes from the watcher rather than from the pod object, since it's the watcher that
// knows which namespace it asked for.
pub fn discovered_images_for(pod: &corev1::Pod, namespace: &str) -> anyhow::Result<Vec<DiscoveredImage>> {
    let pod_name = pod.name_any();
    debug!("found a pod: {pod_name}");

    let images = pod
        .container_refs()?
        .into_iter()
        .filter_map(|c| {
            let image = c.image.filter(|i| !i.is_empty())?;
            debug!(container = c.name, pod = %pod_name, image, "found a {}", c.container_type);
            Some(DiscoveredImage::new(
                image,
                DiscoveredContainer {
                    name: c.name.into(),
                    container_type: c.container_type,
                    pod: DiscoveredPod { name: pod_name.clone(), namespace: namespace.into() },
                },
            ))
        })
        .collect();
    Ok(images)
}

// The NamespaceWatcher follows the pod feed for one namespace and forwards every discovered image
// to the aggregator.  Pods are reported once, the first time we see them; later updates to the
// same pod are ignored.  The watcher stops when the feed ends, when the run is cancelled, or when
// the feed reports an error (which is returned to the caller but never affects other namespaces).
pub struct NamespaceWatcher {
    namespace: String,
    source: Arc<dyn PodEventSource>,
    tx: Sender,
    seen_pods: HashSet<String>,
}

impl NamespaceWatcher {
    pub fn new(namespace: &str, source: Arc<dyn PodEventSource>, tx: Sender) -> NamespaceWatcher {
        NamespaceWatcher {
            namespace: namespace.into(),
            source,
            tx,
            seen_pods: HashSet::new(),
        }
    }

    // This is not a reference because it needs to "own" itself when tokio spawns it
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub async fn start(mut self, cancel: CancellationToken) -> EmptyResult {
        debug!("establishing a pod watch");
        let mut pods = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("cancelled before the pod watch was established");
                return Ok(());
            },
            res = self.source.watch(&self.namespace) => match res {
                Ok(stream) => stream,
                Err(err) => {
                    return Err(err.context(format!("failed to establish a watch in namespace {}", self.namespace)));
                },
            },
        };

        info!("watching for workloads");
        loop {
            let maybe_pod = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("pod monitoring completed because the run was cancelled");
                    break;
                },
                maybe_pod = pods.next() => maybe_pod,
            };

            let pod = match maybe_pod {
                Some(Ok(pod)) => pod,
                Some(Err(err)) => {
                    return Err(err.context(format!("pod watch failed in namespace {}", self.namespace)));
                },
                None => {
                    debug!("pod monitoring completed because the watch stream closed");
                    break;
                },
            };

            if !self.first_sighting(&pod) {
                continue;
            }

            let images = match discovered_images_for(&pod, &self.namespace) {
                Ok(images) => images,
                Err(err) => {
                    warn!("skipping pod {}: {err}", pod.name_any());
                    continue;
                },
            };

            if !self.forward(images, &cancel).await {
                break;
            }
        }

        info!("done watching for workloads");
        Ok(())
    }

    fn first_sighting(&mut self, pod: &corev1::Pod) -> bool {
        let key = pod.uid().unwrap_or_else(|| pod.name_any());
        self.seen_pods.insert(key)
    }

    // Returns false if the watcher should stop: either the run was cancelled while we were
    // waiting for room on the channel, or the aggregator has gone away entirely.
    async fn forward(&self, images: Vec<DiscoveredImage>, cancel: &CancellationToken) -> bool {
        for image in images {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("abandoning send because the run was cancelled");
                    return false;
                },
                res = self.tx.send(image) => if res.is_err() {
                    warn!("aggregator is no longer receiving; stopping watcher");
                    return false;
                },
            }
        }
        true
    }
}
