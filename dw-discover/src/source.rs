use async_trait::async_trait;
use dw_core::prelude::*;
use futures::stream::BoxStream;
use futures::{
    StreamExt,
    TryStreamExt,
};
use kube::runtime::WatchStreamExt;
use kube::runtime::watcher::{
    self,
    watcher,
};

use crate::config::WatchOptions;

pub type PodStream = BoxStream<'static, anyhow::Result<corev1::Pod>>;

// Anything that can hand us a live feed of pods for a single namespace.  An error from `watch`
// means the feed could never be established; an error item means it broke partway through.  The
// stream ending means no more pods will ever be reported.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PodEventSource: Send + Sync {
    async fn watch(&self, namespace: &str) -> anyhow::Result<PodStream>;
}

pub struct KubePodSource {
    client: kube::Client,
    options: WatchOptions,
}

impl KubePodSource {
    pub fn new(client: kube::Client, options: WatchOptions) -> KubePodSource {
        KubePodSource { client, options }
    }

    fn watcher_config(&self) -> watcher::Config {
        let mut config = watcher::Config::default();
        if let Some(labels) = self.options.label_selector.as_deref() {
            config = config.labels(labels);
        }
        if let Some(fields) = self.options.field_selector.as_deref() {
            config = config.fields(fields);
        }
        config
    }
}

#[async_trait]
impl PodEventSource for KubePodSource {
    // The kube watcher doesn't do any I/O until it's polled, so a bad namespace or missing RBAC
    // permissions shows up as the first item on the stream rather than as an error here.
    async fn watch(&self, namespace: &str) -> anyhow::Result<PodStream> {
        let pod_api: kube::Api<corev1::Pod> = kube::Api::namespaced(self.client.clone(), namespace);
        Ok(watcher(pod_api, self.watcher_config())
            .applied_objects()
            .map_err(|e| e.into())
            .boxed())
    }
}
