mod aggregator_test;
mod source_test;

use std::sync::Arc;

use dw_core::prelude::*;
use dw_testutils::*;
use futures::{
    StreamExt,
    stream,
};
use rstest::*;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

use super::*;
use crate::source::MockPodEventSource;

// A feed that reports each pod once and then ends
fn finite_feed(pods: Vec<corev1::Pod>) -> PodStream {
    stream::iter(pods.into_iter().map(Ok)).boxed()
}

// A feed that reports each pod once and then stays open forever, like a real watch would
fn open_feed(pods: Vec<corev1::Pod>) -> PodStream {
    stream::iter(pods.into_iter().map(Ok)).chain(stream::pending()).boxed()
}

fn expect_feed(source: &mut MockPodEventSource, namespace: &'static str, pods: Vec<corev1::Pod>, open: bool) {
    source
        .expect_watch()
        .withf(move |ns| ns == namespace)
        .returning(move |_| Ok(if open { open_feed(pods.clone()) } else { finite_feed(pods.clone()) }))
        .once();
}

fn expect_watch_failure(source: &mut MockPodEventSource, namespace: &'static str) {
    source
        .expect_watch()
        .withf(move |ns| ns == namespace)
        .returning(|_| Err(anyhow::anyhow!("pods is forbidden")))
        .once();
}

fn container(name: &str, container_type: ContainerType, pod: &str, namespace: &str) -> DiscoveredContainer {
    DiscoveredContainer {
        name: name.into(),
        container_type,
        pod: DiscoveredPod { name: pod.into(), namespace: namespace.into() },
    }
}

fn image(image: &str, name: &str, pod: &str, namespace: &str) -> DiscoveredImage {
    DiscoveredImage::new(image, container(name, ContainerType::Standard, pod, namespace))
}
