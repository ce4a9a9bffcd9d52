#![cfg_attr(coverage, feature(coverage_attribute))]
mod aggregator;
mod config;
mod controller;
mod errors;
mod manager;
mod manifest;
mod notifier;
mod source;
mod watcher;

pub use crate::aggregator::ManifestAggregator;
pub use crate::config::{
    DiscoveryConfig,
    WatchOptions,
};
pub use crate::controller::{
    DiscoveryRun,
    Termination,
};
pub use crate::manager::watch_for_workloads;
pub use crate::manifest::{
    DiscoveredContainer,
    DiscoveredImage,
    DiscoveredPod,
    Manifest,
    OutputFormat,
};
pub use crate::notifier::Notifier;
pub use crate::source::{
    KubePodSource,
    PodEventSource,
    PodStream,
};
pub use crate::watcher::{
    NamespaceWatcher,
    discovered_images_for,
};

#[cfg(test)]
mod tests;
