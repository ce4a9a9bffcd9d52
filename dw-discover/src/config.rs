use std::time::Duration;

use dw_core::prelude::*;
use tracing::*;

use crate::errors::DiscoveryError;
use crate::manifest::OutputFormat;

// Selectors are handed to the apiserver as-is; it is the authority on their syntax
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WatchOptions {
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DiscoveryConfig {
    pub namespaces: Vec<String>,
    pub duration: Duration,
    pub notify_interval: Duration,
    pub notify_start_delay: Duration,
    pub channel_capacity: usize,
    pub output_format: OutputFormat,
    pub watch_options: WatchOptions,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            namespaces: vec![],
            duration: DEFAULT_RUN_DURATION,
            notify_interval: DEFAULT_NOTIFY_INTERVAL,
            notify_start_delay: DEFAULT_NOTIFY_START_DELAY,
            channel_capacity: DISCOVERY_CHANNEL_CAPACITY,
            output_format: OutputFormat::default(),
            watch_options: WatchOptions::default(),
        }
    }
}

impl DiscoveryConfig {
    pub fn with_namespaces<S: AsRef<str>>(namespaces: &[S]) -> DiscoveryConfig {
        DiscoveryConfig {
            namespaces: namespaces.iter().map(|ns| ns.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    // Check the config for things that would make the run pointless, and collapse repeated
    // namespaces so that each one gets exactly one watcher.
    pub fn validate(mut self) -> anyhow::Result<DiscoveryConfig> {
        if self.namespaces.is_empty() {
            return Err(DiscoveryError::invalid_config("at least one namespace is required"));
        }
        if let Some(ns) = self.namespaces.iter().find(|ns| ns.is_empty()) {
            return Err(DiscoveryError::invalid_config(&format!("namespace name may not be empty: {ns:?}")));
        }
        if self.notify_interval.is_zero() {
            return Err(DiscoveryError::invalid_config("notifier interval must be greater than zero"));
        }
        if self.channel_capacity == 0 {
            return Err(DiscoveryError::invalid_config("channel capacity must be greater than zero"));
        }

        let mut unique: Vec<String> = Vec::with_capacity(self.namespaces.len());
        for ns in self.namespaces.drain(..) {
            if unique.contains(&ns) {
                warn!("namespace {ns} was requested more than once; watching it once");
            } else {
                unique.push(ns);
            }
        }
        self.namespaces = unique;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_validate_dedups_namespaces() {
        let config = DiscoveryConfig::with_namespaces(&["ns1", "ns2", "ns1", "ns3", "ns2"])
            .validate()
            .unwrap();
        assert_eq!(config.namespaces, vec!["ns1", "ns2", "ns3"]);
    }

    #[rstest]
    fn test_validate_defaults() {
        let config = DiscoveryConfig::with_namespaces(&["ns1"]).validate().unwrap();
        assert_eq!(config.notify_interval, Duration::from_secs(30));
        assert_eq!(config.notify_start_delay, Duration::from_secs(15));
        assert_eq!(config.output_format, OutputFormat::Json { compact: false });
    }

    #[rstest]
    #[case::no_namespaces(DiscoveryConfig::default())]
    #[case::empty_namespace(DiscoveryConfig::with_namespaces(&["ns1", ""]))]
    #[case::zero_interval(DiscoveryConfig { notify_interval: Duration::ZERO, ..DiscoveryConfig::with_namespaces(&["ns1"]) })]
    #[case::zero_capacity(DiscoveryConfig { channel_capacity: 0, ..DiscoveryConfig::with_namespaces(&["ns1"]) })]
    fn test_validate_invalid(#[case] config: DiscoveryConfig) {
        let err = config.validate().unwrap_err();
        assert_contains!(err.to_string(), "invalid discovery config");
    }
}
