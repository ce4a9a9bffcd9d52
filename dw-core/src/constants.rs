use std::time::Duration;

// Liveness notifier
pub const DEFAULT_NOTIFY_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTIFY_START_DELAY: Duration = Duration::from_secs(15);
pub const NOTIFICATION_TEXT: &str = "discovery still running";
pub const NOTIFIER_SHUTDOWN_TEXT: &str = "notifier shutting down";

// Run defaults
pub const DEFAULT_RUN_DURATION: Duration = Duration::from_secs(60);

// The watchers block on this channel when the aggregator falls behind; keeping it small bounds
// the number of discovered images sitting in memory at any one time.
pub const DISCOVERY_CHANNEL_CAPACITY: usize = 1;

// Manifest type strings
pub const CONTAINER_TYPE_STANDARD: &str = "Container";
pub const CONTAINER_TYPE_INIT: &str = "InitContainer";
pub const CONTAINER_TYPE_EPHEMERAL: &str = "EphemeralContainer";
