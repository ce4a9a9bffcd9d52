use std::time::Duration;

use dw_core::prelude::*;
use tokio::time::{
    Instant,
    MissedTickBehavior,
    interval_at,
    sleep,
};
use tokio_util::sync::CancellationToken;
use tracing::*;

// Workloads can come and go at arbitrary times, so a run may go a long while without discovering
// anything.  The notifier logs a periodic message so whoever is watching the logs knows we haven't
// hung.  Nothing is logged before `start_delay` has elapsed, and nothing is logged after the run is
// cancelled.
#[derive(Clone, Copy, Debug)]
pub struct Notifier {
    interval: Duration,
    start_delay: Duration,
}

impl Notifier {
    pub fn new(interval: Duration, start_delay: Duration) -> Notifier {
        Notifier { interval, start_delay }
    }

    // Returns the number of liveness messages emitted.  The timers are owned by this future, so
    // once it has returned they have been released.
    #[instrument(skip_all)]
    pub async fn start(self, cancel: CancellationToken) -> usize {
        let mut count = 0;

        // The delay is checked first: a cancellation landing on the same instant the delay
        // elapses still gets its first signal.
        tokio::select! {
            biased;
            _ = sleep(self.start_delay) => {
                info!("{NOTIFICATION_TEXT}");
                count += 1;
            },
            _ = cancel.cancelled() => {
                debug!("{NOTIFIER_SHUTDOWN_TEXT}");
                return count;
            },
        }

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    info!("{NOTIFICATION_TEXT}");
                    count += 1;
                },
            }
        }

        debug!("{NOTIFIER_SHUTDOWN_TEXT}");
        count
    }
}
