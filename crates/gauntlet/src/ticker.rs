//! Elapsed-time ticker.
//!
//! While a session is playing, a background task emits a tick every
//! interval so the clock on screen keeps moving. The ticker lives exactly as
//! long as the [`Ticker`] handle: cancelling or dropping it stops the task.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Handle to a running tick task
pub struct Ticker {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking every `period`, sending a running tick count on `ticks`.
    ///
    /// The first tick arrives one full period after spawning.
    pub fn spawn(period: Duration, ticks: mpsc::UnboundedSender<u64>) -> Self {
        let (cancel, mut cancelled) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut count = 0u64;

            tracing::debug!(period_ms = period.as_millis() as u64, "Ticker started");

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        count += 1;
                        if ticks.send(count).is_err() {
                            // Receiver gone; nobody is watching the clock
                            break;
                        }
                    }
                    _ = &mut cancelled => {
                        break;
                    }
                }
            }

            tracing::debug!(ticks = count, "Ticker stopped");
        });

        Self {
            cancel: Some(cancel),
            handle,
        }
    }

    /// Stop ticking. No tick is sent after this returns.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.handle.abort();
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
