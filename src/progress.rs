// Synthetic progress emitter. While a request is in flight it sends the
// episode number on a channel every `period`; the controller turns each one
// into an `Event::Tick`. It never decides how far progress goes, the session
// does.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Running emitter bound to one Processing episode.
///
/// Dropping it cancels the task; [`ProgressEmitter::stop`] also waits for the
/// task to finish so nothing is sent afterwards.
pub struct ProgressEmitter {
    episode: u64,
    guard: DropGuard,
    handle: JoinHandle<()>,
}

impl ProgressEmitter {
    /// Start ticking. The first tick fires one `period` after the call.
    pub fn spawn(episode: u64, period: Duration, ticks: mpsc::UnboundedSender<u64>) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if ticks.send(episode).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!(episode, "Progress emitter finished");
        });

        Self {
            episode,
            guard: token.drop_guard(),
            handle,
        }
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(self) {
        let Self { guard, handle, .. } = self;
        drop(guard);
        if let Err(err) = handle.await {
            tracing::warn!(error = %err, "Progress emitter task failed");
        }
    }
}
