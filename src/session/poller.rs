//! Fixed-interval polling loop
//!
//! The remote store offers no push channel, so the client discovers changes
//! by polling. A `Poller` runs one cycle immediately on start and then at a
//! fixed interval until stopped. Every cycle is handed a sequence number
//! assigned at issue time; reconcilers use it to discard results that
//! arrive out of order.
//!
//! The same loop drives both the global session list and the per-thread
//! board data. Exactly one poller runs per subject: the console stops the
//! old board poller before starting one for a newly selected thread.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Poll cadence for the session list and board data
///
/// Fixed by the backend protocol; deliberately not configurable.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Handle to a running polling loop
///
/// Dropping the handle stops the loop, which is what ties a board poller's
/// lifetime to the thread selection that spawned it.
pub struct Poller {
    shutdown: watch::Sender<bool>,
    trigger: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start a polling loop
    ///
    /// Runs `cycle` once immediately, then on every interval tick. The
    /// cycle receives its issue-time sequence number and owns its own
    /// error handling: a failed fetch is reported inside the cycle (and
    /// leaves previous state untouched), never by breaking the loop.
    ///
    /// # Arguments
    ///
    /// * `interval` - Time between cycle starts
    /// * `cycle` - Async closure performing one fetch-and-reconcile pass
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use cofound::session::Poller;
    ///
    /// # async fn example() {
    /// let poller = Poller::start(Duration::from_secs(5), |seq| async move {
    ///     tracing::debug!(seq, "poll cycle");
    /// });
    /// poller.stop();
    /// # }
    /// ```
    pub fn start<F, Fut>(interval: Duration, mut cycle: F) -> Self
    where
        F: FnMut(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let trigger = Arc::new(Notify::new());
        let task_trigger = trigger.clone();
        let seq = AtomicU64::new(0);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = task_trigger.notified() => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                if *shutdown_rx.borrow() {
                    break;
                }

                let issue_seq = seq.fetch_add(1, Ordering::SeqCst) + 1;
                cycle(issue_seq).await;
            }

            tracing::debug!("Polling loop stopped");
        });

        Self {
            shutdown: shutdown_tx,
            trigger,
            handle,
        }
    }

    /// Force an immediate out-of-schedule cycle
    ///
    /// Used after a mutation's network call settles so the poller, as the
    /// single writer of confirmed state, picks up the result promptly.
    pub fn poke(&self) {
        self.trigger.notify_one();
    }

    /// Stop the loop
    ///
    /// The cycle currently in flight is allowed to finish; no further
    /// cycles start.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_first_cycle_runs_immediately() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let poller = Poller::start(Duration::from_secs(60), move |_seq| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        poller.stop();
    }

    #[tokio::test]
    async fn test_cycles_repeat_at_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let poller = Poller::start(Duration::from_millis(20), move |_seq| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(110)).await;
        let observed = count.load(Ordering::SeqCst);
        assert!(observed >= 3, "expected several cycles, got {}", observed);
        poller.stop();
    }

    #[tokio::test]
    async fn test_sequence_numbers_increase_from_one() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let poller = Poller::start(Duration::from_millis(10), move |seq| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(seq);
            }
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        poller.stop();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert_eq!(seen[0], 1);
        for pair in seen.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
    }

    #[tokio::test]
    async fn test_poke_forces_immediate_cycle() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let poller = Poller::start(Duration::from_secs(60), move |_seq| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        poller.poke();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        poller.stop();
    }

    #[tokio::test]
    async fn test_stop_halts_cycles() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let poller = Poller::start(Duration::from_millis(10), move |_seq| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        poller.stop();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let at_stop = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
    }

    #[tokio::test]
    async fn test_drop_stops_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        {
            let _poller = Poller::start(Duration::from_millis(10), move |_seq| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_drop = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }
}
