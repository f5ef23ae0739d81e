use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Polling Loop: owns the single repeating timer.
///
/// The first tick runs immediately, later ticks every `period`. Ticks for one
/// loop never overlap; a slow fetch delays the next tick instead of stacking.
/// [`Poller::trigger`] runs an extra tick inside the same loop.
pub struct Poller {
    period: Duration,
    handle: Option<JoinHandle<()>>,
    wake: Arc<Notify>,
}

impl Poller {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
            wake: Arc::new(Notify::new()),
        }
    }

    /// Replace any running loop with one that calls `tick` on every period.
    ///
    /// The loop ends early when `tick` returns [`ControlFlow::Break`].
    pub fn start<F, Fut>(&mut self, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.stop();

        // Fresh notifier so a trigger aimed at the old loop is not replayed
        self.wake = Arc::new(Notify::new());
        let wake = self.wake.clone();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    () = wake.notified() => tracing::debug!("Out-of-cycle tick"),
                }
                if tick().await.is_break() {
                    tracing::debug!("Polling loop ended by tick");
                    break;
                }
            }
        }));

        tracing::debug!(period_ms = period.as_millis(), "Polling started");
    }

    /// Run one extra tick as soon as the loop is idle, keeping the schedule.
    ///
    /// Returns `false` when no loop is running.
    pub fn trigger(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.wake.notify_one();
        true
    }

    /// Cancel the running loop, if any. An in-flight tick is dropped with it.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Polling stopped");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
