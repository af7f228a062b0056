//! Drift-corrected periodic scheduler.
//!
//! Each firing re-targets the next one against a fixed anchor instead of the
//! previous firing, so delivery jitter does not accumulate:
//!
//! ```text
//! elapsed   = observed - anchor
//! rounded   = round(elapsed / period) * period
//! target    = anchor + rounded + period
//! delay     = max(target - now, 0)
//! ```
//!
//! Rounding to the nearest grid slot (not flooring) absorbs late deliveries of
//! up to half a period. A delivery later than that lands on the following slot,
//! so one firing is skipped but the grid stays aligned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Monotonic millisecond clock.
///
/// `None` means no timing source is available; the scheduler then falls back
/// to unsynchronized periodic firing.
pub trait Clock: Send + Sync + 'static {
    fn now_ms(&self) -> Option<f64>;
}

/// Clock backed by `tokio::time::Instant`, so paused test runtimes control it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> Option<f64> {
        Some(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Delay until the next grid-aligned firing.
///
/// `observed_ms` is the time the current firing was delivered and `now_ms` the
/// time the delay is being computed (after the callback ran).
pub fn next_delay(anchor_ms: f64, period_ms: f64, observed_ms: f64, now_ms: f64) -> Duration {
    let elapsed = observed_ms - anchor_ms;
    let rounded = (elapsed / period_ms).round() * period_ms;
    let target = anchor_ms + rounded + period_ms;
    Duration::from_secs_f64((target - now_ms).max(0.0) / 1000.0)
}

/// Passed to the tick callback on every firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    /// Zero-based count of firings for this scheduler instance.
    pub index: u64,
    /// Clock reading when the firing was delivered.
    pub observed_ms: Option<f64>,
}

#[derive(Debug)]
struct Shared {
    cancelled: AtomicBool,
    wake: Notify,
}

/// Handle to a running scheduler. Dropping it cancels the scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop further firings. Irreversible; calling it again is a no-op.
    pub fn cancel(&self) {
        if !self.shared.cancelled.swap(true, Ordering::AcqRel) {
            self.shared.wake.notify_one();
            debug!("scheduler cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Cancel and wait for the scheduler task to exit.
    pub async fn stop(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts drift-corrected periodic tasks on the current tokio runtime.
#[derive(Debug)]
pub struct DriftCorrectedScheduler<C = TokioClock> {
    clock: Arc<C>,
}

impl<C> Clone for DriftCorrectedScheduler<C> {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock> DriftCorrectedScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Invoke `on_tick` once per `period` until the returned handle is
    /// cancelled or dropped.
    ///
    /// Must be called from within a tokio runtime. A zero period is clamped
    /// to one millisecond.
    pub fn start<F>(&self, period: Duration, mut on_tick: F) -> SchedulerHandle
    where
        F: FnMut(Firing) + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let period_ms = period.as_secs_f64() * 1000.0;
        let shared = Arc::new(Shared {
            cancelled: AtomicBool::new(false),
            wake: Notify::new(),
        });

        let clock = Arc::clone(&self.clock);
        let anchor = clock.now_ms();
        match anchor {
            Some(anchor) => debug!(anchor_ms = anchor, period_ms, "scheduler started"),
            None => warn!(period_ms, "no clock available, ticking without drift correction"),
        }

        let task_shared = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            let mut observed = anchor;
            let mut index = 0u64;
            loop {
                let delay = match (anchor, observed, clock.now_ms()) {
                    (Some(anchor), Some(observed), Some(now)) => {
                        next_delay(anchor, period_ms, observed, now)
                    }
                    _ => period,
                };

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = task_shared.wake.notified() => {}
                }
                if task_shared.cancelled.load(Ordering::Acquire) {
                    break;
                }

                observed = clock.now_ms();
                on_tick(Firing {
                    index,
                    observed_ms: observed,
                });
                index += 1;
            }
        });

        SchedulerHandle {
            shared,
            task: Some(task),
        }
    }
}
