//! Wiring of [`StepTimer`] to a [`DriftCorrectedScheduler`].
//!
//! The session is the only place that starts or cancels schedulers, so the
//! "scheduler active iff running stage" rule holds by construction.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::scheduler::{Clock, DriftCorrectedScheduler, SchedulerHandle, TokioClock};
use super::step_timer::{SchedulerCommand, StepTimer, TickOutcome};
use crate::audio::{AudioCue, SilentCue};
use crate::events::Event;

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A live encounter timer.
///
/// Every command returns its event and also publishes it, together with all
/// scheduler ticks, on the channel handed out at construction.
pub struct TimerSession<C: Clock = TokioClock> {
    timer: Arc<Mutex<StepTimer>>,
    scheduler: DriftCorrectedScheduler<C>,
    active: Option<SchedulerHandle>,
    events: UnboundedSender<Event>,
    cue: Arc<dyn AudioCue>,
    period: Duration,
}

impl TimerSession<TokioClock> {
    pub fn new() -> (Self, UnboundedReceiver<Event>) {
        Self::with_scheduler(DriftCorrectedScheduler::new(TokioClock::new()))
    }
}

impl<C: Clock> TimerSession<C> {
    pub fn with_scheduler(scheduler: DriftCorrectedScheduler<C>) -> (Self, UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            timer: Arc::new(Mutex::new(StepTimer::new())),
            scheduler,
            active: None,
            events,
            cue: Arc::new(SilentCue),
            period: TICK_PERIOD,
        };
        (session, rx)
    }

    /// Override the tick period. Takes effect from the next scheduler start.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_cue(mut self, cue: Arc<dyn AudioCue>) -> Self {
        self.cue = cue;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Copy of the current timer state.
    pub fn timer(&self) -> StepTimer {
        *lock(&self.timer)
    }

    pub fn is_ticking(&self) -> bool {
        self.active.is_some()
    }

    pub fn snapshot(&self) -> Event {
        Event::snapshot(&lock(&self.timer))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Handle a click: advance the stage and start or cancel the scheduler.
    pub fn advance(&mut self) -> Event {
        let (transition, seconds_remaining) = {
            let mut timer = lock(&self.timer);
            let transition = timer.advance();
            (transition, timer.seconds_remaining())
        };
        debug!(from = ?transition.from, to = ?transition.to, seconds_remaining, "stage advanced");

        match transition.command {
            SchedulerCommand::StartScheduler => self.start_ticking(),
            SchedulerCommand::CancelScheduler => self.stop_ticking(),
            SchedulerCommand::Nothing => {}
        }

        self.publish(Event::StageChanged {
            from: transition.from,
            to: transition.to,
            seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Cancel any scheduler and return to the initial state.
    pub fn reset(&mut self) -> Event {
        lock(&self.timer).reset();
        self.stop_ticking();
        debug!("timer reset");
        self.publish(Event::TimerReset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_ticking(&mut self) {
        // A leftover handle would mean two schedulers on one timer.
        self.stop_ticking();

        if let Some(rate) = lock(&self.timer).cue_rate() {
            self.cue.play(rate);
        }

        let timer = Arc::clone(&self.timer);
        let events = self.events.clone();
        let cue = Arc::clone(&self.cue);
        let handle = self.scheduler.start(self.period, move |_firing| {
            deliver_tick(&timer, &events, cue.as_ref());
        });
        self.active = Some(handle);
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }

    fn publish(&self, event: Event) -> Event {
        let _ = self.events.send(event.clone());
        event
    }
}

/// Apply one scheduler firing.
///
/// A firing can race with the click that stopped the countdown; it is
/// dropped unless the timer is still in a running stage.
fn deliver_tick(timer: &Mutex<StepTimer>, events: &UnboundedSender<Event>, cue: &dyn AudioCue) {
    let (outcome, cue_rate, seconds_remaining) = {
        let mut timer = lock(timer);
        if !timer.stage().is_running() {
            debug!(stage = ?timer.stage(), "dropping tick outside a running stage");
            return;
        }
        let outcome = timer.tick();
        (outcome, timer.cue_rate(), timer.seconds_remaining())
    };
    if let Some(rate) = cue_rate {
        cue.play(rate);
    }
    let _ = events.send(Event::Tick {
        seconds_remaining,
        wrapped: outcome == TickOutcome::Wrapped,
        at: Utc::now(),
    });
}

fn lock(timer: &Mutex<StepTimer>) -> MutexGuard<'_, StepTimer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}
