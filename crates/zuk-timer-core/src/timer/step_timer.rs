//! Step timer implementation.
//!
//! The step timer is a five-stage state machine over a looping countdown. It
//! does not own a clock - the caller starts and cancels a scheduler as the
//! returned [`Transition`] instructs and forwards each firing to `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! AwaitingStart -> Running -> Paused -> RunningWithBonus -> Locked
//!       ^                                                      |
//!       +----------------------- reset() ----------------------+
//! ```
//!
//! `Locked` is not a running stage: locking cancels the scheduler and the
//! countdown freezes where it was. The browser widget this replaces only
//! ignored further clicks and left its interval counting down.
//!
//! ## Usage
//!
//! ```
//! use zuk_timer_core::timer::{SchedulerCommand, Stage, StepTimer};
//!
//! let mut timer = StepTimer::new();
//! let transition = timer.advance();
//! assert_eq!(transition.to, Stage::Running);
//! assert_eq!(transition.command, SchedulerCommand::StartScheduler);
//! timer.tick();
//! assert_eq!(timer.seconds_remaining(), 209);
//! ```

use serde::{Deserialize, Serialize};

/// Initial countdown length and the value the countdown wraps back to.
pub const RESET_SECONDS: u32 = 210;
/// Added once when entering [`Stage::RunningWithBonus`].
pub const BONUS_SECONDS: u32 = 105;
/// At or below this many seconds the warning cue fires.
pub const WARNING_THRESHOLD: u32 = 10;
/// Playback rate of the cue on the final second.
pub const SLOW_CUE_RATE: f32 = 0.2;
/// Playback rate of the cue for every other warning second.
pub const NORMAL_CUE_RATE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingStart,
    Running,
    Paused,
    /// Running again after the Jad spawn added its bonus seconds.
    RunningWithBonus,
    /// Terminal until `reset()`.
    Locked,
}

impl Stage {
    /// Stages during which a scheduler must be active.
    pub fn is_running(self) -> bool {
        matches!(self, Stage::Running | Stage::RunningWithBonus)
    }

    /// Guidance shown under the countdown.
    pub fn helper_text(self) -> &'static str {
        match self {
            Stage::AwaitingStart => "Click anywhere to start timer. (Once first set spawns)",
            Stage::Running => "Click anywhere to pause timer. (Once Zuk is under 600 HP)",
            Stage::Paused => "Click anywhere to start Jad. (Once Zuk is under 480 HP)",
            Stage::RunningWithBonus | Stage::Locked => "Good luck!",
        }
    }

    fn next(self) -> Stage {
        match self {
            Stage::AwaitingStart => Stage::Running,
            Stage::Running => Stage::Paused,
            Stage::Paused => Stage::RunningWithBonus,
            Stage::RunningWithBonus | Stage::Locked => Stage::Locked,
        }
    }
}

/// What the caller must do with its scheduler after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerCommand {
    StartScheduler,
    CancelScheduler,
    Nothing,
}

/// Result of a single `advance()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    pub command: SchedulerCommand,
}

/// Result of a single `tick()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Decremented(u32),
    /// The countdown reached zero and restarted at [`RESET_SECONDS`].
    Wrapped,
}

/// Encounter countdown with its stage progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTimer {
    seconds_remaining: u32,
    stage: Stage,
}

impl StepTimer {
    /// Create a timer awaiting its first click with the full countdown.
    pub fn new() -> Self {
        Self {
            seconds_remaining: RESET_SECONDS,
            stage: Stage::AwaitingStart,
        }
    }

    /// Create a timer at an arbitrary point of the encounter.
    pub fn with_state(stage: Stage, seconds_remaining: u32) -> Self {
        Self {
            seconds_remaining,
            stage,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn helper_text(&self) -> &'static str {
        self.stage.helper_text()
    }

    pub fn is_warning(&self) -> bool {
        self.seconds_remaining <= WARNING_THRESHOLD
    }

    pub fn is_final_second(&self) -> bool {
        self.seconds_remaining == 1
    }

    /// Playback rate for the warning cue, or `None` outside the warning window.
    pub fn cue_rate(&self) -> Option<f32> {
        if !self.is_warning() {
            return None;
        }
        if self.is_final_second() {
            Some(SLOW_CUE_RATE)
        } else {
            Some(NORMAL_CUE_RATE)
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Move to the next stage in response to a click.
    pub fn advance(&mut self) -> Transition {
        let from = self.stage;
        let to = from.next();
        let command = match (from, to) {
            (Stage::AwaitingStart, Stage::Running) => SchedulerCommand::StartScheduler,
            (Stage::Running, Stage::Paused) => SchedulerCommand::CancelScheduler,
            (Stage::Paused, Stage::RunningWithBonus) => {
                self.seconds_remaining += BONUS_SECONDS;
                SchedulerCommand::StartScheduler
            }
            (Stage::RunningWithBonus, Stage::Locked) => SchedulerCommand::CancelScheduler,
            _ => SchedulerCommand::Nothing,
        };
        self.stage = to;
        Transition { from, to, command }
    }

    /// Count down one second, wrapping to [`RESET_SECONDS`] instead of reaching zero.
    pub fn tick(&mut self) -> TickOutcome {
        match self.seconds_remaining.saturating_sub(1) {
            0 => {
                self.seconds_remaining = RESET_SECONDS;
                TickOutcome::Wrapped
            }
            n => {
                self.seconds_remaining = n;
                TickOutcome::Decremented(n)
            }
        }
    }

    /// Return to the initial state. Returns `true` if a scheduler was active
    /// and must be cancelled.
    pub fn reset(&mut self) -> bool {
        let was_running = self.stage.is_running();
        *self = Self::new();
        was_running
    }
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_awaiting_with_full_countdown() {
        let timer = StepTimer::new();
        assert_eq!(timer.stage(), Stage::AwaitingStart);
        assert_eq!(timer.seconds_remaining(), RESET_SECONDS);
        assert!(!timer.is_warning());
    }

    #[test]
    fn advance_follows_the_stage_table() {
        let mut timer = StepTimer::new();

        let t = timer.advance();
        assert_eq!((t.from, t.to), (Stage::AwaitingStart, Stage::Running));
        assert_eq!(t.command, SchedulerCommand::StartScheduler);
        assert_eq!(timer.seconds_remaining(), 210);

        let t = timer.advance();
        assert_eq!((t.from, t.to), (Stage::Running, Stage::Paused));
        assert_eq!(t.command, SchedulerCommand::CancelScheduler);

        let t = timer.advance();
        assert_eq!((t.from, t.to), (Stage::Paused, Stage::RunningWithBonus));
        assert_eq!(t.command, SchedulerCommand::StartScheduler);
        assert_eq!(timer.seconds_remaining(), 315);

        let t = timer.advance();
        assert_eq!((t.from, t.to), (Stage::RunningWithBonus, Stage::Locked));
        assert_eq!(t.command, SchedulerCommand::CancelScheduler);
        assert_eq!(timer.seconds_remaining(), 315);
    }

    #[test]
    fn locked_is_a_fixed_point() {
        let mut timer = StepTimer::with_state(Stage::Locked, 42);
        for _ in 0..3 {
            let t = timer.advance();
            assert_eq!((t.from, t.to), (Stage::Locked, Stage::Locked));
            assert_eq!(t.command, SchedulerCommand::Nothing);
        }
        assert_eq!(timer.seconds_remaining(), 42);
    }

    #[test]
    fn scheduler_commands_match_running_stages() {
        let mut timer = StepTimer::new();
        let mut scheduler_active = false;
        for _ in 0..6 {
            match timer.advance().command {
                SchedulerCommand::StartScheduler => scheduler_active = true,
                SchedulerCommand::CancelScheduler => scheduler_active = false,
                SchedulerCommand::Nothing => {}
            }
            assert_eq!(scheduler_active, timer.stage().is_running());
        }
    }

    #[test]
    fn tick_at_one_wraps_to_reset_seconds() {
        let mut timer = StepTimer::with_state(Stage::Running, 1);
        assert_eq!(timer.tick(), TickOutcome::Wrapped);
        assert_eq!(timer.seconds_remaining(), RESET_SECONDS);
    }

    #[test]
    fn tick_at_zero_never_goes_negative() {
        let mut timer = StepTimer::with_state(Stage::Running, 0);
        assert_eq!(timer.tick(), TickOutcome::Wrapped);
        assert_eq!(timer.seconds_remaining(), RESET_SECONDS);
    }

    #[test]
    fn n_ticks_of_an_n_second_timer_wrap() {
        for n in 1..=30 {
            let mut timer = StepTimer::with_state(Stage::Running, n);
            for _ in 0..n {
                timer.tick();
            }
            assert_eq!(timer.seconds_remaining(), RESET_SECONDS, "n = {n}");
        }
    }

    #[test]
    fn reset_is_idempotent_from_every_stage() {
        for stage in [
            Stage::AwaitingStart,
            Stage::Running,
            Stage::Paused,
            Stage::RunningWithBonus,
            Stage::Locked,
        ] {
            let mut timer = StepTimer::with_state(stage, 7);
            assert_eq!(timer.reset(), stage.is_running());
            assert_eq!(timer, StepTimer::new());
            assert!(!timer.reset());
            assert_eq!(timer, StepTimer::new());
        }
    }

    #[test]
    fn warning_boundary() {
        assert!(!StepTimer::with_state(Stage::Running, 11).is_warning());
        assert!(StepTimer::with_state(Stage::Running, 10).is_warning());
        assert!(StepTimer::with_state(Stage::Running, 1).is_warning());
    }

    #[test]
    fn cue_rate_slows_only_on_final_second() {
        assert_eq!(StepTimer::with_state(Stage::Running, 11).cue_rate(), None);
        assert_eq!(StepTimer::with_state(Stage::Running, 10).cue_rate(), Some(NORMAL_CUE_RATE));
        assert_eq!(StepTimer::with_state(Stage::Running, 2).cue_rate(), Some(NORMAL_CUE_RATE));
        assert_eq!(StepTimer::with_state(Stage::Running, 1).cue_rate(), Some(SLOW_CUE_RATE));
        assert!(StepTimer::with_state(Stage::Running, 1).is_final_second());
    }

    #[test]
    fn helper_text_per_stage() {
        assert_eq!(
            Stage::AwaitingStart.helper_text(),
            "Click anywhere to start timer. (Once first set spawns)"
        );
        assert_eq!(
            Stage::Running.helper_text(),
            "Click anywhere to pause timer. (Once Zuk is under 600 HP)"
        );
        assert_eq!(
            Stage::Paused.helper_text(),
            "Click anywhere to start Jad. (Once Zuk is under 480 HP)"
        );
        assert_eq!(Stage::RunningWithBonus.helper_text(), "Good luck!");
        assert_eq!(Stage::Locked.helper_text(), "Good luck!");
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::RunningWithBonus).unwrap();
        assert_eq!(json, "\"running_with_bonus\"");
    }
}
