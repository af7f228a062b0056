use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Stage, StepTimer};

/// Every state change of a timer session produces an Event.
/// The front-end renders from them; `--json` prints them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StageChanged {
        from: Stage,
        to: Stage,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    Tick {
        seconds_remaining: u32,
        /// The countdown hit zero and restarted.
        wrapped: bool,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        stage: Stage,
        seconds_remaining: u32,
        helper_text: String,
        warning: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Build a full state snapshot of `timer`.
    pub fn snapshot(timer: &StepTimer) -> Self {
        Event::StateSnapshot {
            stage: timer.stage(),
            seconds_remaining: timer.seconds_remaining(),
            helper_text: timer.helper_text().to_string(),
            warning: timer.is_warning(),
            at: Utc::now(),
        }
    }
}
