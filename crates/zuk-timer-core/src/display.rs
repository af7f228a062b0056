//! Presentation model.
//!
//! Everything a front-end needs to draw one frame of the widget, derived from
//! timer state and preferences without touching any UI toolkit.

use serde::Serialize;

use crate::storage::Preferences;
use crate::timer::{Stage, StepTimer};

/// Background tint while the first countdown runs.
pub const RUNNING_COLOR: &str = "#C0D68466";
/// Background tint once the Jad bonus has been added.
pub const BONUS_COLOR: &str = "#A225224D";

/// Format seconds as `M:SS`.
///
/// Only the last digit of the minutes is shown, matching the fixed-width
/// clock the widget has always drawn; encounter values stay below ten minutes.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", (seconds / 60) % 10, seconds % 60)
}

/// Background tint for a stage, if recolouring is enabled.
pub fn background_color(stage: Stage, recolor_on_stage: bool) -> Option<&'static str> {
    if !recolor_on_stage {
        return None;
    }
    match stage {
        Stage::Running => Some(RUNNING_COLOR),
        Stage::RunningWithBonus | Stage::Locked => Some(BONUS_COLOR),
        Stage::AwaitingStart | Stage::Paused => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub time_text: String,
    /// `None` when hints are hidden.
    pub helper_text: Option<&'static str>,
    pub background: Option<&'static str>,
    /// Countdown is inside the warning window.
    pub warning: bool,
    /// No scheduler is running, so the countdown is drawn faded.
    pub dimmed: bool,
    /// Clicking still advances to a meaningful stage.
    pub clickable: bool,
    pub dark: bool,
}

impl Frame {
    pub fn build(
        timer: &StepTimer,
        ticking: bool,
        prefs: &Preferences,
        device_prefers_dark: bool,
    ) -> Self {
        let stage = timer.stage();
        Self {
            time_text: format_clock(timer.seconds_remaining()),
            helper_text: prefs.show_hints.then(|| stage.helper_text()),
            background: background_color(stage, prefs.recolor_on_stage),
            warning: timer.is_warning(),
            dimmed: !ticking,
            clickable: stage < Stage::RunningWithBonus,
            dark: prefs.theme_mode.resolve_dark(device_prefers_dark),
        }
    }
}
