//! Terminal rendering of a [`Frame`] and the bell-based warning cue.

use std::io::Write;

use tracing::trace;
use zuk_timer_core::display::{BONUS_COLOR, RUNNING_COLOR};
use zuk_timer_core::{AudioCue, Frame};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const FAINT: &str = "\x1b[2m";

fn background_code(color: &str) -> Option<&'static str> {
    match color {
        RUNNING_COLOR => Some("\x1b[42m"),
        BONUS_COLOR => Some("\x1b[41m"),
        _ => None,
    }
}

/// One status line for `frame`, styled with ANSI escapes.
pub fn frame_line(frame: &Frame) -> String {
    let mut style = String::from(if frame.dark { "\x1b[97m" } else { "\x1b[30m" });
    if let Some(code) = frame.background.and_then(background_code) {
        style.push_str(code);
    }
    if frame.warning {
        style.push_str(BOLD);
    }
    if frame.dimmed {
        style.push_str(FAINT);
    }

    let mut line = format!("{style} {} {RESET}", frame.time_text);
    if let Some(hint) = frame.helper_text {
        line.push_str("  ");
        line.push_str(hint);
    }
    if frame.clickable {
        line.push_str("  [enter]");
    }
    line
}

/// Redraw the status line in place.
pub fn draw(frame: &Frame) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "\r\x1b[2K{}", frame_line(frame))?;
    out.flush()
}

/// Rings the terminal bell for the warning cue; the final second rings twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&self, rate: f32) {
        trace!(rate, "warning cue");
        let bell = if rate < 1.0 { "\x07\x07" } else { "\x07" };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(bell.as_bytes());
        let _ = err.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zuk_timer_core::{Preferences, Stage, StepTimer};

    #[test]
    fn running_frame_is_green_with_hint() {
        let frame = Frame::build(
            &StepTimer::with_state(Stage::Running, 125),
            true,
            &Preferences::default(),
            true,
        );
        let line = frame_line(&frame);
        assert!(line.contains("\x1b[42m"));
        assert!(line.contains(" 2:05 "));
        assert!(line.contains(Stage::Running.helper_text()));
        assert!(!line.contains(FAINT));
    }

    #[test]
    fn paused_warning_frame_is_bold_and_faint() {
        let frame = Frame::build(
            &StepTimer::with_state(Stage::Paused, 4),
            false,
            &Preferences::default(),
            false,
        );
        let line = frame_line(&frame);
        assert!(line.starts_with("\x1b[30m"));
        assert!(line.contains(BOLD));
        assert!(line.contains(FAINT));
    }

    #[test]
    fn locked_frame_is_not_clickable() {
        let prefs = Preferences {
            show_hints: false,
            ..Preferences::default()
        };
        let frame = Frame::build(&StepTimer::with_state(Stage::Locked, 60), false, &prefs, true);
        let line = frame_line(&frame);
        assert!(line.contains("\x1b[41m"));
        assert!(!line.contains("[enter]"));
        assert!(!line.contains("Good luck!"));
    }
}
