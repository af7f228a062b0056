//! Warning-cue seam.
//!
//! The session calls [`AudioCue::play`] whenever the countdown is inside the
//! warning window; the rate comes from [`StepTimer::cue_rate`](crate::timer::StepTimer::cue_rate).

/// Plays the cautionary cue at the given playback rate.
pub trait AudioCue: Send + Sync {
    fn play(&self, rate: f32);
}

/// Cue that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self, _rate: f32) {}
}
