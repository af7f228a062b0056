//! # Zuk Timer Core Library
//!
//! Core logic for an encounter timer for the Zuk fight: a countdown that
//! loops every set spawn, pauses while Zuk is pushed below 600 HP, and resumes
//! with the Jad bonus once he drops below 480 HP.
//!
//! ## Architecture
//!
//! - **Step Timer**: A pure five-stage state machine over a looping countdown
//! - **Scheduler**: A drift-corrected one-second ticker on the tokio runtime
//! - **Session**: Wiring that starts and cancels the scheduler per stage
//! - **Storage**: Three persisted preference flags behind a key/value store
//!
//! ## Key Components
//!
//! - [`StepTimer`]: Stage progression and countdown
//! - [`DriftCorrectedScheduler`]: Grid-aligned periodic firing
//! - [`TimerSession`]: Live timer driven by clicks and ticks
//! - [`Preferences`]: Hint, recolour and theme settings
//! - [`Frame`]: What a front-end draws for the current state

pub mod audio;
pub mod display;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use audio::{AudioCue, SilentCue};
pub use display::{format_clock, Frame};
pub use error::{CoreError, PreferenceError, StorageError};
pub use events::Event;
pub use storage::{FileStore, MemoryStore, PreferenceStore, Preferences, ThemeMode};
pub use timer::{DriftCorrectedScheduler, Stage, StepTimer, TimerSession};
