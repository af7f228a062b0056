mod preferences;
mod store;

pub use preferences::{Preferences, ThemeMode, CHANGE_COLORS_KEY, PALETTE_TYPE_KEY, SHOW_HINTS_KEY};
pub use store::{FileStore, MemoryStore, PreferenceStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the preference directory.
///
/// `ZUK_TIMER_CONFIG_DIR` wins when set. Otherwise `~/.config/zuk-timer[-dev]/`
/// based on ZUK_TIMER_ENV (set ZUK_TIMER_ENV=dev for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("ZUK_TIMER_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ZUK_TIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("zuk-timer-dev")
            } else {
                base_dir.join("zuk-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
