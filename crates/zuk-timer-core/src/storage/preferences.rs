//! Persisted user preferences.
//!
//! Three independent flags, each stored as JSON text under its own key:
//! - `SHOW_HINTS_KEY`: show the stage helper text (default `true`)
//! - `CHANGE_COLORS_KEY`: tint the background per stage (default `true`)
//! - `PALETTE_TYPE_KEY`: `"darkMode"`, `"lightMode"` or `"deviceMode"` (default)
//!
//! Absent or malformed values fall back to the defaults and are never reported
//! as errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::store::PreferenceStore;
use crate::error::{PreferenceError, Result};

pub const SHOW_HINTS_KEY: &str = "SHOW_HINTS_KEY";
pub const CHANGE_COLORS_KEY: &str = "CHANGE_COLORS_KEY";
pub const PALETTE_TYPE_KEY: &str = "PALETTE_TYPE_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[serde(rename = "darkMode")]
    Dark,
    #[serde(rename = "lightMode")]
    Light,
    #[default]
    #[serde(rename = "deviceMode")]
    FollowDevice,
}

impl ThemeMode {
    /// Whether the dark palette applies given the device preference.
    pub fn resolve_dark(self, device_prefers_dark: bool) -> bool {
        match self {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::FollowDevice => device_prefers_dark,
        }
    }

    /// Parse the short names used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "darkmode" => Some(ThemeMode::Dark),
            "light" | "lightmode" => Some(ThemeMode::Light),
            "device" | "devicemode" | "follow" => Some(ThemeMode::FollowDevice),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
            ThemeMode::FollowDevice => "device",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub show_hints: bool,
    pub recolor_on_stage: bool,
    pub theme_mode: ThemeMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_hints: true,
            recolor_on_stage: true,
            theme_mode: ThemeMode::FollowDevice,
        }
    }
}

impl Preferences {
    /// User-facing names accepted by [`get`](Self::get) and [`set`](Self::set).
    pub const NAMES: [&'static str; 3] = ["show_hints", "recolor_on_stage", "theme_mode"];

    /// Read all flags from `store`, substituting defaults for anything missing
    /// or malformed.
    pub fn load(store: &impl PreferenceStore) -> Self {
        let defaults = Self::default();
        Self {
            show_hints: load_flag(store, SHOW_HINTS_KEY, defaults.show_hints),
            recolor_on_stage: load_flag(store, CHANGE_COLORS_KEY, defaults.recolor_on_stage),
            theme_mode: load_theme(store).unwrap_or(defaults.theme_mode),
        }
    }

    /// Write every flag to `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist a value.
    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<()> {
        store.set(SHOW_HINTS_KEY, &encode(&self.show_hints)?)?;
        store.set(CHANGE_COLORS_KEY, &encode(&self.recolor_on_stage)?)?;
        store.set(PALETTE_TYPE_KEY, &encode(&self.theme_mode)?)?;
        Ok(())
    }

    pub fn set_show_hints(&mut self, store: &mut impl PreferenceStore, value: bool) -> Result<()> {
        store.set(SHOW_HINTS_KEY, &encode(&value)?)?;
        self.show_hints = value;
        Ok(())
    }

    pub fn set_recolor_on_stage(
        &mut self,
        store: &mut impl PreferenceStore,
        value: bool,
    ) -> Result<()> {
        store.set(CHANGE_COLORS_KEY, &encode(&value)?)?;
        self.recolor_on_stage = value;
        Ok(())
    }

    pub fn set_theme_mode(&mut self, store: &mut impl PreferenceStore, value: ThemeMode) -> Result<()> {
        store.set(PALETTE_TYPE_KEY, &encode(&value)?)?;
        self.theme_mode = value;
        Ok(())
    }

    /// Get a preference as display text by user-facing name.
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "show_hints" => Some(self.show_hints.to_string()),
            "recolor_on_stage" => Some(self.recolor_on_stage.to_string()),
            "theme_mode" => Some(self.theme_mode.name().to_string()),
            _ => None,
        }
    }

    /// Set a preference by user-facing name and write it through.
    ///
    /// # Errors
    /// Returns an error if the name is unknown, the value cannot be parsed,
    /// or the store cannot persist it.
    pub fn set(&mut self, store: &mut impl PreferenceStore, name: &str, value: &str) -> Result<()> {
        match name {
            "show_hints" => self.set_show_hints(store, parse_bool(name, value)?),
            "recolor_on_stage" => self.set_recolor_on_stage(store, parse_bool(name, value)?),
            "theme_mode" => {
                let mode = ThemeMode::from_name(value).ok_or_else(|| PreferenceError::InvalidValue {
                    key: name.to_string(),
                    message: format!("expected dark, light or device, got '{value}'"),
                })?;
                self.set_theme_mode(store, mode)
            }
            _ => Err(PreferenceError::UnknownKey(name.to_string()).into()),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    value
        .trim()
        .parse::<bool>()
        .map_err(|e| {
            PreferenceError::InvalidValue {
                key: name.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

fn load_flag(store: &impl PreferenceStore, key: &str, default: bool) -> bool {
    let Some(raw) = store.get(key) else {
        return default;
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => truthy(&value),
        Err(e) => {
            debug!(key, error = %e, "malformed preference, using default");
            default
        }
    }
}

fn load_theme(store: &impl PreferenceStore) -> Option<ThemeMode> {
    let raw = store.get(PALETTE_TYPE_KEY)?;
    match serde_json::from_str::<ThemeMode>(&raw) {
        Ok(mode) => Some(mode),
        Err(e) => {
            debug!(key = PALETTE_TYPE_KEY, error = %e, "malformed preference, using default");
            None
        }
    }
}

/// JavaScript-style truthiness of a decoded JSON value.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
