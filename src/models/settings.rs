//! Engine settings, loaded from a TOML file.

use super::engine::{
    DEFAULT_HIT_WINDOW_SECONDS, DEFAULT_LOOKAHEAD_SECONDS, DEFAULT_PERFECT_SECONDS, HitWindow,
    LANE_COUNT,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Seconds a note is shown before its hit time.
    pub lookahead_seconds: f64,
    /// Tolerance around a note's time for judging and auto-miss.
    pub hit_window_seconds: f64,
    /// Deltas below this are Perfect, the rest of the window is Great.
    pub perfect_seconds: f64,
    /// Logic loop rate.
    pub ticks_per_second: u64,
    /// Session counts as finished this long after the last note ends.
    pub finish_grace_seconds: f64,
    /// Key name to grid cell.
    pub keymap: BTreeMap<String, u8>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            lookahead_seconds: DEFAULT_LOOKAHEAD_SECONDS,
            hit_window_seconds: DEFAULT_HIT_WINDOW_SECONDS,
            perfect_seconds: DEFAULT_PERFECT_SECONDS,
            ticks_per_second: 200,
            finish_grace_seconds: 2.0,
            keymap: default_keymap(),
        }
    }
}

/// Row-major 4x4 grid: QWER / ASDF / ZXCV / 1234.
fn default_keymap() -> BTreeMap<String, u8> {
    [
        "KeyQ", "KeyW", "KeyE", "KeyR", "KeyA", "KeyS", "KeyD", "KeyF", "KeyZ", "KeyX", "KeyC",
        "KeyV", "Digit1", "Digit2", "Digit3", "Digit4",
    ]
    .iter()
    .enumerate()
    .map(|(lane, key)| (key.to_string(), lane as u8))
    .collect()
}

impl EngineSettings {
    /// Loads settings from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("CONFIG: {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).inspect_err(|e| {
            log::error!("CONFIG: Failed to load {:?}: {}", path, e);
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("lookahead_seconds", self.lookahead_seconds),
            ("hit_window_seconds", self.hit_window_seconds),
            ("perfect_seconds", self.perfect_seconds),
        ];
        for (name, value) in windows {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !self.finish_grace_seconds.is_finite() || self.finish_grace_seconds < 0.0 {
            return Err(ConfigError::Invalid(
                "finish_grace_seconds must not be negative".to_string(),
            ));
        }
        if self.perfect_seconds > self.hit_window_seconds {
            return Err(ConfigError::Invalid(
                "perfect_seconds must not exceed hit_window_seconds".to_string(),
            ));
        }
        // Notes must be active before their window opens.
        if self.lookahead_seconds < self.hit_window_seconds {
            return Err(ConfigError::Invalid(
                "lookahead_seconds must be at least hit_window_seconds".to_string(),
            ));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "ticks_per_second must be greater than zero".to_string(),
            ));
        }
        if let Some((key, lane)) = self.keymap.iter().find(|(_, lane)| **lane as usize >= LANE_COUNT) {
            return Err(ConfigError::Invalid(format!(
                "key {key} is bound to lane {lane}, lanes go up to {}",
                LANE_COUNT - 1
            )));
        }
        Ok(())
    }

    pub fn hit_window(&self) -> HitWindow {
        HitWindow::from_custom(self.perfect_seconds, self.hit_window_seconds)
    }
}
