//! Engine configuration.
//!
//! [`EngineConfig`] carries the frame timing, view size, tile size and key
//! bindings. Every field has a default, so a JSON file only needs to name the
//! values it changes:
//!
//! ```
//! use tilewalk_engine::config::EngineConfig;
//! use tilewalk_engine::input::KeyCode;
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{ "headless": true, "bindings": { "interact": "E" } }"#,
//! ).unwrap();
//! assert!(config.headless);
//! assert_eq!(config.bindings.interact, KeyCode::E);
//! assert_eq!(config.bindings.up, KeyCode::W);
//! assert_eq!(config.tile_size, 32);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::KeyCode;
use crate::EngineError;

// ---------------------------------------------------------------------------
// KeyBindings
// ---------------------------------------------------------------------------

/// Which key drives each engine action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub interact: KeyCode,
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: KeyCode::W,
            down: KeyCode::S,
            left: KeyCode::A,
            right: KeyCode::D,
            interact: KeyCode::Space,
            quit: KeyCode::Escape,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Frame loop, view and input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds of simulation per frame. Must be positive and finite.
    pub fixed_dt: f32,
    /// Wall-clock pause between frames.
    pub frame_interval_ms: u64,
    /// Headless mode: no pacing, frames run back to back.
    pub headless: bool,
    pub view_width: f32,
    pub view_height: f32,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    pub bindings: KeyBindings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 0.016,
            frame_interval_ms: 16,
            headless: false,
            view_width: 800.0,
            view_height: 600.0,
            tile_size: 32,
            bindings: KeyBindings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] if the JSON is malformed, or
    /// [`EngineError::InvalidConfig`] if a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the frame loop and renderer.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "fixed_dt must be positive and finite, got {}",
                self.fixed_dt
            )));
        }
        if self.tile_size == 0 {
            return Err(EngineError::InvalidConfig(
                "tile_size must be non-zero".to_owned(),
            ));
        }
        for (name, value) in [("view_width", self.view_width), ("view_height", self.view_height)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// [`frame_interval_ms`](Self::frame_interval_ms) as a [`Duration`].
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_game() {
        let config = EngineConfig::default();
        assert_eq!(config.fixed_dt, 0.016);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
        assert_eq!((config.view_width, config.view_height), (800.0, 600.0));
        assert_eq!(config.bindings.quit, KeyCode::Escape);
        config.validate().unwrap();
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = EngineConfig::from_json_str("{ fixed_dt: ").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for json in [
            r#"{"fixed_dt": 0.0}"#,
            r#"{"fixed_dt": -1.0}"#,
            r#"{"tile_size": 0}"#,
            r#"{"view_width": 0.0}"#,
        ] {
            let err = EngineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfig(_)), "{json}");
        }
    }

    #[test]
    fn unknown_key_name_fails_to_parse() {
        let err = EngineConfig::from_json_str(r#"{"bindings": {"up": "F13"}}"#).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
