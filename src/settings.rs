//! Game settings and preferences
//!
//! Persisted in LocalStorage, separately from the leaderboard.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Alphabet, EngineConfig, Insets, Sizing};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round layout ===
    pub count_per_round: usize,
    pub target_size: f32,
    /// Raised to `target_size` if set lower
    pub min_separation: f32,
    /// Space reserved for the HUD bar and buttons
    pub insets: Insets,

    // === Pacing (ms) ===
    pub feedback_ms: u32,
    pub settle_ms: u32,
    pub announce_delay_ms: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Speech rate (0.5 - 2.0, 1.0 = normal)
    pub speech_rate: f32,
    /// Correct/incorrect tones
    pub feedback_sounds: bool,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            count_per_round: DEFAULT_COUNT_PER_ROUND,
            target_size: DEFAULT_TARGET_SIZE,
            min_separation: DEFAULT_MIN_SEPARATION,
            insets: Insets {
                top: 56.0,
                right: 8.0,
                bottom: 64.0,
                left: 8.0,
            },

            feedback_ms: FEEDBACK_DURATION_MS,
            settle_ms: SETTLE_DELAY_MS,
            announce_delay_ms: ANNOUNCE_DELAY_MS,

            master_volume: 0.8,
            speech_rate: 0.9,
            feedback_sounds: true,
            muted: false,
        }
    }
}

impl Settings {
    /// Volume actually used for speech and tones
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Engine configuration for these settings
    pub fn engine_config(&self) -> EngineConfig {
        let target_size = if self.target_size.is_finite() && self.target_size > 0.0 {
            self.target_size
        } else {
            DEFAULT_TARGET_SIZE
        };
        let min_separation = if self.min_separation.is_finite() {
            self.min_separation.max(target_size)
        } else {
            target_size
        };

        EngineConfig {
            alphabet: Alphabet::latin_uppercase(),
            count_per_round: self.count_per_round,
            sizing: Sizing {
                target_size,
                min_separation,
            },
            insets: self.insets,
            feedback_ms: self.feedback_ms,
            settle_ms: self.settle_ms,
            announce_delay_ms: self.announce_delay_ms,
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "letter_hunt_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_config() {
        let config = Settings::default().engine_config();
        assert_eq!(config.alphabet.len(), 26);
        assert_eq!(config.count_per_round, DEFAULT_COUNT_PER_ROUND);
        assert_eq!(config.feedback_ms, FEEDBACK_DURATION_MS);
    }

    #[test]
    fn test_separation_never_below_size() {
        let settings = Settings {
            target_size: 60.0,
            min_separation: 10.0,
            ..Default::default()
        };
        let sizing = settings.engine_config().sizing;
        assert_eq!(sizing.min_separation, 60.0);
    }

    #[test]
    fn test_bad_size_falls_back() {
        let settings = Settings {
            target_size: f32::NAN,
            ..Default::default()
        };
        assert_eq!(settings.engine_config().sizing.target_size, DEFAULT_TARGET_SIZE);
    }

    #[test]
    fn test_muted_volume() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.count_per_round, DEFAULT_COUNT_PER_ROUND);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        // Older saves may carry fields that no longer exist
        let json = r#"{"difficulty": "Hard", "target_size": 48.0}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.target_size, 48.0);
        assert_eq!(settings.count_per_round, DEFAULT_COUNT_PER_ROUND);
    }
}
