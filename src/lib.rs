//! Letter Hunt - hear a letter, find it among the clutter
//!
//! Core modules:
//! - `sim`: Deterministic round engine (placement, round generation, lifecycle)
//! - `audio`: Letter announcer and feedback sounds
//! - `highscores`: Leaderboard store
//! - `settings`: Player preferences and engine configuration

pub mod audio;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{RoundError, ScoreStoreError};
pub use highscores::{HighScores, ScoresStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Placement: random candidates tried before falling back to the grid
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Default letters shown per round
    pub const DEFAULT_COUNT_PER_ROUND: usize = 8;
    /// Default target diameter (CSS pixels)
    pub const DEFAULT_TARGET_SIZE: f32 = 64.0;
    /// Default minimum center-to-center distance between targets
    pub const DEFAULT_MIN_SEPARATION: f32 = 80.0;

    /// How long the clicked target shows correct/incorrect (ms)
    pub const FEEDBACK_DURATION_MS: u32 = 900;
    /// Pause between clearing a round and generating the next (ms)
    pub const SETTLE_DELAY_MS: u32 = 250;
    /// Delay between committing targets and announcing the letter (ms)
    pub const ANNOUNCE_DELAY_MS: u32 = 120;

    /// Largest frame delta accepted by the timer driver (ms)
    pub const MAX_ADVANCE_MS: f64 = 1000.0;
}
