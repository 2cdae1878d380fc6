//! Error kinds surfaced by the round engine and the scores store

use thiserror::Error;

/// Failures that prevent a round from being generated
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RoundError {
    /// The play area has no usable width or height once insets are removed
    #[error("play area has no usable space ({width}x{height} after insets)")]
    InvalidBounds { width: f32, height: f32 },
    /// No letters to draw from (empty alphabet or zero letters per round)
    #[error("no letters available for a round")]
    EmptyAlphabet,
}

/// Failures reported by a leaderboard backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreStoreError {
    /// Player name is empty after trimming
    #[error("player name must not be empty")]
    InvalidName,
    /// The score could not be stored; the caller keeps it and may retry
    #[error("score submission failed: {0}")]
    SubmissionFailed(String),
    /// The leaderboard could not be read
    #[error("could not load leaderboard: {0}")]
    FetchFailed(String),
}

impl ScoreStoreError {
    /// Whether resubmitting the same entry can succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SubmissionFailed(_) | Self::FetchFailed(_))
    }
}
