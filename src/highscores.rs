//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 named scores. The round engine
//! never touches this; the host submits once a game ends.

use serde::{Deserialize, Serialize};

use crate::error::ScoreStoreError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest player name kept (characters)
pub const MAX_NAME_LEN: usize = 20;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Backend that keeps player scores
pub trait ScoresStore {
    /// Record a score. `Ok(None)` means it was accepted but did not place.
    fn submit(&mut self, name: &str, score: u64) -> Result<Option<usize>, ScoreStoreError>;

    /// Best scores first, at most `limit` of them
    fn fetch_top(&self, limit: usize) -> Result<Vec<HighScoreEntry>, ScoreStoreError>;
}

/// Trim and shorten a player name, rejecting empty ones
pub fn normalize_name(name: &str) -> Result<String, ScoreStoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ScoreStoreError::InvalidName);
    }
    Ok(trimmed.chars().take(MAX_NAME_LEN).collect())
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "letter_hunt_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Index a score would be inserted at, or `None` if it does not place.
    ///
    /// Zero never places. Ties go below existing entries.
    fn slot_for(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let slot = self.entries.partition_point(|e| e.score >= score);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    /// Rank a score would reach (1 = best)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        self.slot_for(score).map(|slot| slot + 1)
    }

    /// Insert an entry if it places, dropping whatever falls off the end.
    /// Returns the rank reached.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let slot = self.slot_for(entry.score)?;
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Read the board from LocalStorage. An unreadable board is a
    /// `FetchFailed`; a missing one is just empty.
    #[cfg(target_arch = "wasm32")]
    pub fn try_load() -> Result<Self, ScoreStoreError> {
        let storage = Self::storage()
            .ok_or_else(|| ScoreStoreError::FetchFailed("storage unavailable".into()))?;
        let json = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| ScoreStoreError::FetchFailed("storage is blocked".into()))?;
        let Some(json) = json else {
            return Ok(Self::new());
        };
        let mut board: Self = serde_json::from_str(&json)
            .map_err(|e| ScoreStoreError::FetchFailed(e.to_string()))?;
        // Saved boards come from outside; re-establish ordering and cap
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        board.entries.truncate(MAX_HIGH_SCORES);
        Ok(board)
    }

    /// Board from LocalStorage, empty if it cannot be read
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(board) => {
                log::info!("Loaded {} high scores", board.entries.len());
                board
            }
            Err(e) => {
                log::warn!("{e}; starting with an empty leaderboard");
                Self::new()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), ScoreStoreError> {
        let storage = Self::storage()
            .ok_or_else(|| ScoreStoreError::SubmissionFailed("storage unavailable".into()))?;
        let json = serde_json::to_string(self)
            .map_err(|e| ScoreStoreError::SubmissionFailed(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| ScoreStoreError::SubmissionFailed("storage is full or blocked".into()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native builds keep the board in memory only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ScoreStoreError> {
        Ok(())
    }
}

impl ScoresStore for HighScores {
    fn submit(&mut self, name: &str, score: u64) -> Result<Option<usize>, ScoreStoreError> {
        let name = normalize_name(name)?;
        let Some(rank) = self.potential_rank(score) else {
            log::info!("Score {score} for {name} did not place");
            return Ok(None);
        };

        // Persist a copy first so a failed write leaves the board unchanged
        let mut updated = self.clone();
        updated.insert(HighScoreEntry {
            name,
            score,
            timestamp: now_ms(),
        });
        updated.save()?;
        *self = updated;
        Ok(Some(rank))
    }

    fn fetch_top(&self, limit: usize) -> Result<Vec<HighScoreEntry>, ScoreStoreError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
