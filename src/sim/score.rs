//! Score accumulator and per-session statistics

use serde::{Deserialize, Serialize};

/// Points for correct hits. Only goes up, except on `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Score(u64);

impl Score {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Back to zero; new-game boundary only
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Running tallies for the HUD and game-over screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub rounds_played: u32,
    pub hits: u32,
    pub misses: u32,
    /// Rounds discarded by a manual new-round request
    pub skipped: u32,
    pub streak: u32,
    pub best_streak: u32,
}

impl SessionStats {
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.streak = 0;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
        self.streak = 0;
    }

    /// Fraction of answered rounds that were hits (0 when none answered)
    pub fn accuracy(&self) -> f32 {
        let answered = self.hits + self.misses;
        if answered == 0 {
            0.0
        } else {
            self.hits as f32 / answered as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_reset() {
        let mut score = Score::new();
        score.increment();
        score.increment();
        assert_eq!(score.value(), 2);
        score.reset();
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn test_increment_never_overflows() {
        let mut score = Score(u64::MAX);
        score.increment();
        assert_eq!(score.value(), u64::MAX);
    }

    #[test]
    fn test_streaks() {
        let mut stats = SessionStats::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_hit();
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.best_streak, 2);
        assert!((stats.accuracy() - 0.75).abs() < f32::EPSILON);

        stats.record_skip();
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_accuracy_without_answers() {
        assert_eq!(SessionStats::default().accuracy(), 0.0);
    }
}
