//! Engine state owned by the round lifecycle controller
//!
//! `Phase`, the current `Round` and the `Score` are only mutated through
//! `tick::dispatch`; everything else reads them via the accessors here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::{Insets, PlayAreaBounds};
use super::round::{Alphabet, Round, Sizing};
use super::score::{Score, SessionStats};
use super::timer::TimerQueue;
use crate::consts::*;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No round on screen; waiting for a start
    #[default]
    Idle,
    /// Targets shown, accepting exactly one click
    Active,
    /// Clicked target shows correct/incorrect
    ResolvingFeedback,
    /// Round cleared, next one pending after the settle delay
    Transitioning,
}

impl Phase {
    pub fn accepts_clicks(&self) -> bool {
        *self == Phase::Active
    }

    /// A transition sequence is in flight
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Phase::ResolvingFeedback | Phase::Transitioning)
    }
}

/// Everything the engine needs to build and pace rounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub alphabet: Alphabet,
    pub count_per_round: usize,
    pub sizing: Sizing,
    /// Margins reserved for UI, applied to every viewport size
    pub insets: Insets,
    pub feedback_ms: u32,
    pub settle_ms: u32,
    pub announce_delay_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            count_per_round: DEFAULT_COUNT_PER_ROUND,
            sizing: Sizing::default(),
            insets: Insets::default(),
            feedback_ms: FEEDBACK_DURATION_MS,
            settle_ms: SETTLE_DELAY_MS,
            announce_delay_ms: ANNOUNCE_DELAY_MS,
        }
    }
}

/// Complete engine state (deterministic for a given seed and event sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(super) rng: Pcg32,
    pub(super) config: EngineConfig,
    pub(super) phase: Phase,
    pub(super) round: Option<Round>,
    pub(super) score: Score,
    pub(super) stats: SessionStats,
    /// Bounds used for the next generated round
    pub(super) bounds: Option<PlayAreaBounds>,
    pub(super) timers: TimerQueue,
    /// Rounds generated since the last new game
    pub(super) rounds_generated: u32,
    /// A start failed on bad bounds; retry on the next usable resize
    pub(super) start_pending: bool,
}

impl GameState {
    /// Create an idle engine with the given seed
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: Phase::Idle,
            round: None,
            score: Score::new(),
            stats: SessionStats::default(),
            bounds: None,
            timers: TimerQueue::new(),
            rounds_generated: 0,
            start_pending: false,
        }
    }

    /// Create an idle engine with a known viewport size
    pub fn with_viewport(config: EngineConfig, seed: u64, width: f32, height: f32) -> Self {
        let mut state = Self::new(config, seed);
        state.bounds = Some(state.bounds_for(width, height));
        state
    }

    pub(super) fn bounds_for(&self, width: f32, height: f32) -> PlayAreaBounds {
        PlayAreaBounds::new(width, height).with_insets(self.config.insets)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn bounds(&self) -> Option<&PlayAreaBounds> {
        self.bounds.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Engine clock (ms since creation)
    pub fn now_ms(&self) -> f64 {
        self.timers.now_ms()
    }

    pub fn rounds_generated(&self) -> u32 {
        self.rounds_generated
    }

    pub fn is_waiting_for_bounds(&self) -> bool {
        self.start_pending
    }
}
