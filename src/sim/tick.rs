//! Event dispatch and round lifecycle
//!
//! Single-threaded command interface: every external happening (click,
//! resize, frame time, button) becomes an `Event`, and `dispatch` applies it
//! to the state machine
//!
//! ```text
//! Idle -> Active -> ResolvingFeedback -> Transitioning -> Active -> ...
//!           \______ new round request ______/
//! ```
//!
//! Inputs that arrive in the wrong phase are ignored, never errors. That is
//! what keeps a double-click or a resize mid-transition from producing two
//! rounds or two points.

use super::round::{FeedbackState, Symbol, generate};
use super::score::SessionStats;
use super::state::{GameState, Phase};
use super::timer::{ScheduledTimer, TimerKind, TimerToken};
use crate::consts::MAX_ADVANCE_MS;
use crate::error::RoundError;

/// Something that happened outside the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Begin play from `Idle`
    Start,
    /// Player clicked a target of the current round
    Click { target_id: u32 },
    /// Discard the current round without scoring
    NewRound,
    /// Say the current letter again
    Replay,
    /// Viewport size changed
    Resize { width: f32, height: f32 },
    /// Frame time elapsed; fires due timers
    Advance { dt_ms: f64 },
    /// An externally scheduled timer fired
    TimerElapsed(TimerToken),
    /// Reset score and statistics, back to `Idle`
    NewGame,
    /// Stop the session and report the final score
    EndGame,
}

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Hit,
    Miss,
    /// Not accepted; nothing changed
    Rejected,
}

/// Host-side work requested by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// New targets are committed and can be drawn
    RoundStarted { number: u32 },
    /// Speak this letter (fire-and-forget)
    Announce(Symbol),
    /// Stop any in-progress announcement
    CancelAnnouncement,
    /// Show feedback on the clicked target
    Feedback { target_id: u32, state: FeedbackState },
    ScoreChanged(u64),
    /// Targets removed from the play area
    RoundCleared,
    /// Session finished; submit the score if desired
    GameOver { score: u64, stats: SessionStats },
    /// A round could not be generated; the engine is back in `Idle`
    RoundFailed(RoundError),
}

/// Apply one event. Returns the effects the host should carry out, in order.
///
/// A failed round generation is reported as `Effect::RoundFailed` after any
/// effects already produced by the same event, so the host still cancels
/// stale announcements. The state is left in `Idle`; a later `Start` or
/// usable `Resize` recovers.
pub fn dispatch(state: &mut GameState, event: Event) -> Vec<Effect> {
    let mut effects = Vec::new();

    match event {
        Event::Start => {
            if state.phase != Phase::Idle {
                log::trace!("Start ignored in {:?}", state.phase);
            } else {
                start_round(state, &mut effects);
            }
        }
        Event::Click { target_id } => {
            let (_, click_effects) = resolve_click(state, target_id);
            effects = click_effects;
        }
        Event::NewRound => request_new_round(state, &mut effects),
        Event::Replay => replay(state, &mut effects),
        Event::Resize { width, height } => resize(state, width, height, &mut effects),
        Event::Advance { dt_ms } => advance(state, dt_ms, &mut effects),
        Event::TimerElapsed(token) => match state.timers.take(token) {
            Some(timer) => fire(state, timer, &mut effects),
            None => log::trace!("Stale timer {} ignored", token.as_u64()),
        },
        Event::NewGame => new_game(state, &mut effects),
        Event::EndGame => end_game(state, &mut effects),
    }

    effects
}

/// Resolve a click against the current round.
///
/// Accepted only while `Active` with a letter to find; the first accepted
/// click moves the round to `ResolvingFeedback`, so every later click in the
/// same round is rejected.
pub fn resolve_click(state: &mut GameState, target_id: u32) -> (ClickOutcome, Vec<Effect>) {
    let mut effects = Vec::new();

    if !state.phase.accepts_clicks() {
        log::trace!("Click on {target_id} ignored in {:?}", state.phase);
        return (ClickOutcome::Rejected, effects);
    }

    let Some(round) = state.round.as_mut() else {
        return (ClickOutcome::Rejected, effects);
    };
    let Some(target_symbol) = round.target_symbol else {
        return (ClickOutcome::Rejected, effects);
    };
    let Some(target) = round.target_mut(target_id) else {
        log::trace!("Click on unknown target {target_id} ignored");
        return (ClickOutcome::Rejected, effects);
    };

    let outcome = if target.symbol == target_symbol {
        target.feedback = FeedbackState::Correct;
        ClickOutcome::Hit
    } else {
        target.feedback = FeedbackState::Incorrect;
        ClickOutcome::Miss
    };
    let feedback = target.feedback;

    match outcome {
        ClickOutcome::Hit => {
            state.score.increment();
            state.stats.record_hit();
            effects.push(Effect::ScoreChanged(state.score.value()));
        }
        _ => state.stats.record_miss(),
    }
    log::debug!(
        "Round {}: clicked '{}' looking for '{target_symbol}' -> {outcome:?}",
        round.number,
        round.target(target_id).map(|t| t.symbol).unwrap_or('?'),
    );

    // An announcement that has not started yet is no longer useful
    state.timers.cancel_kind(TimerKind::Announce);
    state.phase = Phase::ResolvingFeedback;
    state
        .timers
        .schedule(TimerKind::FeedbackDone, state.config.feedback_ms);
    effects.push(Effect::Feedback {
        target_id,
        state: feedback,
    });

    (outcome, effects)
}

/// Generate the next round and enter `Active`
fn start_round(state: &mut GameState, effects: &mut Vec<Effect>) {
    let number = state.rounds_generated + 1;
    let result = match state.bounds {
        Some(bounds) => generate(
            &state.config.alphabet,
            state.config.count_per_round,
            &bounds,
            &state.config.sizing,
            number,
            &mut state.rng,
        ),
        None => Err(RoundError::InvalidBounds {
            width: 0.0,
            height: 0.0,
        }),
    };

    match result {
        Ok(round) => {
            state.rounds_generated = number;
            state.round = Some(round);
            state.phase = Phase::Active;
            state.start_pending = false;
            state.stats.rounds_played += 1;
            state
                .timers
                .schedule(TimerKind::Announce, state.config.announce_delay_ms);
            log::info!("Round {number} started");
            effects.push(Effect::RoundStarted { number });
        }
        Err(err) => {
            state.round = None;
            state.phase = Phase::Idle;
            // Only a viewport change can fix bounds; a bad alphabet stays bad
            state.start_pending = matches!(err, RoundError::InvalidBounds { .. });
            if state.start_pending {
                log::warn!("Cannot start round: {err}; waiting for a usable viewport");
            } else {
                log::error!("Cannot start round: {err}");
            }
            effects.push(Effect::RoundFailed(err));
        }
    }
}

/// Clear the round and wait out the settle delay
fn begin_transition(state: &mut GameState, effects: &mut Vec<Effect>) {
    if let Some(round) = state.round.as_mut() {
        round.clear();
    }
    state.timers.cancel_kind(TimerKind::Announce);
    state.phase = Phase::Transitioning;
    state
        .timers
        .schedule(TimerKind::SettleDone, state.config.settle_ms);
    log::debug!("Transitioning to round {}", state.rounds_generated + 1);
    effects.push(Effect::CancelAnnouncement);
    effects.push(Effect::RoundCleared);
}

fn request_new_round(state: &mut GameState, effects: &mut Vec<Effect>) {
    if state.phase != Phase::Active {
        log::trace!("New round request ignored in {:?}", state.phase);
        return;
    }
    state.stats.record_skip();
    begin_transition(state, effects);
}

fn replay(state: &mut GameState, effects: &mut Vec<Effect>) {
    if state.phase != Phase::Active {
        return;
    }
    if let Some(symbol) = state.round.as_ref().and_then(|r| r.target_symbol) {
        state.timers.cancel_kind(TimerKind::Announce);
        effects.push(Effect::Announce(symbol));
    }
}

/// Bounds apply to the next generated round; targets on screen stay put
fn resize(state: &mut GameState, width: f32, height: f32, effects: &mut Vec<Effect>) {
    let bounds = state.bounds_for(width, height);
    state.bounds = Some(bounds);
    log::debug!("Viewport resized to {width}x{height}");

    if state.start_pending && state.phase == Phase::Idle && bounds.is_usable() {
        log::info!("Viewport usable again, starting round");
        start_round(state, effects);
    }
}

/// Move the clock forward, firing due timers in order.
///
/// A timer scheduled by a firing timer runs in the same call if it also
/// falls inside the window.
fn advance(state: &mut GameState, dt_ms: f64, effects: &mut Vec<Effect>) {
    let dt = if dt_ms.is_finite() && dt_ms > 0.0 {
        dt_ms.min(MAX_ADVANCE_MS)
    } else {
        0.0
    };
    let until = state.timers.now_ms() + dt;

    while let Some(timer) = state.timers.pop_due(until) {
        fire(state, timer, effects);
    }
    state.timers.set_now(until);
}

fn fire(state: &mut GameState, timer: ScheduledTimer, effects: &mut Vec<Effect>) {
    match (timer.kind, state.phase) {
        (TimerKind::Announce, Phase::Active) => {
            if let Some(symbol) = state.round.as_ref().and_then(|r| r.target_symbol) {
                effects.push(Effect::Announce(symbol));
            }
        }
        (TimerKind::FeedbackDone, Phase::ResolvingFeedback) => {
            begin_transition(state, effects)
        }
        (TimerKind::SettleDone, Phase::Transitioning) => start_round(state, effects),
        (kind, phase) => log::trace!("{kind:?} timer ignored in {phase:?}"),
    }
}

fn new_game(state: &mut GameState, effects: &mut Vec<Effect>) {
    state.timers.cancel_all();
    state.round = None;
    state.phase = Phase::Idle;
    state.score.reset();
    state.stats = SessionStats::default();
    state.rounds_generated = 0;
    state.start_pending = false;
    log::info!("New game");
    effects.push(Effect::CancelAnnouncement);
    effects.push(Effect::RoundCleared);
    effects.push(Effect::ScoreChanged(0));
}

/// Score is kept until the next `NewGame` so a failed submission can be retried
fn end_game(state: &mut GameState, effects: &mut Vec<Effect>) {
    state.timers.cancel_all();
    state.round = None;
    state.phase = Phase::Idle;
    state.start_pending = false;
    log::info!(
        "Game over: score {} after {} rounds",
        state.score.value(),
        state.stats.rounds_played
    );
    effects.push(Effect::CancelAnnouncement);
    effects.push(Effect::RoundCleared);
    effects.push(Effect::GameOver {
        score: state.score.value(),
        stats: state.stats.clone(),
    });
}
