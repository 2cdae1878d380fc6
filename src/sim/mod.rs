//! Deterministic round engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only advances through `Event::Advance`
//! - No rendering, audio or platform dependencies

pub mod bounds;
pub mod placement;
pub mod round;
pub mod score;
pub mod state;
pub mod tick;
pub mod timer;

pub use bounds::{Insets, PlayAreaBounds, Rect};
pub use placement::{Placement, PlacementStrategy, place};
pub use round::{Alphabet, FeedbackState, Round, Sizing, Symbol, Target, generate};
pub use score::{Score, SessionStats};
pub use state::{EngineConfig, GameState, Phase};
pub use tick::{ClickOutcome, Effect, Event, dispatch, resolve_click};
pub use timer::{ScheduledTimer, TimerKind, TimerQueue, TimerToken};
