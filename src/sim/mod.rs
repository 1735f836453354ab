//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod difficulty;
pub mod hit;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autoplay::next_tap;
pub use difficulty::{bump_speed, reroll_target, spawn_rate_for_score, tighten_spawn_rate};
pub use hit::{HitResult, hit_test};
pub use resolve::{TapOutcome, handle_tap};
pub use spawn::spawn;
pub use state::{
    Deferred, DeferredAction, Entity, EntityKind, Feedback, GameEvent, GamePhase, GameState,
    Indicator, IndicatorTone, MAX_SELECTION, Selection, SessionStats,
};
pub use tick::tick;
