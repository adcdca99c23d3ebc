//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical tick, one simulation step per rendered frame
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies; side effects for the
//!   outside world are reported as [`GameEvent`] values

pub mod ai;
pub mod collision;
pub mod combat;
pub mod events;
pub mod script;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ai::{Ai, AiId, AiRegistry, Strategy};
pub use collision::Aabb;
pub use events::{GameEvent, Sound};
pub use script::{Script, exp_impulse};
pub use spawn::{ARCHETYPES, Archetype, ArchetypeId};
pub use state::{
    Bullet, Cooldown, DamageOutcome, Enemy, GamePhase, GameState, Player, ScalingParams,
};
pub use tick::{TickInput, tick};
