//! Nova Swarm - enemy-formation and combat simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, AI formations, projectiles)
//!
//! Rendering, audio, particles and input binding live outside this crate;
//! the simulation reports to them through [`sim::GameEvent`] values.

pub mod sim;

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (pixels)
    pub const W: f32 = 640.0;
    pub const H: f32 = 360.0;

    /// Minimum distance a formation keeps from the side walls
    pub const FORMATION_MARGIN: f32 = 45.0;
    /// Vertical step of one formation row
    pub const ROW_HEIGHT: f32 = 30.0;
    /// Enemies past this line abandon their formation and flee
    pub const FLEE_LINE: f32 = H - 2.0 * ROW_HEIGHT;
    /// Horizontal flee speed, as a multiple of the archetype speed
    pub const FLEE_SPEED_MULT: f32 = 3.0;

    /// Formation speed boost range (smaller surviving group moves faster)
    pub const SPEED_BOOST_MIN: f32 = 1.0;
    pub const SPEED_BOOST_MAX: f32 = 5.0;
    /// Power curve applied to the boost remap
    pub const SPEED_BOOST_POWER: f32 = 3.0;

    /// Spawn fade-in duration (frames); velocity is suppressed throughout
    pub const SPAWN_FADE_FRAMES: u32 = 40;
    /// Push-back defaults
    pub const PUSH_BACK_DURATION: u32 = 30;
    pub const PUSH_BACK_SHARPNESS: f32 = 3.0;

    /// Enemy bounding size
    pub const ENEMY_SIZE: (f32, f32) = (16.0, 16.0);
    /// Base horizontal speed shared by all archetypes (px/frame); descent
    /// timing is derived from it
    pub const BASE_ENEMY_SPEED: f32 = 0.5;
    /// One fire roll in this many per enemy per frame
    pub const ENEMY_FIRE_ODDS: u32 = 500;

    /// Player defaults
    pub const PLAYER_SIZE: (f32, f32) = (20.0, 12.0);
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_MAX_LIFE: f32 = 500.0;
    pub const PLAYER_FIRE_COOLDOWN: u32 = 24;
    pub const PLAYER_FIRE_DAMAGE: f32 = 100.0;

    /// Bullet defaults (friendly travels up, hostile down at half speed)
    pub const BULLET_SPEED: f32 = 7.0;
    pub const BULLET_SIZE: (f32, f32) = (2.0, 5.0);
    /// Bullets expire outside the play area inflated by this much
    pub const BULLET_BOUNDS_MARGIN: f32 = 10.0;
    /// Extra inflation of the hostile box for bullet-on-bullet interception.
    /// Asymmetric on purpose; tune here, not in the resolver.
    pub const INTERCEPT_MARGIN: f32 = 6.0;

    /// Wave layout
    pub const FORMATION_COLS: u32 = 10;
}

/// Remap `value` from the `from` range to the `to` range, clamped.
#[inline]
pub fn remap(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    remap_power(value, from, to, 1.0, false)
}

/// Remap with a power curve; `flipped` inverts the normalized position
/// (so a small input maps to the high end of `to`).
#[inline]
pub fn remap_power(value: f32, from: (f32, f32), to: (f32, f32), power: f32, flipped: bool) -> f32 {
    let span = from.1 - from.0;
    let mut n = if span.abs() < f32::EPSILON {
        0.0
    } else {
        ((value - from.0) / span).clamp(0.0, 1.0)
    };
    if flipped {
        n = 1.0 - n;
    }
    to.0 + n.powf(power) * (to.1 - to.0)
}
