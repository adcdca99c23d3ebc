//! Events emitted by the simulation for the outside world
//!
//! Audio and particle effects are fire-and-forget collaborators; the sim
//! never calls them directly. Each tick returns the events it produced and
//! the host drains them in order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sound effect requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    /// A bullet was fired (either side)
    Shoot,
    /// A bullet connected with something
    Hit,
}

/// One simulation side effect for the host to render/play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(Sound),
    /// Spawn a particle explosion; `count`/`lifetime` scale the effect,
    /// `color` is an RGB hint
    Explosion {
        center: Vec2,
        count: u32,
        lifetime: u32,
        color: [u8; 3],
    },
}

/// Explosion sizing per event class
pub const ENEMY_EXPLOSION: (u32, u32) = (100, 40);
pub const PLAYER_EXPLOSION: (u32, u32) = (200, 60);
pub const INTERCEPT_EXPLOSION: (u32, u32) = (20, 20);

pub const PLAYER_EXPLOSION_COLOR: [u8; 3] = [221, 55, 69];
pub const INTERCEPT_EXPLOSION_COLOR: [u8; 3] = [192, 203, 220];
