//! Enemy archetypes and wave spawning
//!
//! Hostile variants are data-driven records rather than a type per enemy:
//! the spawner draws an archetype by weighted random choice among the types
//! eligible for the current wave.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::Strategy;
use super::state::{Enemy, GameState};
use crate::consts::*;
use crate::remap;

/// Stats shared by every enemy of one archetype
#[derive(Debug, Clone, Copy)]
pub struct Archetype {
    pub name: &'static str,
    pub health: f32,
    pub speed: f32,
    pub fire_damage: f32,
    pub points: u32,
    pub color: [u8; 3],
    /// Weight in the spawn draw
    pub spawn_weight: u32,
    /// Eligible only from this wave on
    pub min_wave: u32,
}

/// Hostile variant tag; stats live in [`ARCHETYPES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeId {
    Grunt,
    Tank,
    Damager,
    Worthy,
}

pub const ARCHETYPES: [Archetype; 4] = [
    Archetype {
        name: "grunt",
        health: 50.0,
        speed: BASE_ENEMY_SPEED,
        fire_damage: 100.0,
        points: 10,
        color: [192, 203, 220],
        spawn_weight: 10,
        min_wave: 1,
    },
    Archetype {
        name: "tank",
        health: 200.0,
        speed: BASE_ENEMY_SPEED,
        fire_damage: 100.0,
        points: 45,
        color: [182, 3, 252],
        spawn_weight: 3,
        min_wave: 2,
    },
    Archetype {
        name: "damager",
        health: 50.0,
        speed: BASE_ENEMY_SPEED,
        fire_damage: 300.0,
        points: 30,
        color: [221, 55, 69],
        spawn_weight: 4,
        min_wave: 3,
    },
    Archetype {
        name: "worthy",
        health: 50.0,
        speed: BASE_ENEMY_SPEED,
        fire_damage: 100.0,
        points: 100,
        color: [255, 215, 0],
        spawn_weight: 1,
        min_wave: 3,
    },
];

impl ArchetypeId {
    pub const ALL: [ArchetypeId; 4] = [
        ArchetypeId::Grunt,
        ArchetypeId::Tank,
        ArchetypeId::Damager,
        ArchetypeId::Worthy,
    ];

    pub fn stats(self) -> &'static Archetype {
        match self {
            ArchetypeId::Grunt => &ARCHETYPES[0],
            ArchetypeId::Tank => &ARCHETYPES[1],
            ArchetypeId::Damager => &ARCHETYPES[2],
            ArchetypeId::Worthy => &ARCHETYPES[3],
        }
    }
}

/// Draw an archetype eligible for `wave`, weighted by spawn probability.
/// The grunt is eligible from wave 1, so the pool is never empty.
pub fn pick_archetype(rng: &mut Pcg32, wave: u32) -> ArchetypeId {
    let eligible: Vec<ArchetypeId> = ArchetypeId::ALL
        .iter()
        .copied()
        .filter(|a| a.stats().min_wave <= wave)
        .collect();
    eligible
        .choose_weighted(rng, |a| a.stats().spawn_weight)
        .copied()
        .unwrap_or(ArchetypeId::Grunt)
}

/// Lay out a block formation grid and register it with a fresh AI.
pub fn spawn_formation(state: &mut GameState, rows: u32, cols: u32, wave: u32) {
    let ai_id = state.ais.create(Strategy::block_formation());
    for row in 0..rows {
        for col in 0..cols {
            let x = remap(
                col as f32,
                (0.0, (cols - 1) as f32),
                (FORMATION_MARGIN * 3.0, W - FORMATION_MARGIN * 3.0),
            );
            let y = FORMATION_MARGIN + row as f32 * ROW_HEIGHT;
            let archetype = pick_archetype(&mut state.rng, wave);
            let id = state.next_entity_id();
            state.ais.add_member(ai_id, id);
            state
                .enemies
                .push(Enemy::new(id, archetype, Vec2::new(x, y), ai_id));
        }
    }
}

/// Lay out a single-file snake column above the visible area.
pub fn spawn_snake(state: &mut GameState, count: u32) {
    let ai_id = state.ais.create(Strategy::snake());
    for i in 0..count {
        let pos = Vec2::new(
            FORMATION_MARGIN,
            FORMATION_MARGIN - i as f32 * ROW_HEIGHT,
        );
        let id = state.next_entity_id();
        state.ais.add_member(ai_id, id);
        state
            .enemies
            .push(Enemy::new(id, ArchetypeId::Grunt, pos, ai_id));
    }
}

/// Spawn everything for the state's current wave.
pub fn spawn_wave(state: &mut GameState) {
    let wave = state.wave_index;
    let rows = 4 + wave / 3;
    spawn_formation(state, rows, FORMATION_COLS, wave);
    // Every third wave sends an extra snake column down the flanks
    if wave % 3 == 0 {
        spawn_snake(state, 4 + wave);
    }
    log::info!(
        "wave {}: spawned {} hostiles ({} rows)",
        wave,
        state.enemies.len(),
        rows
    );
}
