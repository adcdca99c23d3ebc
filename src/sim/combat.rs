//! Projectile resolution and damage/scoring rules
//!
//! Per bullet and per tick, in this order: integrate, expire against the
//! inflated play boundary (an expired bullet never also deals damage that
//! tick), then scan targets in collection iteration order and resolve the
//! first bounding-box overlap. At most one collision per bullet per frame.
//! Hostile bullets only ever test the player; friendly bullets only test
//! hostiles, so friendly fire cannot happen by construction.

use super::collision::Aabb;
use super::events::{
    ENEMY_EXPLOSION, GameEvent, INTERCEPT_EXPLOSION, INTERCEPT_EXPLOSION_COLOR, PLAYER_EXPLOSION,
    PLAYER_EXPLOSION_COLOR, Sound,
};
use super::state::{DamageOutcome, GamePhase, GameState};
use crate::consts::{BULLET_BOUNDS_MARGIN, INTERCEPT_MARGIN};

/// Projectile phase of one tick.
pub fn run_bullet_phase(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let bounds = Aabb::play_area().inflate(BULLET_BOUNDS_MARGIN);
    for bi in 0..state.bullets.len() {
        if !state.bullets[bi].alive {
            continue;
        }
        let vel = state.bullets[bi].vel;
        state.bullets[bi].pos += vel;

        if !bounds.contains_point(state.bullets[bi].pos) {
            state.bullets[bi].alive = false;
            continue;
        }

        if state.bullets[bi].friendly {
            resolve_friendly(state, bi, events);
        } else {
            resolve_hostile(state, bi, events);
        }
    }
}

fn resolve_hostile(state: &mut GameState, bi: usize, events: &mut Vec<GameEvent>) {
    if !state.player.alive {
        return;
    }
    let bullet_box = state.bullets[bi].bbox();
    if !bullet_box.intersects(&state.player.bbox()) {
        return;
    }

    let damage = state.bullets[bi].damage;
    state.bullets[bi].alive = false;
    // The hitless-run flag only ever moves one way until a level advance
    state.player.hitless = false;
    events.push(GameEvent::Sound(Sound::Hit));

    if state.player.apply_damage(damage) == DamageOutcome::Killed {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::Explosion {
            center: state.player.pos,
            count: PLAYER_EXPLOSION.0,
            lifetime: PLAYER_EXPLOSION.1,
            color: PLAYER_EXPLOSION_COLOR,
        });
        log::info!(
            "player destroyed by enemy {:?} on wave {}",
            state.bullets[bi].owner,
            state.wave_index
        );
    }
}

fn resolve_friendly(state: &mut GameState, bi: usize, events: &mut Vec<GameEvent>) {
    let bullet_box = state.bullets[bi].bbox();

    // First live hostile in iteration order wins
    let target = state
        .enemies
        .iter()
        .position(|e| e.alive && e.bbox().intersects(&bullet_box));
    if let Some(ei) = target {
        let damage = state.bullets[bi].damage;
        state.bullets[bi].alive = false;
        state.player.hits += 1;
        events.push(GameEvent::Sound(Sound::Hit));

        // Kill detection reads the alive flag right after the damage, so a
        // target already dead this frame can never award twice
        if state.enemies[ei].apply_damage(damage) == DamageOutcome::Killed {
            let stats = state.enemies[ei].stats();
            let bonus = state.scaling.points_bonus;
            state.player.score += (stats.points as f32 * bonus).round() as u64;
            state.player.coins += (u64::from(stats.points) / 10).max(1);
            state.player.kills += 1;
            events.push(GameEvent::Explosion {
                center: state.enemies[ei].pos,
                count: ENEMY_EXPLOSION.0,
                lifetime: ENEMY_EXPLOSION.1,
                color: stats.color,
            });
            log::debug!(
                "enemy {} ({}) destroyed, +{} points",
                state.enemies[ei].id,
                stats.name,
                stats.points
            );
        }
        return;
    }

    // No entity target: try to intercept hostile fire. Only the hostile box
    // is inflated (see consts::INTERCEPT_MARGIN).
    for bj in 0..state.bullets.len() {
        if bj == bi {
            continue;
        }
        if !state.bullets[bj].alive || state.bullets[bj].friendly {
            continue;
        }
        if state.bullets[bj]
            .bbox()
            .inflate(INTERCEPT_MARGIN)
            .intersects(&bullet_box)
        {
            let center = (state.bullets[bi].pos + state.bullets[bj].pos) / 2.0;
            state.bullets[bi].alive = false;
            state.bullets[bj].alive = false;
            // Counts as a hit, never as a kill
            state.player.hits += 1;
            events.push(GameEvent::Sound(Sound::Hit));
            events.push(GameEvent::Explosion {
                center,
                count: INTERCEPT_EXPLOSION.0,
                lifetime: INTERCEPT_EXPLOSION.1,
                color: INTERCEPT_EXPLOSION_COLOR,
            });
            return;
        }
    }
}
