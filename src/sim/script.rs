//! Resumable scripted behaviors
//!
//! A script is a finite sequence of per-frame steps with a fixed duration,
//! advanced once per tick by the owning entity. The resumption point is an
//! explicit cursor rather than a suspended function, so it is introspectable
//! and serializes with the rest of the state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Enemy;
use crate::consts::{PUSH_BACK_SHARPNESS, SPAWN_FADE_FRAMES};
use crate::remap;

/// Exponential impulse easing: rises sharply, peaks at `x = 1/k`, decays.
#[inline]
pub fn exp_impulse(x: f32, k: f32) -> f32 {
    k * x * (1.0 - k * x).exp()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ScriptKind {
    /// Spawn fade: opacity 0 to 255, velocity held until completion
    FadeIn { saved_vel: Vec2 },
    /// Displace upward along the impulse curve; `norm` is the precomputed
    /// sum of curve samples, so the steps add up to `target` exactly
    PushBack { target: f32, norm: f32 },
}

/// A scripted behavior: cursor + duration + per-step rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    cursor: u32,
    duration: u32,
    kind: ScriptKind,
}

impl Script {
    /// Spawn fade-in over [`SPAWN_FADE_FRAMES`] frames. The entity's
    /// velocity is parked here and restored when the fade completes.
    pub fn fade_in(saved_vel: Vec2) -> Self {
        Self {
            cursor: 0,
            duration: SPAWN_FADE_FRAMES,
            kind: ScriptKind::FadeIn { saved_vel },
        }
    }

    /// Push the entity `target` pixels up the screen over `duration` frames.
    pub fn push_back(target: f32, duration: u32) -> Self {
        let duration = duration.max(1);
        let k = PUSH_BACK_SHARPNESS;
        let norm: f32 = (0..duration)
            .map(|i| exp_impulse(i as f32 / duration as f32, k))
            .sum();
        Self {
            cursor: 0,
            duration,
            kind: ScriptKind::PushBack { target, norm },
        }
    }

    pub fn remaining(&self) -> u32 {
        self.duration - self.cursor
    }

    /// Execute one step, mutating the owning entity. Returns true when the
    /// script is exhausted and control returns to the default update.
    pub fn step(&mut self, enemy: &mut Enemy) -> bool {
        let i = self.cursor;
        match self.kind {
            ScriptKind::FadeIn { saved_vel } => {
                let last = (self.duration - 1) as f32;
                enemy.opacity = remap(i as f32, (0.0, last), (0.0, 255.0)).round() as u8;
                if i + 1 >= self.duration {
                    enemy.spawning = false;
                    enemy.vel = saved_vel;
                }
            }
            ScriptKind::PushBack { target, norm } => {
                let t = i as f32 / self.duration as f32;
                let dy = exp_impulse(t, PUSH_BACK_SHARPNESS) / norm * target;
                enemy.pos.y -= dy;
            }
        }
        self.cursor += 1;
        self.cursor >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ROW_HEIGHT;
    use crate::sim::ai::AiId;
    use crate::sim::spawn::ArchetypeId;
    use proptest::prelude::*;

    fn fresh_enemy() -> Enemy {
        Enemy::new(1, ArchetypeId::Grunt, Vec2::new(200.0, 60.0), AiId::NONE)
    }

    #[test]
    fn test_fade_in_ramps_opacity_and_restores_velocity() {
        let mut e = fresh_enemy();
        assert_eq!(e.opacity, 0);
        assert_eq!(e.vel, Vec2::ZERO);

        for _ in 0..SPAWN_FADE_FRAMES - 1 {
            assert!(e.run_script());
            assert!(e.spawning);
        }
        assert!(e.opacity < 255);

        assert!(e.run_script());
        assert_eq!(e.opacity, 255);
        assert!(!e.spawning);
        assert!(e.vel.x > 0.0);
        assert!(e.script.is_none());

        // Control is back with the default update
        assert!(!e.run_script());
    }

    #[test]
    fn test_fade_in_does_not_move_entity() {
        let mut e = fresh_enemy();
        let start = e.pos;
        for _ in 0..SPAWN_FADE_FRAMES {
            e.run_script();
        }
        assert_eq!(e.pos, start);
    }

    #[test]
    fn test_push_back_total_displacement() {
        let mut e = fresh_enemy();
        e.script = None;
        e.spawning = false;
        let start_y = e.pos.y;
        e.begin_push_back(2.0, 30);
        while e.run_script() {}
        let moved = start_y - e.pos.y;
        assert!((moved - 2.0 * ROW_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn test_push_back_only_moves_vertically() {
        let mut e = fresh_enemy();
        e.script = None;
        let start_x = e.pos.x;
        e.begin_push_back(1.0, 30);
        while e.run_script() {}
        assert_eq!(e.pos.x, start_x);
    }

    proptest! {
        /// The per-step displacements sum to the requested target within
        /// floating-point tolerance, for any duration.
        #[test]
        fn prop_push_back_integrates_to_target(duration in 1u32..180, target in 1.0f32..300.0) {
            let mut script = Script::push_back(target, duration);
            let mut e = fresh_enemy();
            e.script = None;
            let start_y = e.pos.y;
            loop {
                if script.step(&mut e) {
                    break;
                }
            }
            let moved = start_y - e.pos.y;
            prop_assert!((moved - target).abs() < target * 1e-4 + 1e-3);
        }
    }
}
