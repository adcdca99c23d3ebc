//! Group AI strategies
//!
//! Each AI instance controls a set of enemies through an index-based
//! registry: enemies carry an [`AiId`] back-reference and the AI tracks
//! membership as entity ids, never as references. `logic` is invoked once
//! per live member per frame, but group-wide work runs only once per frame,
//! gated by an explicit tick stamp.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{Enemy, GameState};
use crate::consts::*;
use crate::remap_power;

/// Registry handle for an AI instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiId(pub u32);

impl AiId {
    /// Placeholder for enemies not (yet) owned by any registered AI
    pub const NONE: AiId = AiId(u32::MAX);
}

/// Coordinated left-right sweep with periodic descents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockFormation {
    /// Horizontal scan direction: +1 right, -1 left
    direction: f32,
    /// Frames of descent remaining; <= 0 while sweeping
    go_down_duration: i32,
    /// Historical peak membership, for the survivor speed boost
    max_controlled: usize,
}

/// Members follow a shared zig-zag checkpoint path in single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    goals: Vec<Vec2>,
    /// Per-member index of the current checkpoint
    current_goals: HashMap<u32, usize>,
}

/// Per-group AI behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Strategy {
    BlockFormation(BlockFormation),
    Snake(Snake),
    /// Members sprint horizontally off whichever side they are closest to
    Flee,
}

impl Strategy {
    pub fn block_formation() -> Self {
        Strategy::BlockFormation(BlockFormation {
            direction: 1.0,
            go_down_duration: 0,
            max_controlled: 0,
        })
    }

    pub fn snake() -> Self {
        Self::snake_with_path(Snake::checkpoints())
    }

    pub fn snake_with_path(goals: Vec<Vec2>) -> Self {
        Strategy::Snake(Snake {
            goals,
            current_goals: HashMap::new(),
        })
    }

    pub fn flee() -> Self {
        Strategy::Flee
    }

    pub fn is_flee(&self) -> bool {
        matches!(self, Strategy::Flee)
    }
}

/// One AI instance: membership plus strategy state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ai {
    pub id: AiId,
    /// Controlled enemies, by id; pruned of the dead before any group read
    pub members: Vec<u32>,
    pub strategy: Strategy,
    /// Tick stamp of the last group computation (frame gate)
    last_group_tick: Option<u64>,
}

impl Ai {
    pub fn add(&mut self, enemy_id: u32) {
        if !self.members.contains(&enemy_id) {
            self.members.push(enemy_id);
        }
    }

    pub fn remove(&mut self, enemy_id: u32) {
        self.members.retain(|&id| id != enemy_id);
    }

    fn prune(&mut self, enemies: &[Enemy]) {
        self.members
            .retain(|&id| enemies.iter().any(|e| e.id == id && e.alive));
    }

    /// Per-member entry point, called once per live member per frame.
    /// The first call of a frame prunes the membership and runs the
    /// group-wide step; later calls in the same frame only run the
    /// member-local step.
    pub fn logic(&mut self, enemy_id: u32, enemies: &mut [Enemy], tick: u64) {
        if self.last_group_tick != Some(tick) {
            self.last_group_tick = Some(tick);
            self.prune(enemies);
            if let Strategy::BlockFormation(formation) = &mut self.strategy {
                formation.group_step(&self.members, enemies);
            }
        }
        match &mut self.strategy {
            Strategy::BlockFormation(_) => {}
            Strategy::Snake(snake) => {
                if let Some(enemy) = enemies.iter_mut().find(|e| e.id == enemy_id && e.alive) {
                    snake.entity_step(enemy);
                }
            }
            Strategy::Flee => {
                if let Some(enemy) = enemies.iter_mut().find(|e| e.id == enemy_id && e.alive) {
                    flee_step(enemy);
                }
            }
        }
    }
}

impl BlockFormation {
    fn group_step(&mut self, members: &[u32], enemies: &mut [Enemy]) {
        let live: Vec<usize> = members
            .iter()
            .filter_map(|&id| enemies.iter().position(|e| e.id == id && e.alive))
            .collect();
        // An emptied group computes nothing; aggregates below assume members
        if live.is_empty() {
            return;
        }

        self.max_controlled = self.max_controlled.max(live.len());

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for &i in &live {
            let e = &enemies[i];
            min_x = min_x.min(e.pos.x - e.size.x / 2.0);
            max_x = max_x.max(e.pos.x + e.size.x / 2.0);
        }
        let wall_left = min_x < FORMATION_MARGIN;
        let wall_right = max_x > W - FORMATION_MARGIN;

        // Survivors speed up: cubic remap of live count against the peak
        let boost = remap_power(
            live.len() as f32,
            (0.0, self.max_controlled as f32),
            (SPEED_BOOST_MIN, SPEED_BOOST_MAX),
            SPEED_BOOST_POWER,
            true,
        );

        self.go_down_duration -= 1;
        if self.go_down_duration > 0 {
            // Mid-descent; keep going down
        } else if self.go_down_duration == 0 {
            // Descent just finished: resume the sweep in the flipped direction
            self.set_direction(&live, enemies, self.direction, 0.0);
        } else if wall_left || wall_right {
            self.direction = -self.direction; // swap for the next row
            self.go_down_duration = (ROW_HEIGHT / boost / BASE_ENEMY_SPEED) as i32;
            self.set_direction(&live, enemies, 0.0, 1.0);
        }

        // Rescale every moving member to the boosted speed
        for &i in &live {
            let e = &mut enemies[i];
            if e.spawning {
                continue;
            }
            if e.vel.length_squared() > 0.0 {
                e.vel = e.vel.normalize() * (e.speed() * boost);
            }
        }
    }

    /// Point all live, non-spawning members along (x, y); fading-in members
    /// keep their velocity suppressed.
    fn set_direction(&self, live: &[usize], enemies: &mut [Enemy], x: f32, y: f32) {
        for &i in live {
            let e = &mut enemies[i];
            if e.spawning {
                continue;
            }
            e.vel = Vec2::new(e.speed() * x, e.speed() * y);
        }
    }
}

impl Snake {
    /// Rectangular zig-zag spanning the play height
    fn checkpoints() -> Vec<Vec2> {
        let mut goals = Vec::new();
        let mut y = FORMATION_MARGIN;
        while y < H + ROW_HEIGHT {
            goals.push(Vec2::new(FORMATION_MARGIN, y));
            goals.push(Vec2::new(W - FORMATION_MARGIN, y));
            goals.push(Vec2::new(W - FORMATION_MARGIN, y + ROW_HEIGHT));
            goals.push(Vec2::new(FORMATION_MARGIN, y + ROW_HEIGHT));
            y += 2.0 * ROW_HEIGHT;
        }
        goals
    }

    fn entity_step(&mut self, enemy: &mut Enemy) {
        let current = self.current_goals.entry(enemy.id).or_insert(0);
        let Some(&goal) = self.goals.get(*current) else {
            // No more goals: the member leaves the simulation, not a death
            enemy.alive = false;
            return;
        };
        if enemy.pos.distance(goal) < enemy.speed() {
            *current += 1;
        }
        enemy.vel = (goal - enemy.pos).normalize_or_zero() * enemy.speed();
    }
}

fn flee_step(enemy: &mut Enemy) {
    let direction = if enemy.pos.x > W / 2.0 { 1.0 } else { -1.0 };
    enemy.vel = Vec2::new(direction * enemy.speed() * FLEE_SPEED_MULT, 0.0);
    if !enemy.bbox().intersects(&Aabb::play_area()) {
        enemy.alive = false;
    }
}

/// Owns every AI instance; enemies address them by [`AiId`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiRegistry {
    ais: Vec<Ai>,
    next_id: u32,
}

impl AiRegistry {
    pub fn create(&mut self, strategy: Strategy) -> AiId {
        let id = AiId(self.next_id);
        self.next_id += 1;
        self.ais.push(Ai {
            id,
            members: Vec::new(),
            strategy,
            last_group_tick: None,
        });
        id
    }

    pub fn get(&self, id: AiId) -> Option<&Ai> {
        self.ais.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AiId) -> Option<&mut Ai> {
        self.ais.iter_mut().find(|a| a.id == id)
    }

    pub fn add_member(&mut self, ai: AiId, enemy_id: u32) {
        if let Some(ai) = self.get_mut(ai) {
            ai.add(enemy_id);
        }
    }

    pub fn remove_member(&mut self, ai: AiId, enemy_id: u32) {
        if let Some(ai) = self.get_mut(ai) {
            ai.remove(enemy_id);
        }
    }

    pub fn is_flee(&self, id: AiId) -> bool {
        self.get(id).is_some_and(|a| a.strategy.is_flee())
    }
}

/// AI phase of one tick: for each live, non-spawning enemy in id order,
/// hand formation members that overran the line to the shared flee AI,
/// then run its AI's logic. Group steps run once per AI per frame.
pub fn run_ai_phase(state: &mut GameState) {
    let mut ais = std::mem::take(&mut state.ais);
    let flee_id = state.flee_ai;
    let tick = state.time_ticks;

    for i in 0..state.enemies.len() {
        if !state.enemies[i].alive || state.enemies[i].spawning {
            continue;
        }
        let id = state.enemies[i].id;

        // One-way handoff: past the line, the formation loses the member
        if state.enemies[i].pos.y > FLEE_LINE && !ais.is_flee(state.enemies[i].ai) {
            let old = state.enemies[i].ai;
            ais.remove_member(old, id);
            ais.add_member(flee_id, id);
            state.enemies[i].ai = flee_id;
            log::debug!("enemy {id} overran the formation line, fleeing");
        }

        let ai_id = state.enemies[i].ai;
        if let Some(ai) = ais.get_mut(ai_id) {
            ai.logic(id, &mut state.enemies, tick);
        }
    }

    state.ais = ais;
}
