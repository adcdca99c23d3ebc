//! Game state and core simulation types
//!
//! All state that must be persisted for replay/determinism lives here,
//! including the RNG, so a save restores the exact same run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{AiId, AiRegistry, Strategy};
use super::collision::Aabb;
use super::script::Script;
use super::spawn::{Archetype, ArchetypeId};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended (player destroyed)
    GameOver,
}

/// Outcome of applying damage to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead; nothing changed
    Ignored,
    /// Health was reduced but the target survived
    Damaged,
    /// This application brought health to zero; fires exactly once
    Killed,
}

fn apply_damage_to(health: &mut f32, alive: &mut bool, amount: f32) -> DamageOutcome {
    if !*alive {
        return DamageOutcome::Ignored;
    }
    *health = (*health - amount).max(0.0);
    if *health <= 0.0 {
        *alive = false;
        DamageOutcome::Killed
    } else {
        DamageOutcome::Damaged
    }
}

/// Discrete frame timer gating repeatable actions (firing).
///
/// `remaining` rests at a -1 sentinel once expired, so a zero-period
/// cooldown fires every frame it is invoked. A successful `fire` resets
/// the counter to `period`, which next allows firing `period + 1` frames
/// later (the counter must tick past zero again).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cooldown {
    period: u32,
    remaining: i32,
}

const REARMED: i32 = -1;

impl Cooldown {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            remaining: REARMED,
        }
    }

    /// Count down one frame; call every frame regardless of firing attempts.
    pub fn tick(&mut self) {
        self.remaining = (self.remaining - 1).max(REARMED);
    }

    /// Attempt to trigger. Succeeds only once the counter has passed zero.
    pub fn fire(&mut self) -> bool {
        if self.remaining <= REARMED {
            self.remaining = self.period as i32;
            true
        } else {
            false
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= REARMED
    }
}

/// Externally supplied difficulty multipliers; read at use time, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingParams {
    pub enemy_damage_boost: f32,
    pub points_bonus: f32,
}

impl Default for ScalingParams {
    fn default() -> Self {
        Self {
            enemy_damage_boost: 1.0,
            points_bonus: 1.0,
        }
    }
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: ArchetypeId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    /// Visual fade, 0-255; cosmetic except during the spawn fade-in
    pub opacity: u8,
    /// True while the spawn fade-in suppresses normal motion
    pub spawning: bool,
    /// Back-reference to the controlling AI (registry id, never a pointer)
    pub ai: AiId,
    /// At most one active scripted behavior
    pub script: Option<Script>,
}

impl Enemy {
    pub fn new(id: u32, archetype: ArchetypeId, pos: Vec2, ai: AiId) -> Self {
        let stats = archetype.stats();
        let vel = Vec2::new(stats.speed, 0.0);
        Self {
            id,
            archetype,
            pos,
            // Motion is suppressed until the fade-in hands the velocity back
            vel: Vec2::ZERO,
            size: Vec2::new(ENEMY_SIZE.0, ENEMY_SIZE.1),
            health: stats.health,
            max_health: stats.health,
            alive: true,
            opacity: 0,
            spawning: true,
            ai,
            script: Some(Script::fade_in(vel)),
        }
    }

    pub fn stats(&self) -> &'static Archetype {
        self.archetype.stats()
    }

    /// Base speed of this enemy's archetype (one "speed unit")
    pub fn speed(&self) -> f32 {
        self.stats().speed
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Reduce health, clamped at zero. Idempotent against the dead.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        apply_damage_to(&mut self.health, &mut self.alive, amount)
    }

    /// Advance the active scripted behavior by one step, if any.
    /// Returns true if a script consumed this frame's update.
    pub fn run_script(&mut self) -> bool {
        let Some(mut script) = self.script.take() else {
            return false;
        };
        if !script.step(self) {
            self.script = Some(script);
        }
        true
    }

    /// Displace this enemy upward by `rows` formation rows over `duration`
    /// frames along an impulse curve. Rejected while another behavior
    /// (e.g. the spawn fade) is active.
    pub fn begin_push_back(&mut self, rows: f32, duration: u32) {
        if self.script.is_some() {
            return;
        }
        self.script = Some(Script::push_back(rows * ROW_HEIGHT, duration));
    }
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub fire_cooldown: Cooldown,
    pub score: u64,
    pub coins: u64,
    pub kills: u32,
    pub hits: u32,
    /// True until any hostile bullet connects; restored only on wave advance
    pub hitless: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(W / 2.0, H - 20.0),
            size: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            health: PLAYER_MAX_LIFE,
            max_health: PLAYER_MAX_LIFE,
            alive: true,
            fire_cooldown: Cooldown::new(PLAYER_FIRE_COOLDOWN),
            score: 0,
            coins: 0,
            kills: 0,
            hits: 0,
            hitless: true,
        }
    }
}

impl Player {
    pub fn bbox(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Move horizontally by the input axis, clamped to the play area.
    pub fn apply_axis(&mut self, axis: f32) {
        self.pos.x += axis.clamp(-1.0, 1.0) * PLAYER_SPEED;
        self.pos.x = self.pos.x.clamp(self.size.x / 2.0, W - self.size.x / 2.0);
    }

    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        apply_damage_to(&mut self.health, &mut self.alive, amount)
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// True for the player's bullets, false for enemy fire
    pub friendly: bool,
    pub damage: f32,
    /// Firing enemy, for attribution; None for the player's bullets
    pub owner: Option<u32>,
    pub alive: bool,
}

impl Bullet {
    pub fn friendly(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, -BULLET_SPEED),
            size: Vec2::new(BULLET_SIZE.0, BULLET_SIZE.1),
            friendly: true,
            damage: PLAYER_FIRE_DAMAGE,
            owner: None,
            alive: true,
        }
    }

    /// Hostile fire travels down at half the friendly speed.
    pub fn hostile(id: u32, pos: Vec2, damage: f32, owner: u32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, BULLET_SPEED / 2.0),
            size: Vec2::new(BULLET_SIZE.0, BULLET_SIZE.1),
            friendly: false,
            damage,
            owner: Some(owner),
            alive: true,
        }
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; serialized so a restored save replays identically
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current wave (1-based; gates which archetypes may spawn)
    pub wave_index: u32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live hostiles (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Live projectiles (sorted by id for determinism)
    pub bullets: Vec<Bullet>,
    /// AI strategy registry; enemies reference slots by [`AiId`]
    pub ais: AiRegistry,
    /// Shared one-way destination for formation members that overrun the line
    pub flee_ai: AiId,
    pub scaling: ScalingParams,
    next_id: u32,
}

impl GameState {
    /// Create a new run and spawn the first wave.
    pub fn new(seed: u64) -> Self {
        let mut ais = AiRegistry::default();
        let flee_ai = ais.create(Strategy::flee());
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            wave_index: 1,
            phase: GamePhase::Playing,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            ais,
            flee_ai,
            scaling: ScalingParams::default(),
            next_id: 1,
        };
        super::spawn::spawn_wave(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Force every live enemy one or more rows back up the screen.
    pub fn push_back_wave(&mut self, rows: f32) {
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            enemy.begin_push_back(rows, PUSH_BACK_DURATION);
        }
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::ArchetypeId;

    fn test_enemy(id: u32) -> Enemy {
        let mut e = Enemy::new(id, ArchetypeId::Grunt, Vec2::new(100.0, 100.0), AiId::NONE);
        // Skip the spawn fade for damage tests
        e.script = None;
        e.spawning = false;
        e.opacity = 255;
        e
    }

    #[test]
    fn test_cooldown_cadence() {
        // period=3: fire() each frame yields [T, F, F, F], then T at frame 4
        let mut cd = Cooldown::new(3);
        let mut results = Vec::new();
        for _ in 0..5 {
            results.push(cd.fire());
            cd.tick();
        }
        assert_eq!(results, vec![true, false, false, false, true]);
    }

    #[test]
    fn test_cooldown_zero_period_autofires() {
        let mut cd = Cooldown::new(0);
        for _ in 0..4 {
            assert!(cd.fire());
            cd.tick();
        }
    }

    #[test]
    fn test_cooldown_blocked_fire_keeps_state() {
        let mut cd = Cooldown::new(5);
        assert!(cd.fire());
        assert!(!cd.fire());
        assert!(!cd.fire());
        // Failed attempts don't delay the rearm
        for _ in 0..6 {
            cd.tick();
        }
        assert!(cd.fire());
    }

    #[test]
    fn test_apply_damage_clamps_and_kills_once() {
        let mut e = test_enemy(1);
        assert_eq!(e.apply_damage(20.0), DamageOutcome::Damaged);
        assert!((e.health - 30.0).abs() < 1e-6);
        assert_eq!(e.apply_damage(100.0), DamageOutcome::Killed);
        assert_eq!(e.health, 0.0);
        assert!(!e.alive);
        // Damage after death is ignored entirely
        assert_eq!(e.apply_damage(100.0), DamageOutcome::Ignored);
        assert_eq!(e.health, 0.0);
    }

    #[test]
    fn test_exact_lethal_damage_kills() {
        let mut e = test_enemy(1);
        assert_eq!(e.apply_damage(e.max_health), DamageOutcome::Killed);
    }

    #[test]
    fn test_push_back_rejected_while_spawning() {
        let mut e = Enemy::new(1, ArchetypeId::Grunt, Vec2::new(100.0, 100.0), AiId::NONE);
        assert!(e.script.is_some());
        e.begin_push_back(2.0, 30);
        // The spawn fade is still the active script
        assert!(e.spawning);
    }

    #[test]
    fn test_player_axis_clamped_to_play_area() {
        let mut p = Player::default();
        for _ in 0..500 {
            p.apply_axis(1.0);
        }
        assert!(p.pos.x <= W - p.size.x / 2.0 + 1e-6);
        for _ in 0..500 {
            p.apply_axis(-1.0);
        }
        assert!(p.pos.x >= p.size.x / 2.0 - 1e-6);
    }
}
