//! World state and entity records
//!
//! All simulation state lives in [`World`]. Entity collections are owned here
//! and only handed out as shared references for drawing.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::tuning::{Tuning, TuningError};
use crate::{direction_to, heading_degrees};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Movement, spawning, collisions and lightning are frozen; the shop stays open
    Paused,
}

/// Movement keys held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The player-controlled ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    /// Facing angle in degrees, [0, 360)
    pub angle: f32,
    pub health: i32,
    pub shotgun_level: u32,
    pub shield_level: u32,
    pub turret_level: u32,
    pub lightning_level: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: tuning.cell_size(),
            angle: 0.0,
            health: tuning.player_start_health,
            shotgun_level: 0,
            shield_level: 0,
            turret_level: 0,
            lightning_level: tuning.starting_lightning_level,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move along each held axis, keeping the whole ship inside the arena
    pub fn steer(&mut self, keys: HeldKeys, speed: f32, dt: f32, arena: Vec2) {
        let mut delta = Vec2::ZERO;
        if keys.up {
            delta.y -= 1.0;
        }
        if keys.down {
            delta.y += 1.0;
        }
        if keys.left {
            delta.x -= 1.0;
        }
        if keys.right {
            delta.x += 1.0;
        }
        // Per-axis speed: diagonals are not normalized
        self.pos = Aabb::clamp_center(self.pos + delta * speed * dt, self.size, arena);
    }

    /// Face the pointer
    pub fn face(&mut self, pointer: Vec2) {
        self.angle = heading_degrees(self.pos, pointer);
    }

    /// Apply damage, clamping health at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount).max(0);
        before - self.health
    }

    /// Heal, optionally capped. Returns the health actually gained.
    pub fn heal(&mut self, amount: i32, max_health: Option<i32>) -> i32 {
        let before = self.health;
        let healed = self.health.saturating_add(amount);
        self.health = match max_health {
            Some(max) => healed.min(max.max(before)),
            None => healed,
        };
        self.health - before
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    /// Spawn health, for health bars
    pub max_health: i32,
    /// Units per second
    pub speed: f32,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Step toward `target`; an enemy already on top of it stays put
    pub fn pursue(&mut self, target: Vec2, dt: f32) {
        if let Some(dir) = direction_to(self.pos, target) {
            self.pos += dir * self.speed * dt;
        }
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health -= amount;
        was_alive && !self.is_alive()
    }
}

/// A straight-flying bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Fixed at creation from the firing angle
    pub vel: Vec2,
    pub size: Vec2,
    /// Firing angle in degrees (for sprite rotation)
    pub angle: f32,
    pub damage: i32,
}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// A health pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub heal: i32,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// The autonomous turret (at most one)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub pos: Vec2,
    pub size: Vec2,
    pub level: u32,
    /// Seconds between shots, `base / factor^level`
    pub interval: f32,
    /// Seconds since the last shot
    pub since_last_shot: f32,
}

/// Seconds of float drift tolerated when comparing cooldowns
const COOLDOWN_SLACK: f32 = 1e-4;

impl Turret {
    /// A new turret is ready to fire immediately
    pub fn new(pos: Vec2, level: u32, tuning: &Tuning) -> Self {
        let interval = tuning.turret_interval(level);
        Self {
            pos,
            size: tuning.cell_size(),
            level,
            interval,
            since_last_shot: interval,
        }
    }

    pub fn set_level(&mut self, level: u32, tuning: &Tuning) {
        self.level = level;
        self.interval = tuning.turret_interval(level);
    }

    /// Summed `dt` steps drift below the exact interval, hence the slack
    pub fn ready(&self) -> bool {
        self.since_last_shot + COOLDOWN_SLACK >= self.interval
    }
}

/// One link of a lightning relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningChain {
    pub origin: Vec2,
    pub damage: i32,
    /// Remaining hops, including this one
    pub chain_count: u32,
    /// Enemies this chain has already struck
    pub hit: Vec<u32>,
    /// Consecutive passes without a new hit
    pub idle_passes: u32,
    /// Passes evaluated so far
    pub age: u32,
}

impl LightningChain {
    pub fn new(origin: Vec2, damage: i32, chain_count: u32) -> Self {
        Self {
            origin,
            damage,
            chain_count,
            hit: Vec::new(),
            idle_passes: 0,
            age: 0,
        }
    }

    pub fn has_hit(&self, enemy_id: u32) -> bool {
        self.hit.contains(&enemy_id)
    }

    /// Whether striking an enemy relays a child chain
    pub fn can_relay(&self) -> bool {
        self.chain_count > 1
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    pub(crate) player: Player,
    /// Live enemies (spawn order)
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) power_ups: Vec<PowerUp>,
    pub(crate) turret: Option<Turret>,
    pub(crate) chains: Vec<LightningChain>,
    /// Score doubles as shop currency
    pub(crate) currency: u32,
    /// Difficulty level, starts at 1
    pub(crate) level: u32,
    pub(crate) time_ticks: u64,
    /// Set once the defeat event has been reported
    pub(crate) defeat_reported: bool,
    next_id: u32,
}

impl World {
    /// Create a world from a tuning that has not been validated yet
    pub fn try_new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::new(seed, tuning))
    }

    /// Create a world with the player at the arena center.
    ///
    /// `tuning` is trusted as-is. Documents loaded through
    /// [`Tuning::from_json`] are already validated; use [`World::try_new`]
    /// for hand-built values.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(tuning.arena_size() / 2.0, &tuning);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            turret: None,
            chains: Vec::new(),
            currency: 0,
            level: 1,
            time_ticks: 0,
            defeat_reported: false,
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_paused(&mut self, paused: bool) {
        let phase = if paused { GamePhase::Paused } else { GamePhase::Playing };
        if phase != self.phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn turret(&self) -> Option<&Turret> {
        self.turret.as_ref()
    }

    pub fn chains(&self) -> &[LightningChain] {
        &self.chains
    }

    pub fn currency(&self) -> u32 {
        self.currency
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Radius of the cosmetic shield ring (0 when no shield)
    pub fn shield_radius(&self) -> f32 {
        self.tuning.shield_ring_radius * self.player.shield_level as f32
    }
}
