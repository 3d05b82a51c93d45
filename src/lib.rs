//! Lightning Arena - A top-down arena combat simulation
//!
//! Core modules:
//! - `sim`: Frame-step simulation (movement, collisions, lightning, economy)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input polling and the shop UI live outside this crate. They feed
//! sampled input into [`sim::tick`] and draw from the read-only accessors on
//! [`sim::World`].

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Target simulation rate
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Arena is divided into a grid; one cell is the size of a player/enemy
    pub const GRID_COLS: u32 = 10;
    pub const GRID_ROWS: u32 = 10;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 480.0; // 8 px per tick at 60 Hz
    pub const PLAYER_START_HEALTH: i32 = 100;
    pub const STARTING_LIGHTNING_LEVEL: u32 = 1;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 60.0;
    pub const ENEMY_BASE_HEALTH: i32 = 50;
    pub const ENEMY_HEALTH_STEP: i32 = 10;
    pub const ENEMY_CAP: usize = 10;
    pub const CONTACT_DAMAGE: i32 = 1;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 1200.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const BASE_SHOT_DAMAGE: i32 = 10;
    pub const SHOTGUN_DAMAGE_STEP: i32 = 5;
    pub const SPREAD_BASE_COUNT: u32 = 3;
    pub const SPREAD_STEP_DEGREES: f32 = 10.0;

    /// Power-ups
    pub const POWER_UP_CAP: usize = 2;
    pub const POWER_UP_HEAL: i32 = 10;

    /// Spawn positions are inset from the arena edge by this much
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Lightning
    pub const CHAIN_RADIUS: f32 = 200.0;
    pub const CHAIN_IDLE_TICKS: u32 = 1;
    pub const CHAIN_MAX_TICKS: u32 = 30;

    /// Turret
    pub const TURRET_BASE_INTERVAL: f32 = 1.0; // seconds
    pub const TURRET_INTERVAL_FACTOR: f32 = 1.5;
    pub const TURRET_BASE_DAMAGE: i32 = 10;
    pub const TURRET_DAMAGE_STEP: i32 = 5;

    /// Economy
    pub const HIT_REWARD: u32 = 10;
    pub const LEVEL_THRESHOLD: u32 = 500;
    pub const SHIELD_PRICE: u32 = 300;
    pub const HEALTH_BOOST_PRICE: u32 = 100;
    pub const SHOTGUN_PRICE: u32 = 200;
    pub const TURRET_PRICE: u32 = 500;
    pub const LIGHTNING_PRICE: u32 = 400;
    pub const HEALTH_BOOST_AMOUNT: i32 = 50;
    pub const SHOTGUN_PROJECTILE_BUFF: i32 = 10;

    /// Cosmetic shield ring radius per shield level
    pub const SHIELD_RING_RADIUS: f32 = 60.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit heading for an angle in degrees (screen space, y points down)
#[inline]
pub fn direction_from_degrees(angle: f32) -> Vec2 {
    let rad = angle.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Angle in degrees from `from` toward `to`, measured counter-clockwise on screen
#[inline]
pub fn heading_degrees(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    normalize_degrees((-delta.y).atan2(delta.x).to_degrees())
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}
