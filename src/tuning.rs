//! Data-driven game balance
//!
//! Every number the simulation uses lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a JSON document can override any subset of fields.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Rejected tuning document
#[derive(Debug)]
pub enum TuningError {
    /// The document was not valid JSON for [`Tuning`]
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid tuning document: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Balance and arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    /// Spawn and turret placement inset from the arena edge
    pub spawn_margin: f32,

    // === Player ===
    /// Units per second along each held axis
    pub player_speed: f32,
    pub player_start_health: i32,
    /// Upper bound for healing; `None` leaves health uncapped upward
    pub max_health: Option<i32>,
    pub starting_lightning_level: u32,
    pub contact_damage: i32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_base_health: i32,
    /// Extra spawn health per level above 1
    pub enemy_health_step: i32,
    pub enemy_cap: usize,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub base_shot_damage: i32,
    pub shotgun_damage_step: i32,
    pub spread_base_count: u32,
    pub spread_step_degrees: f32,

    // === Power-ups ===
    pub power_up_cap: usize,
    pub power_up_heal: i32,

    // === Lightning ===
    pub chain_radius: f32,
    /// Passes without a new hit before a chain is discarded
    pub chain_idle_ticks: u32,
    /// Hard cap on passes a chain may live
    pub chain_max_ticks: u32,

    // === Turret ===
    /// Seconds between shots at turret level 0
    pub turret_base_interval: f32,
    pub turret_interval_factor: f32,
    pub turret_base_damage: i32,
    pub turret_damage_step: i32,

    // === Economy ===
    pub hit_reward: u32,
    pub level_threshold: u32,
    pub shield_price: u32,
    pub health_boost_price: u32,
    pub shotgun_price: u32,
    pub turret_price: u32,
    pub lightning_price: u32,
    pub health_boost_amount: i32,
    pub shotgun_projectile_buff: i32,
    pub shield_ring_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            grid_cols: GRID_COLS,
            grid_rows: GRID_ROWS,
            spawn_margin: SPAWN_MARGIN,

            player_speed: PLAYER_SPEED,
            player_start_health: PLAYER_START_HEALTH,
            max_health: None,
            starting_lightning_level: STARTING_LIGHTNING_LEVEL,
            contact_damage: CONTACT_DAMAGE,

            enemy_speed: ENEMY_SPEED,
            enemy_base_health: ENEMY_BASE_HEALTH,
            enemy_health_step: ENEMY_HEALTH_STEP,
            enemy_cap: ENEMY_CAP,

            projectile_speed: PROJECTILE_SPEED,
            projectile_size: PROJECTILE_SIZE,
            base_shot_damage: BASE_SHOT_DAMAGE,
            shotgun_damage_step: SHOTGUN_DAMAGE_STEP,
            spread_base_count: SPREAD_BASE_COUNT,
            spread_step_degrees: SPREAD_STEP_DEGREES,

            power_up_cap: POWER_UP_CAP,
            power_up_heal: POWER_UP_HEAL,

            chain_radius: CHAIN_RADIUS,
            chain_idle_ticks: CHAIN_IDLE_TICKS,
            chain_max_ticks: CHAIN_MAX_TICKS,

            turret_base_interval: TURRET_BASE_INTERVAL,
            turret_interval_factor: TURRET_INTERVAL_FACTOR,
            turret_base_damage: TURRET_BASE_DAMAGE,
            turret_damage_step: TURRET_DAMAGE_STEP,

            hit_reward: HIT_REWARD,
            level_threshold: LEVEL_THRESHOLD,
            shield_price: SHIELD_PRICE,
            health_boost_price: HEALTH_BOOST_PRICE,
            shotgun_price: SHOTGUN_PRICE,
            turret_price: TURRET_PRICE,
            lightning_price: LIGHTNING_PRICE,
            health_boost_amount: HEALTH_BOOST_AMOUNT,
            shotgun_projectile_buff: SHOTGUN_PROJECTILE_BUFF,
            shield_ring_radius: SHIELD_RING_RADIUS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every field is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.arena_width > 0.0) {
            return invalid("arena_width", "must be positive");
        }
        if !(self.arena_height > 0.0) {
            return invalid("arena_height", "must be positive");
        }
        if self.grid_cols == 0 {
            return invalid("grid_cols", "must be non-zero");
        }
        if self.grid_rows == 0 {
            return invalid("grid_rows", "must be non-zero");
        }
        if !(self.spawn_margin >= 0.0)
            || self.spawn_margin * 2.0 > self.arena_width
            || self.spawn_margin * 2.0 > self.arena_height
        {
            return invalid("spawn_margin", "must fit inside the arena");
        }
        if !(self.player_speed > 0.0) {
            return invalid("player_speed", "must be positive");
        }
        if self.player_start_health <= 0 {
            return invalid("player_start_health", "must be positive");
        }
        if let Some(max) = self.max_health {
            if max < self.player_start_health {
                return invalid("max_health", "must be at least player_start_health");
            }
        }
        if !(self.enemy_speed >= 0.0) {
            return invalid("enemy_speed", "must not be negative");
        }
        if self.enemy_base_health <= 0 {
            return invalid("enemy_base_health", "must be positive");
        }
        if !(self.projectile_speed > 0.0) {
            return invalid("projectile_speed", "must be positive");
        }
        if !(self.projectile_size > 0.0) {
            return invalid("projectile_size", "must be positive");
        }
        if !(self.chain_radius >= 0.0) {
            return invalid("chain_radius", "must not be negative");
        }
        if !(self.turret_base_interval > 0.0) {
            return invalid("turret_base_interval", "must be positive");
        }
        if !(self.turret_interval_factor > 1.0) {
            return invalid("turret_interval_factor", "must be greater than 1");
        }
        if self.level_threshold == 0 {
            return invalid("level_threshold", "must be non-zero");
        }
        if self.chain_idle_ticks == 0 {
            return invalid("chain_idle_ticks", "must be non-zero");
        }
        Ok(())
    }

    /// Size of one grid cell (player, enemy and turret footprint)
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.arena_width / self.grid_cols as f32,
            self.arena_height / self.grid_rows as f32,
        )
    }

    /// Power-up footprint (a quarter cell)
    pub fn power_up_size(&self) -> Vec2 {
        self.cell_size() / 4.0
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Spawn health for enemies created at `level` (levels start at 1)
    pub fn enemy_health_for_level(&self, level: u32) -> i32 {
        self.enemy_base_health + level.saturating_sub(1) as i32 * self.enemy_health_step
    }

    /// Turret fire interval (seconds) at a given turret level
    pub fn turret_interval(&self, level: u32) -> f32 {
        self.turret_base_interval / self.turret_interval_factor.powi(level as i32)
    }

    /// Damage of a turret shot at a given turret level
    pub fn turret_damage(&self, level: u32) -> i32 {
        self.turret_base_damage + self.turret_damage_step * level as i32
    }

    /// Damage of a spread shot at a given shotgun level
    pub fn spread_damage(&self, shotgun_level: u32) -> i32 {
        self.base_shot_damage + self.shotgun_damage_step * shotgun_level as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.cell_size(), Vec2::new(80.0, 60.0));
        assert_eq!(tuning.power_up_size(), Vec2::new(20.0, 15.0));
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "enemy_cap": 3, "max_health": 150 }"#).unwrap();
        assert_eq!(tuning.enemy_cap, 3);
        assert_eq!(tuning.max_health, Some(150));
        // Untouched fields keep their defaults
        assert_eq!(tuning.turret_price, TURRET_PRICE);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "turret_interval_factor": 1.0 }"#),
            Err(TuningError::Invalid { field: "turret_interval_factor", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "level_threshold": 0 }"#),
            Err(TuningError::Invalid { field: "level_threshold", .. })
        ));
    }

    #[test]
    fn test_nan_fields_rejected() {
        let margin = Tuning {
            spawn_margin: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            margin.validate(),
            Err(TuningError::Invalid { field: "spawn_margin", .. })
        ));

        let shot = Tuning {
            projectile_size: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            shot.validate(),
            Err(TuningError::Invalid { field: "projectile_size", .. })
        ));

        let radius = Tuning {
            chain_radius: -1.0,
            ..Tuning::default()
        };
        assert!(matches!(
            radius.validate(),
            Err(TuningError::Invalid { field: "chain_radius", .. })
        ));
    }

    #[test]
    fn test_enemy_health_scaling() {
        let tuning = Tuning::default();
        assert_eq!(tuning.enemy_health_for_level(1), 50);
        assert_eq!(tuning.enemy_health_for_level(2), 60);
        assert_eq!(tuning.enemy_health_for_level(5), 90);
    }

    #[test]
    fn test_turret_interval_shrinks_by_factor() {
        let tuning = Tuning::default();
        assert!((tuning.turret_interval(0) - 1.0).abs() < 1e-6);
        for level in 0..10 {
            let ratio = tuning.turret_interval(level) / tuning.turret_interval(level + 1);
            assert!((ratio - 1.5).abs() < 1e-4);
        }
    }
}
