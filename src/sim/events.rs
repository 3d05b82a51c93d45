//! Per-frame event log handed to the presentation layer
//!
//! The simulation never draws or plays sounds. Instead each call that mutates
//! the world reports what happened so the front end can animate it.

use glam::Vec2;
use serde::Serialize;

/// What dealt damage to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageSource {
    Projectile,
    Lightning,
}

/// A single thing that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, pos: Vec2, health: i32 },
    PowerUpSpawned { id: u32, pos: Vec2 },
    ProjectileFired { id: u32, pos: Vec2, angle: f32 },
    /// Projectile left the arena
    ProjectileExpired { id: u32 },
    /// Projectile struck at least one enemy and was removed
    ProjectileSpent { id: u32 },
    EnemyDamaged { id: u32, amount: i32, source: DamageSource },
    EnemyKilled { id: u32, pos: Vec2 },
    /// Enemy reached the player and was consumed
    EnemyContact { id: u32 },
    PlayerDamaged { amount: i32, health: i32 },
    PowerUpCollected { id: u32, healed: i32 },
    /// Lightning jumped from `from` to the enemy at `to`
    ChainArc { from: Vec2, to: Vec2 },
    TurretFired { projectile_id: u32, target_id: u32 },
    LevelUp { level: u32 },
    /// Player health reached zero for the first time
    PlayerDefeated,
}

/// Everything a single tick produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameEvents {
    pub events: Vec<GameEvent>,
    /// Net currency change this tick
    pub currency_delta: i64,
    /// Number of level thresholds crossed this tick
    pub levels_gained: u32,
}

impl FrameEvents {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.currency_delta == 0 && self.levels_gained == 0
    }

    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }

    /// Total damage dealt to enemies this tick
    pub fn enemy_damage(&self) -> i32 {
        self.events
            .iter()
            .map(|e| match e {
                GameEvent::EnemyDamaged { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count()
    }
}
