//! Population top-up and level progression
//!
//! Each tick adds at most one enemy and one power-up while below their caps.
//! Currency rewards push the level up every time a threshold multiple is crossed.

use glam::Vec2;
use rand::Rng;

use super::events::{FrameEvents, GameEvent};
use super::state::{Enemy, PowerUp, World};

impl World {
    /// Random point inside the margin-inset arena (inclusive bounds)
    pub(crate) fn random_inset_point(&mut self) -> Vec2 {
        let margin = self.tuning.spawn_margin;
        let x = self.rng.random_range(margin..=self.tuning.arena_width - margin);
        let y = self.rng.random_range(margin..=self.tuning.arena_height - margin);
        Vec2::new(x, y)
    }

    /// Spawn one enemy if below the population cap
    pub(crate) fn spawn_enemies(&mut self, events: &mut FrameEvents) {
        if self.enemies.len() < self.tuning.enemy_cap {
            let pos = self.random_inset_point();
            let id = self.place_enemy(pos);
            if let Some(enemy) = self.enemies.last() {
                events.push(GameEvent::EnemySpawned { id, pos, health: enemy.health });
            }
        }
    }

    /// Spawn one power-up if below the population cap
    pub(crate) fn spawn_power_ups(&mut self, events: &mut FrameEvents) {
        if self.power_ups.len() < self.tuning.power_up_cap {
            let pos = self.random_inset_point();
            let id = self.place_power_up(pos);
            events.push(GameEvent::PowerUpSpawned { id, pos });
        }
    }

    /// Add an enemy at `pos` with health scaled to the current level
    pub fn place_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let health = self.tuning.enemy_health_for_level(self.level);
        log::debug!("Enemy {} spawned at ({:.0}, {:.0}) with {} hp", id, pos.x, pos.y, health);
        self.enemies.push(Enemy {
            id,
            pos,
            size: self.tuning.cell_size(),
            health,
            max_health: health,
            speed: self.tuning.enemy_speed,
        });
        id
    }

    /// Add a power-up at `pos`
    pub fn place_power_up(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp {
            id,
            pos,
            size: self.tuning.power_up_size(),
            heal: self.tuning.power_up_heal,
        });
        id
    }

    /// Grant currency and apply any level-ups it triggers.
    /// Returns the number of levels gained.
    pub fn award(&mut self, amount: u32) -> u32 {
        let threshold = self.tuning.level_threshold;
        let before = self.currency;
        self.currency = self.currency.saturating_add(amount);
        let gained = self.currency / threshold - before / threshold;
        for _ in 0..gained {
            self.level += 1;
            log::info!("Level up! Now level {} (currency {})", self.level, self.currency);
        }
        gained
    }

    /// [`World::award`] that also records the change in `events`
    pub(crate) fn award_into(&mut self, amount: u32, events: &mut FrameEvents) {
        let gained = self.award(amount);
        events.currency_delta += i64::from(amount);
        events.levels_gained += gained;
        let top = self.level;
        for level in (top - gained + 1)..=top {
            events.push(GameEvent::LevelUp { level });
        }
    }
}
