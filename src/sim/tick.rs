//! Per-frame simulation step
//!
//! Order within a tick:
//! 1. Spawner tops up enemies and power-ups
//! 2. Movement and targeting (player, enemies, projectiles, turret)
//! 3. Collision and damage resolution
//! 4. Lightning chain propagation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chain::propagate_chains;
use super::collision::resolve_collisions;
use super::events::{FrameEvents, GameEvent};
use super::state::{GamePhase, HeldKeys, Projectile, World};
use crate::{direction_from_degrees, heading_degrees};

/// Input sampled for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement keys held this tick
    pub keys: HeldKeys,
    /// Pointer position in arena coordinates (player faces it)
    pub pointer: Option<Vec2>,
}

/// How a fire input is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireMode {
    /// Shotgun fan with a lightning chain per pellet
    Spread,
    /// One plain bullet
    Single,
}

/// Advance the world by one step of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> FrameEvents {
    let mut events = FrameEvents::default();

    if world.phase == GamePhase::Paused {
        return events;
    }
    world.time_ticks += 1;

    world.spawn_enemies(&mut events);
    world.spawn_power_ups(&mut events);

    update_player(world, input, dt);
    update_enemies(world, dt);
    update_projectiles(world, dt, &mut events);
    update_turret(world, dt, &mut events);

    resolve_collisions(world, &mut events);

    propagate_chains(world, &mut events);

    events
}

fn update_player(world: &mut World, input: &TickInput, dt: f32) {
    let speed = world.tuning.player_speed;
    let arena = world.tuning.arena_size();
    world.player.steer(input.keys, speed, dt, arena);
    if let Some(pointer) = input.pointer {
        world.player.face(pointer);
    }
}

/// Enemies close in on the player's position from the end of movement
fn update_enemies(world: &mut World, dt: f32) {
    let target = world.player.pos;
    for enemy in &mut world.enemies {
        enemy.pursue(target, dt);
    }
}

fn update_projectiles(world: &mut World, dt: f32, events: &mut FrameEvents) {
    let arena = world.tuning.arena_size();
    world.projectiles.retain_mut(|projectile| {
        projectile.advance(dt);
        if projectile.bounds().is_outside(arena) {
            events.push(GameEvent::ProjectileExpired { id: projectile.id });
            false
        } else {
            true
        }
    });
}

/// Fire at the nearest enemy once the cooldown has elapsed
fn update_turret(world: &mut World, dt: f32, events: &mut FrameEvents) {
    let Some(turret) = world.turret.as_mut() else {
        return;
    };
    turret.since_last_shot += dt;
    if !turret.ready() {
        return;
    }
    turret.since_last_shot = 0.0;
    let (origin, level) = (turret.pos, turret.level);

    // First encountered wins ties
    let mut closest: Option<(u32, Vec2, f32)> = None;
    for enemy in &world.enemies {
        let dist = enemy.pos.distance(origin);
        if closest.is_none_or(|(_, _, best)| dist < best) {
            closest = Some((enemy.id, enemy.pos, dist));
        }
    }
    let Some((target_id, target_pos, _)) = closest else {
        return;
    };

    let angle = heading_degrees(origin, target_pos);
    let damage = world.tuning.turret_damage(level);
    let projectile_id = world.spawn_projectile(origin, angle, damage);
    log::debug!("Turret fired at enemy {} ({:.1} deg, {} dmg)", target_id, angle, damage);
    events.push(GameEvent::ProjectileFired { id: projectile_id, pos: origin, angle });
    events.push(GameEvent::TurretFired { projectile_id, target_id });
}

impl World {
    /// Spawn a projectile flying at `angle` degrees
    pub(crate) fn spawn_projectile(&mut self, pos: Vec2, angle: f32, damage: i32) -> u32 {
        let id = self.next_entity_id();
        let vel = direction_from_degrees(angle) * self.tuning.projectile_speed;
        self.projectiles.push(Projectile {
            id,
            pos,
            vel,
            size: Vec2::splat(self.tuning.projectile_size),
            angle,
            damage,
        });
        id
    }

    /// Spread fire is available once the lightning gun is owned
    pub fn preferred_fire_mode(&self) -> FireMode {
        if self.player.lightning_level > 0 {
            FireMode::Spread
        } else {
            FireMode::Single
        }
    }

    /// Handle a fire input. Returns the new projectile IDs (empty while paused).
    pub fn fire(&mut self, mode: FireMode) -> Vec<u32> {
        if self.is_paused() {
            return Vec::new();
        }
        let origin = self.player.pos;
        let facing = self.player.angle;

        match mode {
            FireMode::Single => {
                let damage = self.tuning.base_shot_damage;
                vec![self.spawn_projectile(origin, facing, damage)]
            }
            FireMode::Spread => {
                let shotgun = self.player.shotgun_level;
                let count = self.tuning.spread_base_count + shotgun;
                let damage = self.tuning.spread_damage(shotgun);
                let step = self.tuning.spread_step_degrees;
                let budget = self.player.lightning_level;
                let first = -2 - (shotgun / 2) as i32;

                let ids: Vec<u32> = (0..count as i32)
                    .map(|i| {
                        let angle = crate::normalize_degrees(facing + (first + i) as f32 * step);
                        let id = self.spawn_projectile(origin, angle, damage);
                        self.start_chain(origin, damage, budget);
                        id
                    })
                    .collect();
                log::debug!("Spread fired {} pellets, {} dmg, chain budget {}", count, damage, budget);
                ids
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// World with no automatic spawning
    fn quiet_world() -> World {
        let mut tuning = Tuning::default();
        tuning.enemy_cap = 0;
        tuning.power_up_cap = 0;
        World::new(11, tuning)
    }

    #[test]
    fn test_tick_spawns_one_of_each() {
        let mut world = World::new(11, Tuning::default());
        let events = tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.time_ticks(), 1);
        let spawned_enemies = events
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { health: 50, .. }))
            .count();
        let spawned_power_ups = events
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpSpawned { .. }))
            .count();
        assert_eq!(spawned_enemies, 1);
        assert_eq!(spawned_power_ups, 1);
    }

    #[test]
    fn test_paused_tick_freezes_everything() {
        let mut world = quiet_world();
        world.place_enemy(Vec2::new(100.0, 100.0));
        world.fire(FireMode::Single);
        world.set_paused(true);

        let input = TickInput {
            keys: HeldKeys {
                right: true,
                ..Default::default()
            },
            pointer: Some(Vec2::new(0.0, 0.0)),
        };
        for _ in 0..10 {
            let events = tick(&mut world, &input, SIM_DT);
            assert!(events.is_empty());
        }
        assert_eq!(world.enemies()[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(world.projectiles()[0].pos, Vec2::new(400.0, 300.0));
        assert_eq!(world.player().pos, Vec2::new(400.0, 300.0));
        assert_eq!(world.player().angle, 0.0);
        assert_eq!(world.time_ticks(), 0);
        assert!(world.fire(FireMode::Single).is_empty());

        world.set_paused(false);
        tick(&mut world, &input, SIM_DT);
        assert_eq!(world.time_ticks(), 1);
        assert!(world.player().pos.x > 400.0);
    }

    #[test]
    fn test_spread_fan_geometry() {
        let mut world = quiet_world();
        world.player.shotgun_level = 2;
        world.player.lightning_level = 3;

        let ids = world.fire(FireMode::Spread);
        assert_eq!(ids.len(), 5);
        let angles: Vec<f32> = world.projectiles().iter().map(|p| p.angle).collect();
        let expected = [330.0, 340.0, 350.0, 0.0, 10.0];
        for (a, e) in angles.iter().zip(expected) {
            assert!((a - e).abs() < 1e-3, "{a} != {e}");
        }
        assert!(world.projectiles().iter().all(|p| p.damage == 20));
        assert_eq!(world.chains().len(), 5);
        assert!(world.chains().iter().all(|c| c.chain_count == 3 && c.damage == 20));
    }

    #[test]
    fn test_default_spread_has_three_pellets() {
        let mut world = quiet_world();
        assert_eq!(world.preferred_fire_mode(), FireMode::Spread);
        let ids = world.fire(world.preferred_fire_mode());
        assert_eq!(ids.len(), 3);
        assert!(world.projectiles().iter().all(|p| p.damage == 10));
    }

    #[test]
    fn test_enemy_walks_into_player() {
        let mut world = quiet_world();
        world.place_enemy(Vec2::new(400.0, 100.0));
        let mut contact_tick = None;
        for t in 0..400 {
            let events = tick(&mut world, &TickInput::default(), SIM_DT);
            if events
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyContact { .. }))
            {
                contact_tick = Some(t);
                break;
            }
        }
        // 200 units apart, 60 units of box overlap needed, 1 unit per tick
        assert!(matches!(contact_tick, Some(139..=141)));
        assert_eq!(world.player().health, 99);
        assert!(world.enemies().is_empty());
    }

    #[test]
    fn test_turret_targets_nearest() {
        let mut world = quiet_world();
        world.currency = 500;
        assert!(world.purchase(crate::sim::ShopItem::Turret));
        let turret_pos = world.turret().map(|t| t.pos).unwrap();

        world.place_enemy(turret_pos + Vec2::new(300.0, 0.0));
        let near = world.place_enemy(turret_pos + Vec2::new(0.0, 150.0));
        // Same distance, but spawned later
        world.place_enemy(turret_pos + Vec2::new(-150.0, 0.0));
        world.enemies.iter_mut().for_each(|e| e.speed = 0.0);

        let events = tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(events.events.contains(&GameEvent::TurretFired {
            projectile_id: world.projectiles()[0].id,
            target_id: near,
        }));
        let shot = &world.projectiles()[0];
        assert_eq!(shot.damage, 10);
        // Fired straight down the screen from the turret
        assert_eq!(shot.pos, turret_pos);
        assert!(shot.vel.x.abs() < 1e-2 && shot.vel.y > 0.0);

        // Cooldown holds the next shot for a full second
        for _ in 0..30 {
            let events = tick(&mut world, &TickInput::default(), SIM_DT);
            assert!(!events.events.iter().any(|e| matches!(e, GameEvent::TurretFired { .. })));
        }
    }

    #[test]
    fn test_level_zero_turret_fires_every_sixty_ticks() {
        let mut world = quiet_world();
        world.currency = 500;
        assert!(world.purchase(crate::sim::ShopItem::Turret));
        world.place_enemy(Vec2::new(60.0, 60.0));
        world.enemies[0].speed = 0.0;

        let mut fired_on = Vec::new();
        for _ in 0..200 {
            let events = tick(&mut world, &TickInput::default(), SIM_DT);
            if events.events.iter().any(|e| matches!(e, GameEvent::TurretFired { .. })) {
                fired_on.push(world.time_ticks());
            }
        }
        assert_eq!(fired_on, vec![1, 61, 121, 181]);
    }

    #[test]
    fn test_turret_idle_without_enemies() {
        let mut world = quiet_world();
        world.currency = 500;
        assert!(world.purchase(crate::sim::ShopItem::Turret));
        let events = tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(world.projectiles().is_empty());
        assert!(!events.events.iter().any(|e| matches!(e, GameEvent::TurretFired { .. })));
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_arena(
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..200),
        ) {
            let mut world = quiet_world();
            for (up, down, left, right) in moves {
                let input = TickInput {
                    keys: HeldKeys { up, down, left, right },
                    pointer: None,
                };
                tick(&mut world, &input, SIM_DT);
                let p = world.player();
                prop_assert!(p.pos.x >= 40.0 && p.pos.x <= 760.0);
                prop_assert!(p.pos.y >= 30.0 && p.pos.y <= 570.0);
            }
        }

        #[test]
        fn prop_player_health_bounded_over_ticks(seed in any::<u64>(), ticks in 1usize..300) {
            let mut world = World::new(seed, Tuning::default());
            for _ in 0..ticks {
                tick(&mut world, &TickInput::default(), SIM_DT);
                prop_assert!(world.player().health >= 0);
            }
        }
    }
}
