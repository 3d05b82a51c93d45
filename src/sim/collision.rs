//! Collision detection and damage resolution
//!
//! Resolution order matters and is fixed:
//! 1. Projectiles against enemies (each hit pays the hit reward)
//! 2. Enemies against the player (contact is a one-shot suicide hit)
//! 3. Power-ups against the player

use super::events::{DamageSource, FrameEvents, GameEvent};
use super::state::World;

/// Resolve all collisions for the current positions
pub fn resolve_collisions(world: &mut World, events: &mut FrameEvents) {
    resolve_projectile_hits(world, events);
    resolve_enemy_contacts(world, events);
    resolve_power_up_pickups(world, events);
}

/// Each projectile strikes every live enemy it overlaps, then is spent.
///
/// Health is checked after every individual hit, so an enemy killed by an
/// earlier hit cannot absorb later ones this tick.
pub fn resolve_projectile_hits(world: &mut World, events: &mut FrameEvents) {
    let mut hits = 0u32;

    let enemies = &mut world.enemies;
    world.projectiles.retain(|projectile| {
        let bounds = projectile.bounds();
        let mut struck = false;
        for enemy in enemies
            .iter_mut()
            .filter(|e| e.is_alive() && e.bounds().overlaps(&bounds))
        {
            events.push(GameEvent::EnemyDamaged {
                id: enemy.id,
                amount: projectile.damage,
                source: DamageSource::Projectile,
            });
            if enemy.take_damage(projectile.damage) {
                events.push(GameEvent::EnemyKilled { id: enemy.id, pos: enemy.pos });
            }
            hits += 1;
            struck = true;
        }
        if struck {
            events.push(GameEvent::ProjectileSpent { id: projectile.id });
        }
        !struck
    });
    world.enemies.retain(|e| e.is_alive());

    // Rewards are paid per hit, not per kill
    let reward = world.tuning.hit_reward;
    for _ in 0..hits {
        world.award_into(reward, events);
    }
}

/// Every enemy touching the player deals contact damage and is removed
pub fn resolve_enemy_contacts(world: &mut World, events: &mut FrameEvents) {
    let player_bounds = world.player.bounds();
    let damage = world.tuning.contact_damage;

    let player = &mut world.player;
    world.enemies.retain(|enemy| {
        if !enemy.bounds().overlaps(&player_bounds) {
            return true;
        }
        let taken = player.take_damage(damage);
        events.push(GameEvent::EnemyContact { id: enemy.id });
        events.push(GameEvent::PlayerDamaged { amount: taken, health: player.health });
        false
    });

    if world.player.is_defeated() && !world.defeat_reported {
        world.defeat_reported = true;
        log::info!("Player defeated at level {} with {} currency", world.level, world.currency);
        events.push(GameEvent::PlayerDefeated);
    }
}

/// Power-ups touching the player heal it and are consumed
pub fn resolve_power_up_pickups(world: &mut World, events: &mut FrameEvents) {
    let player_bounds = world.player.bounds();
    let max_health = world.tuning.max_health;

    let player = &mut world.player;
    world.power_ups.retain(|power_up| {
        if !power_up.bounds().overlaps(&player_bounds) {
            return true;
        }
        let healed = player.heal(power_up.heal, max_health);
        events.push(GameEvent::PowerUpCollected { id: power_up.id, healed });
        false
    });
}
