//! Lightning chain propagation
//!
//! A chain strikes every live enemy within range of its origin that it has not
//! struck before. Each strike relays a child chain from the struck enemy with
//! one fewer hop, and children are evaluated in the same pass, so a whole relay
//! resolves within a single tick.
//!
//! Chains are discarded after `chain_idle_ticks` consecutive passes without a
//! new strike, or after `chain_max_ticks` passes in total.

use glam::Vec2;

use super::events::{DamageSource, FrameEvents, GameEvent};
use super::state::{LightningChain, World};

/// Run one propagation pass over every active chain
pub fn propagate_chains(world: &mut World, events: &mut FrameEvents) {
    let radius = world.tuning.chain_radius;
    let radius_sq = radius * radius;

    // Index loop: children pushed during the pass are visited too
    let mut i = 0;
    while i < world.chains.len() {
        let origin = world.chains[i].origin;
        let mut relays: Vec<LightningChain> = Vec::new();
        let mut struck_any = false;

        for enemy in world.enemies.iter_mut() {
            if !enemy.is_alive() || world.chains[i].has_hit(enemy.id) {
                continue;
            }
            if enemy.pos.distance_squared(origin) >= radius_sq {
                continue;
            }

            let chain = &mut world.chains[i];
            chain.hit.push(enemy.id);
            struck_any = true;

            events.push(GameEvent::ChainArc { from: origin, to: enemy.pos });
            events.push(GameEvent::EnemyDamaged {
                id: enemy.id,
                amount: chain.damage,
                source: DamageSource::Lightning,
            });
            if enemy.take_damage(chain.damage) {
                events.push(GameEvent::EnemyKilled { id: enemy.id, pos: enemy.pos });
            }

            if chain.can_relay() {
                relays.push(LightningChain::new(enemy.pos, chain.damage, chain.chain_count - 1));
            }
        }

        let chain = &mut world.chains[i];
        chain.age += 1;
        if struck_any {
            chain.idle_passes = 0;
        } else {
            chain.idle_passes += 1;
        }

        if !relays.is_empty() {
            log::debug!("Chain at ({:.0}, {:.0}) relayed {} times", origin.x, origin.y, relays.len());
        }
        world.chains.extend(relays);
        i += 1;
    }

    let idle_limit = world.tuning.chain_idle_ticks;
    let max_age = world.tuning.chain_max_ticks;
    let before = world.chains.len();
    world
        .chains
        .retain(|c| c.idle_passes < idle_limit && c.age < max_age);
    let expired = before - world.chains.len();
    if expired > 0 {
        log::debug!("{} lightning chains expired", expired);
    }

    world.enemies.retain(|e| e.is_alive());
}

impl World {
    /// Start a new chain at `origin`
    pub(crate) fn start_chain(&mut self, origin: Vec2, damage: i32, chain_count: u32) {
        if chain_count == 0 {
            return;
        }
        self.chains.push(LightningChain::new(origin, damage, chain_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(3, Tuning::default())
    }

    fn health(world: &World, id: u32) -> Option<i32> {
        world.enemies().iter().find(|e| e.id == id).map(|e| e.health)
    }

    #[test]
    fn test_single_hop_hits_everything_in_range() {
        let mut world = world();
        let near = world.place_enemy(Vec2::new(150.0, 100.0));
        let near2 = world.place_enemy(Vec2::new(100.0, 250.0));
        let far = world.place_enemy(Vec2::new(500.0, 100.0));
        world.start_chain(Vec2::new(100.0, 100.0), 10, 1);

        let mut events = FrameEvents::default();
        propagate_chains(&mut world, &mut events);

        assert_eq!(health(&world, near), Some(40));
        assert_eq!(health(&world, near2), Some(40));
        assert_eq!(health(&world, far), Some(50));
        // Budget 1 never relays
        assert_eq!(world.chains().len(), 1);
        assert_eq!(world.chains()[0].hit.len(), 2);
    }

    #[test]
    fn test_relay_reaches_out_of_range_enemy() {
        let mut world = world();
        let a = world.place_enemy(Vec2::new(250.0, 100.0));
        let b = world.place_enemy(Vec2::new(420.0, 100.0));
        let c = world.place_enemy(Vec2::new(590.0, 100.0));
        world.start_chain(Vec2::new(100.0, 100.0), 10, 2);

        let mut events = FrameEvents::default();
        propagate_chains(&mut world, &mut events);

        // Struck by the root chain, then by its own relay
        assert_eq!(health(&world, a), Some(30));
        assert_eq!(health(&world, b), Some(40));
        // Third enemy needs a third hop
        assert_eq!(health(&world, c), Some(50));
        let arcs = events
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ChainArc { .. }))
            .count();
        assert_eq!(arcs, 3);
    }

    #[test]
    fn test_child_may_strike_enemy_parent_hit() {
        let mut world = world();
        let a = world.place_enemy(Vec2::new(150.0, 100.0));
        world.start_chain(Vec2::new(100.0, 100.0), 5, 2);

        let mut events = FrameEvents::default();
        propagate_chains(&mut world, &mut events);

        // Immunity is per chain instance: the child strikes `a` from its own position
        assert_eq!(health(&world, a), Some(40));
    }

    #[test]
    fn test_chain_never_restrikes_and_expires() {
        let mut world = world();
        let a = world.place_enemy(Vec2::new(150.0, 100.0));
        world.start_chain(Vec2::new(100.0, 100.0), 10, 1);

        let mut events = FrameEvents::default();
        propagate_chains(&mut world, &mut events);
        assert_eq!(world.chains().len(), 1);

        propagate_chains(&mut world, &mut events);
        assert_eq!(health(&world, a), Some(40));
        // Idle pass discards the chain
        assert!(world.chains().is_empty());
    }

    #[test]
    fn test_chain_kill_removes_enemy_once() {
        let mut world = world();
        let a = world.place_enemy(Vec2::new(150.0, 100.0));
        world.start_chain(Vec2::new(100.0, 100.0), 30, 1);
        world.start_chain(Vec2::new(100.0, 100.0), 30, 1);

        let mut events = FrameEvents::default();
        propagate_chains(&mut world, &mut events);

        assert_eq!(health(&world, a), None);
        assert_eq!(events.kills(), 1);
        assert_eq!(events.enemy_damage(), 60);
    }

    #[test]
    fn test_zero_budget_creates_nothing() {
        let mut world = world();
        world.start_chain(Vec2::ZERO, 10, 0);
        assert!(world.chains().is_empty());
    }

    proptest! {
        #[test]
        fn prop_chain_hit_set_is_distinct(
            positions in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..12),
            budget in 1u32..5,
            passes in 1usize..4,
        ) {
            let mut tuning = Tuning::default();
            tuning.chain_max_ticks = 100;
            tuning.chain_idle_ticks = 100;
            let mut world = World::new(0, tuning);
            for (x, y) in positions {
                world.place_enemy(Vec2::new(x, y));
            }
            world.start_chain(Vec2::new(400.0, 300.0), 1, budget);

            let mut events = FrameEvents::default();
            for _ in 0..passes {
                propagate_chains(&mut world, &mut events);
            }
            for chain in world.chains() {
                let mut ids = chain.hit.clone();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), chain.hit.len());
            }
        }
    }
}
