//! Lightning Arena headless runner
//!
//! Drives the simulation with a scripted pilot and logs the event stream.
//! A real front end replaces this with its own input sampling and drawing.
//!
//! Usage: `lightning-arena [TUNING_JSON] [TICKS] [SEED]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) if path != "-" => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Cannot load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        _ => lightning_arena::Tuning::default(),
    };
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    log::info!("Lightning Arena (headless) starting, seed {seed}, {ticks} ticks");
    let summary = pilot::run(seed, tuning, ticks);
    println!("{summary}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; the front end drives `sim::tick` itself
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<lightning_arena::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(lightning_arena::Tuning::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod pilot {
    use std::fmt;

    use glam::Vec2;
    use lightning_arena::Tuning;
    use lightning_arena::consts::SIM_DT;
    use lightning_arena::sim::{GameEvent, HeldKeys, ShopItem, TickInput, World, tick};

    /// Ticks between shots
    const FIRE_EVERY: u64 = 20;
    /// Ticks spent on each leg of the strafing pattern
    const LEG_TICKS: u64 = 90;
    /// Shop preference, most wanted first
    const WISHLIST: [ShopItem; 4] = [
        ShopItem::Turret,
        ShopItem::ShotgunUpgrade,
        ShopItem::LightningUpgrade,
        ShopItem::HealthBoost,
    ];

    #[derive(Debug, Default)]
    pub struct Summary {
        ticks: u64,
        kills: usize,
        hits_taken: usize,
        purchases: usize,
        level: u32,
        currency: u32,
        health: i32,
        defeated: bool,
    }

    impl fmt::Display for Summary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "ticks={} kills={} hits_taken={} purchases={} level={} currency={} health={}{}",
                self.ticks,
                self.kills,
                self.hits_taken,
                self.purchases,
                self.level,
                self.currency,
                self.health,
                if self.defeated { " (defeated)" } else { "" }
            )
        }
    }

    /// Strafe around the arena in a box, clockwise
    fn strafe_keys(t: u64) -> HeldKeys {
        match (t / LEG_TICKS) % 4 {
            0 => HeldKeys { right: true, ..Default::default() },
            1 => HeldKeys { down: true, ..Default::default() },
            2 => HeldKeys { left: true, ..Default::default() },
            _ => HeldKeys { up: true, ..Default::default() },
        }
    }

    fn nearest_enemy(world: &World) -> Option<Vec2> {
        let me = world.player().pos;
        world
            .enemies()
            .iter()
            .map(|e| e.pos)
            .min_by(|a, b| {
                a.distance_squared(me)
                    .partial_cmp(&b.distance_squared(me))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn run(seed: u64, tuning: Tuning, ticks: u64) -> Summary {
        let mut world = World::new(seed, tuning);
        let mut summary = Summary::default();

        for t in 0..ticks {
            let input = TickInput {
                keys: strafe_keys(t),
                pointer: nearest_enemy(&world),
            };
            let events = tick(&mut world, &input, SIM_DT);
            summary.ticks += 1;
            summary.kills += events.kills();

            for event in &events.events {
                match event {
                    GameEvent::PlayerDamaged { health, .. } => {
                        summary.hits_taken += 1;
                        log::debug!("Player hit, health {}", health);
                    }
                    GameEvent::LevelUp { level } => log::info!("Reached level {}", level),
                    GameEvent::PlayerDefeated => summary.defeated = true,
                    _ => {}
                }
            }
            if summary.defeated {
                log::info!("Run over at tick {}", t);
                break;
            }

            if t % FIRE_EVERY == 0 && input.pointer.is_some() {
                let mode = world.preferred_fire_mode();
                world.fire(mode);
            }

            // Pause to shop whenever something on the wishlist is affordable
            if let Some(item) = WISHLIST
                .into_iter()
                .find(|item| world.currency() >= item.price(world.tuning()))
            {
                world.set_paused(true);
                if world.purchase(item) {
                    summary.purchases += 1;
                }
                world.set_paused(false);
            }
        }

        summary.level = world.level();
        summary.currency = world.currency();
        summary.health = world.player().health;
        summary
    }
}
