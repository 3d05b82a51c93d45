//! Frame-step simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform code:
//! - Elapsed time is always passed in, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)

pub mod bounds;
pub mod chain;
pub mod collision;
pub mod events;
pub mod shop;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bounds::Aabb;
pub use chain::propagate_chains;
pub use collision::resolve_collisions;
pub use events::{DamageSource, FrameEvents, GameEvent};
pub use shop::{ShopEntry, ShopItem};
pub use state::{
    Enemy, GamePhase, HeldKeys, LightningChain, Player, PowerUp, Projectile, Turret, World,
};
pub use tick::{FireMode, TickInput, tick};
