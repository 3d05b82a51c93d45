//! Upgrade shop
//!
//! Purchases are discrete events, not part of the tick. They stay available
//! while the simulation is paused.

use serde::{Deserialize, Serialize};

use super::state::{Turret, World};
use crate::tuning::Tuning;

/// Items on sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    Shield,
    HealthBoost,
    ShotgunUpgrade,
    Turret,
    LightningUpgrade,
}

impl ShopItem {
    /// Catalogue order
    pub const ALL: [ShopItem; 5] = [
        ShopItem::Shield,
        ShopItem::HealthBoost,
        ShopItem::ShotgunUpgrade,
        ShopItem::Turret,
        ShopItem::LightningUpgrade,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::Shield => "Blue Glowing Shield",
            ShopItem::HealthBoost => "Health Boost",
            ShopItem::ShotgunUpgrade => "Shotgun Upgrade",
            ShopItem::Turret => "Turret",
            ShopItem::LightningUpgrade => "Lightning Gun Upgrade",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShopItem::Shield => "Activates a protective blue glow",
            ShopItem::HealthBoost => "Increase player health by 50",
            ShopItem::ShotgunUpgrade => "Adds a pellet and boosts shot damage",
            ShopItem::Turret => "Spawns a turret that automatically shoots enemies",
            ShopItem::LightningUpgrade => "Increases chain count of lightning bolts",
        }
    }

    /// Look up an item by display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|item| item.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn price(&self, tuning: &Tuning) -> u32 {
        match self {
            ShopItem::Shield => tuning.shield_price,
            ShopItem::HealthBoost => tuning.health_boost_price,
            ShopItem::ShotgunUpgrade => tuning.shotgun_price,
            ShopItem::Turret => tuning.turret_price,
            ShopItem::LightningUpgrade => tuning.lightning_price,
        }
    }
}

/// One row of the shop as the UI should show it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopEntry {
    pub item: ShopItem,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u32,
    /// Current upgrade level (`None` for consumables)
    pub level: Option<u32>,
    pub affordable: bool,
}

impl World {
    /// Current catalogue with prices and owned levels
    pub fn shop_listing(&self) -> Vec<ShopEntry> {
        ShopItem::ALL
            .into_iter()
            .map(|item| {
                let price = item.price(&self.tuning);
                ShopEntry {
                    item,
                    name: item.name(),
                    description: item.description(),
                    price,
                    level: self.item_level(item),
                    affordable: self.currency >= price,
                }
            })
            .collect()
    }

    /// Owned level for an upgrade item
    pub fn item_level(&self, item: ShopItem) -> Option<u32> {
        match item {
            ShopItem::Shield => Some(self.player.shield_level),
            ShopItem::HealthBoost => None,
            ShopItem::ShotgunUpgrade => Some(self.player.shotgun_level),
            ShopItem::Turret => Some(self.player.turret_level),
            ShopItem::LightningUpgrade => Some(self.player.lightning_level),
        }
    }

    /// Try to buy `item`. On insufficient funds nothing changes and this returns false.
    pub fn purchase(&mut self, item: ShopItem) -> bool {
        let price = item.price(&self.tuning);
        if self.currency < price {
            log::warn!(
                "Cannot afford {} ({} < {})",
                item.name(),
                self.currency,
                price
            );
            return false;
        }
        self.currency -= price;

        match item {
            ShopItem::LightningUpgrade => {
                self.player.lightning_level += 1;
                log::info!("Lightning Gun Level: {}", self.player.lightning_level);
            }
            ShopItem::Shield => {
                self.player.shield_level += 1;
                log::info!("Shield Level: {}", self.player.shield_level);
            }
            ShopItem::HealthBoost => {
                let amount = self.tuning.health_boost_amount;
                self.player.heal(amount, self.tuning.max_health);
                log::info!("Health: {}", self.player.health);
            }
            ShopItem::ShotgunUpgrade => {
                self.player.shotgun_level += 1;
                // Bullets already in flight get the buff too
                let buff = self.tuning.shotgun_projectile_buff;
                for projectile in &mut self.projectiles {
                    projectile.damage += buff;
                }
                log::info!("Shotgun Level: {}", self.player.shotgun_level);
            }
            ShopItem::Turret => {
                self.buy_turret();
                log::info!("Turret Level: {}", self.player.turret_level);
            }
        }
        true
    }

    /// Place the turret, or upgrade the one already placed
    fn buy_turret(&mut self) {
        match self.turret.as_mut() {
            Some(turret) => {
                let level = turret.level + 1;
                turret.set_level(level, &self.tuning);
                log::debug!("Turret upgraded, interval {:.3}s", turret.interval);
            }
            None => {
                let pos = self.random_inset_point();
                let turret = Turret::new(pos, self.player.turret_level, &self.tuning);
                log::info!(
                    "Turret placed at ({:.0}, {:.0}), interval {:.3}s",
                    pos.x,
                    pos.y,
                    turret.interval
                );
                self.turret = Some(turret);
            }
        }
        self.player.turret_level += 1;
    }
}
