//! Ball archetypes, their physics profiles and the upgrade catalogue
//!
//! A run's [`BallConfig`] is derived, never stored: the archetype's base
//! profile with each active upgrade folded over it in catalogue order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PersistError};

/// Selectable ball types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallKind {
    #[default]
    Standard,
    Rubber,
    Beach,
    Golf,
}

impl BallKind {
    pub const ALL: [BallKind; 4] = [
        BallKind::Standard,
        BallKind::Rubber,
        BallKind::Beach,
        BallKind::Golf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BallKind::Standard => "standard",
            BallKind::Rubber => "rubber",
            BallKind::Beach => "beach",
            BallKind::Golf => "golf",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BallKind::Standard => "Standard",
            BallKind::Rubber => "Gum",
            BallKind::Beach => "Beach",
            BallKind::Golf => "Golf",
        }
    }

    /// Coins needed to unlock this ball in the shop
    pub fn unlock_price(&self) -> u64 {
        match self {
            BallKind::Standard => 0,
            BallKind::Rubber => 50,
            BallKind::Beach => 100,
            BallKind::Golf => 150,
        }
    }

    /// Upgrades this ball can buy, in the order they are applied
    pub fn upgrades(&self) -> &'static [UpgradeDef] {
        match self {
            BallKind::Standard => &STANDARD_UPGRADES,
            BallKind::Rubber => &RUBBER_UPGRADES,
            BallKind::Beach => &BEACH_UPGRADES,
            BallKind::Golf => &GOLF_UPGRADES,
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&'static UpgradeDef> {
        self.upgrades().iter().find(|u| u.id == id)
    }

    pub fn base_config(&self) -> BallConfig {
        let standard = BallConfig::default();
        match self {
            BallKind::Standard => standard,
            BallKind::Rubber => BallConfig {
                radius: 12.0,
                color: "#ff4a4a",
                acceleration: 0.3,
                max_speed: 10.0,
                ground_friction: 0.92,
                air_resistance: 0.98,
                gravity: 1.0,
                base_jump_force: -20.0,
                max_jump_bonus: -12.0,
                wall_bounce_factor: 1.2,
                min_bounce_velocity: 0.2,
                wall_boost: WallBoostConfig {
                    enabled: true,
                    min_velocity: 1.0,
                    max_distance: 50.0,
                    velocity_x: 8.0,
                    velocity_y: -20.0,
                },
                ..standard
            },
            BallKind::Beach => BallConfig {
                radius: 20.0,
                color: "#efdc00",
                acceleration: 0.4,
                max_speed: 6.0,
                ground_friction: 0.98,
                air_resistance: 0.96,
                gravity: 0.3,
                base_jump_force: -10.0,
                max_jump_bonus: -10.0,
                wall_bounce_factor: 0.5,
                min_bounce_velocity: 0.7,
                wall_boost: WallBoostConfig {
                    enabled: true,
                    min_velocity: 0.5,
                    max_distance: 100.0,
                    velocity_x: 8.0,
                    velocity_y: -8.0,
                },
                wind: WindConfig {
                    enabled: true,
                    min_force: 0.08,
                    max_force: 0.65,
                    min_burst: 10,
                    max_burst: 70,
                    min_break: 30,
                    max_break: 180,
                    ramp_up_min: 5,
                    ramp_up_max: 20,
                    ramp_down_min: 5,
                    ramp_down_max: 20,
                    ..WindConfig::default()
                },
                ..standard
            },
            BallKind::Golf => BallConfig {
                radius: 5.0,
                color: "#ffffff",
                acceleration: 0.3,
                max_speed: 14.0,
                ground_friction: 0.98,
                air_resistance: 0.99,
                base_jump_force: -15.0,
                max_jump_bonus: -15.0,
                cannon: CannonConfig {
                    can_use: true,
                    boost_force: -50.0,
                },
                ..standard
            },
        }
    }
}

impl fmt::Display for BallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BallKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(BallKind::Standard),
            "rubber" | "gum" => Ok(BallKind::Rubber),
            "beach" => Ok(BallKind::Beach),
            "golf" => Ok(BallKind::Golf),
            _ => Err(ConfigError::UnknownBall(s.to_string())),
        }
    }
}

/// Wall boost parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBoostConfig {
    pub enabled: bool,
    /// Rebound speed needed to arm a boost
    pub min_velocity: f32,
    /// Boost disarms once the ball drifts this far from the wall
    pub max_distance: f32,
    /// Horizontal speed away from the wall on activation
    pub velocity_x: f32,
    /// Vertical kick added on activation (negative = up)
    pub velocity_y: f32,
}

/// Wind susceptibility parameters (durations in ticks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    pub enabled: bool,
    pub min_force: f32,
    pub max_force: f32,
    pub min_burst: u32,
    pub max_burst: u32,
    pub min_break: u32,
    pub max_break: u32,
    pub ramp_up_min: u32,
    pub ramp_up_max: u32,
    pub ramp_down_min: u32,
    pub ramp_down_max: u32,
    pub affects_grounded: bool,
    pub affects_air: bool,
    pub air_multiplier: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_force: 0.05,
            max_force: 0.3,
            min_burst: 180,
            max_burst: 300,
            min_break: 120,
            max_break: 240,
            ramp_up_min: 30,
            ramp_up_max: 60,
            ramp_down_min: 30,
            ramp_down_max: 60,
            affects_grounded: true,
            affects_air: true,
            air_multiplier: 2.0,
        }
    }
}

/// Cannon interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannonConfig {
    /// Cannons launch this ball; otherwise they act as a ledge
    pub can_use: bool,
    /// Vertical velocity on launch (negative = up)
    pub boost_force: f32,
}

/// Coin magnet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MagnetConfig {
    pub enabled: bool,
    pub range: f32,
    pub force: f32,
}

/// Fully resolved physics profile for the active ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallConfig {
    pub radius: f32,
    pub color: &'static str,
    pub acceleration: f32,
    pub max_speed: f32,
    pub ground_friction: f32,
    pub air_resistance: f32,
    pub gravity: f32,
    /// Jump velocity at rest (negative = up)
    pub base_jump_force: f32,
    /// Extra jump velocity at full horizontal speed
    pub max_jump_bonus: f32,
    pub wall_bounce_factor: f32,
    pub min_bounce_velocity: f32,
    pub wall_boost: WallBoostConfig,
    pub wind: WindConfig,
    pub cannon: CannonConfig,
    pub magnet: MagnetConfig,
}

/// The standard ball's profile
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 15.0,
            color: "#4a9eff",
            acceleration: 0.2,
            max_speed: 8.0,
            ground_friction: 0.96,
            air_resistance: 0.98,
            gravity: 0.5,
            base_jump_force: -12.0,
            max_jump_bonus: -10.0,
            wall_bounce_factor: 0.7,
            min_bounce_velocity: 0.5,
            wall_boost: WallBoostConfig {
                enabled: true,
                min_velocity: 3.0,
                max_distance: 30.0,
                velocity_x: 8.0,
                velocity_y: -8.0,
            },
            wind: WindConfig::default(),
            cannon: CannonConfig {
                can_use: false,
                boost_force: -50.0,
            },
            magnet: MagnetConfig::default(),
        }
    }
}

/// A purchasable upgrade and its effect on the config
#[derive(Debug)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_price: u64,
    pub max_level: u32,
    pub effect: fn(BallConfig, u32) -> BallConfig,
}

impl UpgradeDef {
    pub fn apply(&self, config: BallConfig, level: u32) -> BallConfig {
        (self.effect)(config, level)
    }

    /// Price of buying the next level when currently at `level`
    pub fn price(&self, level: u32) -> u64 {
        upgrade_price(self.base_price, level)
    }
}

pub fn upgrade_price(base_price: u64, level: u32) -> u64 {
    base_price + level as u64 * 50
}

/// Purchased state of one upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradeState {
    pub level: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Upgrade id → state for one ball
pub type UpgradeSet = BTreeMap<String, UpgradeState>;

/// Decode an upgrade set from the host's JSON (`{"speed": {"level": 2}}`)
pub fn upgrades_from_json(json: &str) -> Result<UpgradeSet, PersistError> {
    Ok(serde_json::from_str(json)?)
}

/// Resolve the effective config for a ball and its purchased upgrades.
///
/// Upgrades apply in catalogue order; level 0, inactive and unknown ids are
/// skipped without error.
pub fn resolve_config(kind: BallKind, upgrades: &UpgradeSet) -> BallConfig {
    kind.upgrades()
        .iter()
        .fold(kind.base_config(), |config, def| match upgrades.get(def.id) {
            Some(state) if state.level > 0 && state.active => def.apply(config, state.level),
            _ => config,
        })
}

fn speed_effect(c: BallConfig, _level: u32) -> BallConfig {
    BallConfig {
        acceleration: c.acceleration + 0.1,
        ..c
    }
}

fn gum_speed_effect(c: BallConfig, _level: u32) -> BallConfig {
    BallConfig {
        acceleration: c.acceleration + 0.05,
        ..c
    }
}

fn jump_effect(c: BallConfig, level: u32) -> BallConfig {
    let multiplier = 1.0 + level as f32 * 0.2;
    BallConfig {
        base_jump_force: c.base_jump_force * multiplier,
        max_jump_bonus: c.max_jump_bonus * multiplier,
        ..c
    }
}

fn coin_magnet_effect(c: BallConfig, level: u32) -> BallConfig {
    let mut magnet = c.magnet;
    if level >= 1 {
        magnet = MagnetConfig {
            enabled: true,
            range: 250.0,
            force: 2.0,
        };
    }
    if level >= 2 {
        magnet.range = 350.0;
        magnet.force = 5.0;
    }
    if level >= 3 {
        magnet.range = 500.0;
        magnet.force = 10.0;
    }
    BallConfig { magnet, ..c }
}

fn wall_boost_effect(c: BallConfig, _level: u32) -> BallConfig {
    BallConfig {
        wall_boost: WallBoostConfig {
            velocity_x: c.wall_boost.velocity_x + 2.0,
            velocity_y: c.wall_boost.velocity_y + 2.0,
            ..c.wall_boost
        },
        ..c
    }
}

fn wind_resistance_effect(c: BallConfig, level: u32) -> BallConfig {
    let resistance = 1.0 - level as f32 * 0.15;
    BallConfig {
        wind: WindConfig {
            max_force: c.wind.max_force * resistance,
            min_force: c.wind.min_force * resistance,
            ..c.wind
        },
        ..c
    }
}

fn cannon_boost_effect(c: BallConfig, level: u32) -> BallConfig {
    let multiplier = 1.0 + level as f32 * 0.25;
    BallConfig {
        cannon: CannonConfig {
            boost_force: c.cannon.boost_force * multiplier,
            ..c.cannon
        },
        ..c
    }
}

const SPEED: UpgradeDef = UpgradeDef {
    id: "speed",
    name: "Speed",
    description: "Increases ball acceleration",
    base_price: 100,
    max_level: 3,
    effect: speed_effect,
};

const JUMP: UpgradeDef = UpgradeDef {
    id: "jump",
    name: "Jump",
    description: "Increases jump force",
    base_price: 150,
    max_level: 3,
    effect: jump_effect,
};

static STANDARD_UPGRADES: [UpgradeDef; 3] = [
    SPEED,
    JUMP,
    UpgradeDef {
        id: "coin_magnet",
        name: "Coin Magnet",
        description: "Attracts coins from a distance",
        base_price: 200,
        max_level: 3,
        effect: coin_magnet_effect,
    },
];

static RUBBER_UPGRADES: [UpgradeDef; 3] = [
    UpgradeDef {
        effect: gum_speed_effect,
        ..SPEED
    },
    JUMP,
    UpgradeDef {
        id: "wall_boost",
        name: "Wall Boost",
        description: "Increases wall bounce boost value",
        base_price: 200,
        max_level: 3,
        effect: wall_boost_effect,
    },
];

static BEACH_UPGRADES: [UpgradeDef; 3] = [
    SPEED,
    JUMP,
    UpgradeDef {
        id: "wind_resistance",
        name: "Wind Resistance",
        description: "Reduces the effect of wind on the ball",
        base_price: 200,
        max_level: 3,
        effect: wind_resistance_effect,
    },
];

static GOLF_UPGRADES: [UpgradeDef; 3] = [
    SPEED,
    JUMP,
    UpgradeDef {
        id: "cannon_boost",
        name: "Cannon Boost",
        description: "Increases cannon boost value",
        base_price: 200,
        max_level: 3,
        effect: cannon_boost_effect,
    },
];
