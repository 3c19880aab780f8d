//! Fixed-tick simulation module
//!
//! All gameplay logic lives here:
//! - One tick per call, all speeds in pixels per tick
//! - Randomness only through an injectable [`RandomSource`]
//! - Phase order inside a tick is fixed (see [`tick`])
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod lifecycle;
pub mod physics;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wind;

pub use ball::{BallConfig, BallKind, UpgradeDef, UpgradeSet, UpgradeState, resolve_config};
pub use difficulty::{Difficulty, Multipliers};
pub use lifecycle::FadeSweep;
pub use rng::{RandomSource, SequenceSource};
pub use snapshot::Snapshot;
pub use state::{
    Ball, Coin, Floor, FloorType, GameEvent, GamePhase, GameRunState, Side, WallBoost, World,
};
pub use tick::{ControlFlags, TickInput, tick};
pub use wind::{WindPhase, WindState};
