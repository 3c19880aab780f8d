//! Error types for the fallible edges of the game
//!
//! The simulation tick itself never fails; these cover parsing host input
//! and decoding persisted data.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown ball type: {0}")]
    UnknownBall(String),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable")]
    StorageUnavailable,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Not enough coins: need {price}, have {available}")]
    NotEnoughCoins { price: u64, available: u64 },

    #[error("Ball {0} is locked")]
    BallLocked(String),

    #[error("Ball {0} is already unlocked")]
    AlreadyUnlocked(String),

    #[error("Unknown upgrade {upgrade} for ball {ball}")]
    UnknownUpgrade { ball: String, upgrade: String },

    #[error("Upgrade {0} is already at max level")]
    MaxLevel(String),
}
