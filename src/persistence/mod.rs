//! Cross-run progress: best score, coin bank, unlocked balls and upgrades
//!
//! The simulation never touches storage. The host drains [`GameEvent`]s
//! after each frame, folds them in here and saves when something changed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{PersistError, PurchaseError};
use crate::sim::{BallConfig, BallKind, GameEvent, UpgradeSet, UpgradeState, resolve_config};

/// Everything that outlives a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub best_score: u32,
    pub total_coins: u64,
    pub selected_ball: BallKind,
    pub unlocked_balls: BTreeSet<BallKind>,
    pub upgrades: BTreeMap<BallKind, UpgradeSet>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            best_score: 0,
            total_coins: 0,
            selected_ball: BallKind::Standard,
            unlocked_balls: BTreeSet::from([BallKind::Standard]),
            upgrades: BTreeMap::new(),
        }
    }
}

impl Progress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tower_climb_progress";

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let mut progress: Progress = serde_json::from_str(json)?;
        // The starter ball can never be lost
        progress.unlocked_balls.insert(BallKind::Standard);
        if !progress.is_unlocked(progress.selected_ball) {
            progress.selected_ball = BallKind::Standard;
        }
        Ok(progress)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Fold one simulation event; returns true if anything worth saving changed
    pub fn apply_event(&mut self, event: &GameEvent) -> bool {
        match *event {
            GameEvent::NewBestScore { best_score } => self.raise_best(best_score),
            GameEvent::RunEnded {
                score,
                coins_earned,
            } => {
                self.total_coins += coins_earned as u64;
                self.raise_best(score);
                log::info!(
                    "Run ended at floor {}, banked {} coins ({} total)",
                    score,
                    coins_earned,
                    self.total_coins
                );
                true
            }
            _ => false,
        }
    }

    /// Fold a frame's worth of events
    pub fn apply_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) -> bool {
        events
            .into_iter()
            .fold(false, |changed, event| self.apply_event(event) || changed)
    }

    fn raise_best(&mut self, score: u32) -> bool {
        if score <= self.best_score {
            return false;
        }
        self.best_score = score;
        true
    }

    pub fn is_unlocked(&self, kind: BallKind) -> bool {
        self.unlocked_balls.contains(&kind)
    }

    fn spend(&mut self, price: u64) -> Result<(), PurchaseError> {
        if self.total_coins < price {
            return Err(PurchaseError::NotEnoughCoins {
                price,
                available: self.total_coins,
            });
        }
        self.total_coins -= price;
        Ok(())
    }

    pub fn unlock_ball(&mut self, kind: BallKind) -> Result<(), PurchaseError> {
        if self.is_unlocked(kind) {
            return Err(PurchaseError::AlreadyUnlocked(kind.to_string()));
        }
        self.spend(kind.unlock_price())?;
        self.unlocked_balls.insert(kind);
        log::info!("Unlocked {}", kind.display_name());
        Ok(())
    }

    /// Select a ball for the next run; locked balls are refused
    pub fn select_ball(&mut self, kind: BallKind) -> Result<(), PurchaseError> {
        if !self.is_unlocked(kind) {
            return Err(PurchaseError::BallLocked(kind.to_string()));
        }
        self.selected_ball = kind;
        Ok(())
    }

    /// Buy the next level of an upgrade; returns the new level
    ///
    /// A freshly bought upgrade is switched on.
    pub fn purchase_upgrade(&mut self, kind: BallKind, id: &str) -> Result<u32, PurchaseError> {
        if !self.is_unlocked(kind) {
            return Err(PurchaseError::BallLocked(kind.to_string()));
        }
        let def = kind.upgrade(id).ok_or_else(|| PurchaseError::UnknownUpgrade {
            ball: kind.to_string(),
            upgrade: id.to_string(),
        })?;

        let current = self.upgrade_state(kind, id);
        if current.level >= def.max_level {
            return Err(PurchaseError::MaxLevel(id.to_string()));
        }
        self.spend(def.price(current.level))?;

        let state = UpgradeState {
            level: current.level + 1,
            active: true,
        };
        self.upgrades
            .entry(kind)
            .or_default()
            .insert(def.id.to_string(), state);
        log::info!("{} upgraded {} to level {}", kind.display_name(), def.name, state.level);
        Ok(state.level)
    }

    /// Switch a purchased upgrade on or off; returns false if it was never bought
    pub fn set_upgrade_active(&mut self, kind: BallKind, id: &str, active: bool) -> bool {
        match self.upgrades.get_mut(&kind).and_then(|set| set.get_mut(id)) {
            Some(state) if state.level > 0 => {
                state.active = active;
                true
            }
            _ => false,
        }
    }

    pub fn upgrade_state(&self, kind: BallKind, id: &str) -> UpgradeState {
        self.upgrades
            .get(&kind)
            .and_then(|set| set.get(id))
            .copied()
            .unwrap_or_default()
    }

    pub fn upgrades_for(&self, kind: BallKind) -> UpgradeSet {
        self.upgrades.get(&kind).cloned().unwrap_or_default()
    }

    /// Effective physics profile for a ball with its purchased upgrades
    pub fn config_for(&self, kind: BallKind) -> BallConfig {
        match self.upgrades.get(&kind) {
            Some(set) => resolve_config(kind, set),
            None => kind.base_config(),
        }
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(progress)) => {
                log::info!(
                    "Loaded progress: best {}, {} coins",
                    progress.best_score,
                    progress.total_coins
                );
                progress
            }
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load progress: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn try_load() -> Result<Option<Self>, PersistError> {
        let storage = local_storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json).map(Some),
            _ => Ok(None),
        }
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let result = local_storage().and_then(|storage| {
            let json = self.to_json()?;
            storage
                .set_item(Self::STORAGE_KEY, &json)
                .map_err(|_| PersistError::StorageUnavailable)
        });
        if let Err(e) = result {
            log::warn!("Could not save progress: {}", e);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, PersistError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(PersistError::StorageUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich(coins: u64) -> Progress {
        Progress {
            total_coins: coins,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_has_standard_unlocked() {
        let progress = Progress::default();
        assert!(progress.is_unlocked(BallKind::Standard));
        assert!(!progress.is_unlocked(BallKind::Golf));
        assert_eq!(progress.selected_ball, BallKind::Standard);
    }

    #[test]
    fn test_best_score_only_rises() {
        let mut progress = Progress::default();
        assert!(progress.apply_event(&GameEvent::NewBestScore { best_score: 7 }));
        assert!(!progress.apply_event(&GameEvent::NewBestScore { best_score: 5 }));
        assert_eq!(progress.best_score, 7);
    }

    #[test]
    fn test_run_end_banks_coins() {
        let mut progress = rich(10);
        let events = [
            GameEvent::CoinCollected { coin_id: 1, total: 1 },
            GameEvent::NewBestScore { best_score: 3 },
            GameEvent::RunEnded {
                score: 4,
                coins_earned: 6,
            },
        ];
        assert!(progress.apply_events(&events));
        assert_eq!(progress.total_coins, 16);
        assert_eq!(progress.best_score, 4);
    }

    #[test]
    fn test_coin_events_alone_do_not_save() {
        let mut progress = Progress::default();
        let events = [GameEvent::CoinCollected { coin_id: 1, total: 1 }];
        assert!(!progress.apply_events(&events));
        assert_eq!(progress.total_coins, 0);
    }

    #[test]
    fn test_unlock_ball() {
        let mut progress = rich(60);
        assert_eq!(
            progress.unlock_ball(BallKind::Beach),
            Err(PurchaseError::NotEnoughCoins {
                price: 100,
                available: 60
            })
        );
        progress.unlock_ball(BallKind::Rubber).unwrap();
        assert_eq!(progress.total_coins, 10);
        assert!(progress.is_unlocked(BallKind::Rubber));
        assert_eq!(
            progress.unlock_ball(BallKind::Rubber),
            Err(PurchaseError::AlreadyUnlocked("rubber".to_string()))
        );
    }

    #[test]
    fn test_select_locked_ball_refused() {
        let mut progress = Progress::default();
        assert!(progress.select_ball(BallKind::Golf).is_err());
        assert_eq!(progress.selected_ball, BallKind::Standard);
    }

    #[test]
    fn test_purchase_upgrade_levels_and_prices() {
        let mut progress = rich(1000);
        let def = BallKind::Standard.upgrade("speed").unwrap();
        let base = def.base_price;

        assert_eq!(progress.purchase_upgrade(BallKind::Standard, "speed"), Ok(1));
        assert_eq!(progress.total_coins, 1000 - base);
        assert_eq!(progress.purchase_upgrade(BallKind::Standard, "speed"), Ok(2));
        assert_eq!(progress.total_coins, 1000 - base - (base + 50));

        let state = progress.upgrade_state(BallKind::Standard, "speed");
        assert_eq!(state.level, 2);
        assert!(state.active);
    }

    #[test]
    fn test_purchase_stops_at_max_level() {
        let mut progress = rich(10_000);
        let max = BallKind::Standard.upgrade("jump").unwrap().max_level;
        for _ in 0..max {
            progress.purchase_upgrade(BallKind::Standard, "jump").unwrap();
        }
        assert_eq!(
            progress.purchase_upgrade(BallKind::Standard, "jump"),
            Err(PurchaseError::MaxLevel("jump".to_string()))
        );
    }

    #[test]
    fn test_purchase_rejections() {
        let mut progress = rich(10_000);
        assert!(matches!(
            progress.purchase_upgrade(BallKind::Golf, "speed"),
            Err(PurchaseError::BallLocked(_))
        ));
        assert!(matches!(
            progress.purchase_upgrade(BallKind::Standard, "wall_boost"),
            Err(PurchaseError::UnknownUpgrade { .. })
        ));
        assert_eq!(progress.total_coins, 10_000);
    }

    #[test]
    fn test_config_reflects_active_upgrades() {
        let mut progress = rich(1000);
        let base = BallKind::Standard.base_config();
        progress.purchase_upgrade(BallKind::Standard, "speed").unwrap();
        assert!(progress.config_for(BallKind::Standard).acceleration > base.acceleration);

        assert!(progress.set_upgrade_active(BallKind::Standard, "speed", false));
        assert_eq!(progress.config_for(BallKind::Standard), base);
        assert!(!progress.set_upgrade_active(BallKind::Standard, "jump", true));
    }

    #[test]
    fn test_json_round_trip_and_repair() {
        let mut progress = rich(500);
        progress.unlock_ball(BallKind::Golf).unwrap();
        progress.purchase_upgrade(BallKind::Golf, "cannon_boost").unwrap();
        let json = progress.to_json().unwrap();
        assert_eq!(Progress::from_json(&json).unwrap(), progress);

        let repaired =
            Progress::from_json(r#"{"best_score":9,"unlocked_balls":[],"selected_ball":"golf"}"#)
                .unwrap();
        assert_eq!(repaired.best_score, 9);
        assert!(repaired.is_unlocked(BallKind::Standard));
        assert_eq!(repaired.selected_ball, BallKind::Standard);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Progress::from_json("{not json"),
            Err(PersistError::Json(_))
        ));
    }
}
