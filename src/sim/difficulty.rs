//! Difficulty controller
//!
//! Difficulty switches on once the best floor of the run passes a threshold
//! and then grows linearly with every floor beyond it.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Per-mechanic multipliers, all exactly 1.0 while difficulty is inactive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub moving_speed: f32,
    pub moving_range: f32,
    pub shrinking_min_width: f32,
    pub shrinking_speed: f32,
    pub shrinking_delay: f32,
    pub breaking_fade_speed: f32,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            moving_speed: 1.0,
            moving_range: 1.0,
            shrinking_min_width: 1.0,
            shrinking_speed: 1.0,
            shrinking_delay: 1.0,
            breaking_fade_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub active: bool,
    /// 1.0 at the activation floor, +0.01 per floor after
    pub level: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            active: false,
            level: 1.0,
        }
    }
}

impl Difficulty {
    /// Recompute from the highest floor reached. Once active it stays active.
    pub fn update(&mut self, max_floor_reached: u32) {
        if !self.active && max_floor_reached >= DIFFICULTY_START_AT_SCORE {
            self.active = true;
            log::info!("Difficulty scaling active at floor {}", max_floor_reached);
        }
        if self.active {
            let past = max_floor_reached.saturating_sub(DIFFICULTY_START_AT_SCORE);
            self.level = 1.0 + past as f32 * DIFFICULTY_PER_FLOOR;
        }
    }

    /// `1 + (level - 1) * (base - 1)`: equal to 1.0 at level 1, linear after
    pub fn scale(&self, base: f32) -> f32 {
        1.0 + (self.level - 1.0) * (base - 1.0)
    }

    pub fn multipliers(&self) -> Multipliers {
        if !self.active {
            return Multipliers::default();
        }
        Multipliers {
            moving_speed: self.scale(DIFFICULTY_MOVING_SPEED_MULTIPLIER),
            moving_range: self.scale(DIFFICULTY_MOVING_RANGE_MULTIPLIER),
            shrinking_min_width: self.scale(DIFFICULTY_SHRINKING_MIN_WIDTH_MULTIPLIER),
            shrinking_speed: self.scale(DIFFICULTY_SHRINKING_SPEED_MULTIPLIER),
            shrinking_delay: self.scale(DIFFICULTY_SHRINKING_DELAY_MULTIPLIER),
            breaking_fade_speed: self.scale(DIFFICULTY_BREAKING_FADE_SPEED_MULTIPLIER),
        }
    }

    /// Factor applied to the moving/shrinking/breaking type chances
    pub fn type_chance_scale(&self) -> f32 {
        self.scale(DIFFICULTY_TYPE_CHANCE_MULTIPLIER)
    }

    /// Factor applied to the fade sweep's alpha rate
    pub fn fade_speed_scale(&self) -> f32 {
        if self.active {
            (DIFFICULTY_FLOOR_FADE_MULTIPLIER * self.level).min(DIFFICULTY_MAX_FADE_MULTIPLIER)
        } else {
            1.0
        }
    }
}
