//! Wind force state machine
//!
//! Cycles `Break -> RampUp -> Active -> RampDown -> Break`. Ramps use the
//! remaining timer `T` as progress `1 - T/(T+1)` (up) and `T/(T+1)` (down),
//! which approaches its end value asymptotically rather than linearly.

use serde::{Deserialize, Serialize};

use super::ball::WindConfig;
use super::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindPhase {
    Break,
    RampUp,
    Active,
    RampDown,
}

impl WindPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindPhase::Break => "break",
            WindPhase::RampUp => "ramp_up",
            WindPhase::Active => "active",
            WindPhase::RampDown => "ramp_down",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindState {
    pub phase: WindPhase,
    /// Ticks left in the current phase
    pub timer: i32,
    /// +1 blows right, -1 blows left
    pub direction: f32,
    /// Signed force for this tick
    pub force: f32,
    /// Signed force the ramp-up heads toward
    pub target_force: f32,
    /// Signed force the ramp-down starts from
    pub start_force: f32,
    pub ramp_progress: f32,
    /// Length of the next active phase
    pub burst_duration: i32,
    /// True from ramp-up until the ramp-down ends
    pub blowing: bool,
}

/// `floor(min + r * (max - min))`
fn draw_duration(min: u32, max: u32, rng: &mut dyn RandomSource) -> i32 {
    rng.range(min as f32, max as f32).floor() as i32
}

impl WindState {
    pub fn new(config: &WindConfig, rng: &mut dyn RandomSource) -> Self {
        let direction = rng.sign();
        let timer = draw_duration(config.min_break, config.max_break, rng);
        Self {
            phase: WindPhase::Break,
            timer,
            direction,
            force: 0.0,
            target_force: 0.0,
            start_force: 0.0,
            ramp_progress: 0.0,
            burst_duration: 0,
            blowing: false,
        }
    }

    /// Advance one tick
    pub fn update(&mut self, config: &WindConfig, rng: &mut dyn RandomSource) {
        if !config.enabled {
            self.force = 0.0;
            self.blowing = false;
            return;
        }

        self.timer -= 1;

        match self.phase {
            WindPhase::Break => {
                if self.timer <= 0 {
                    self.phase = WindPhase::RampUp;
                    self.ramp_progress = 0.0;
                    self.timer = draw_duration(config.ramp_up_min, config.ramp_up_max, rng);
                    self.direction = rng.sign();
                    self.burst_duration = draw_duration(config.min_burst, config.max_burst, rng);
                    let magnitude = rng.range(config.min_force, config.max_force);
                    self.target_force = magnitude * self.direction;
                    log::debug!(
                        "Wind ramping up: target={:.3} ramp={} burst={}",
                        self.target_force,
                        self.timer,
                        self.burst_duration
                    );
                }
            }
            WindPhase::RampUp => {
                let remaining = self.timer as f32;
                self.ramp_progress = 1.0 - remaining / (remaining + 1.0);
                self.force = self.ramp_progress * self.target_force;
                self.blowing = true;

                if self.timer <= 0 {
                    self.phase = WindPhase::Active;
                    self.timer = self.burst_duration;
                    self.force = self.target_force;
                }
            }
            WindPhase::Active => {
                if self.timer <= 0 {
                    self.phase = WindPhase::RampDown;
                    self.ramp_progress = 1.0;
                    self.start_force = self.force;
                    self.timer = draw_duration(config.ramp_down_min, config.ramp_down_max, rng);
                }
            }
            WindPhase::RampDown => {
                let remaining = self.timer as f32;
                self.ramp_progress = remaining / (remaining + 1.0);
                self.force = self.ramp_progress * self.start_force;

                if self.timer <= 0 {
                    self.phase = WindPhase::Break;
                    self.blowing = false;
                    self.force = 0.0;
                    self.timer = draw_duration(config.min_break, config.max_break, rng);
                    self.target_force = 0.0;
                    self.start_force = 0.0;
                    log::debug!("Wind calm for {} ticks", self.timer);
                }
            }
        }
    }

    /// How far through its ramp the gust is, in [0, 1]
    pub fn strength(&self) -> f32 {
        let ratio = match self.phase {
            WindPhase::Break => 0.0,
            WindPhase::Active => 1.0,
            WindPhase::RampUp if self.target_force != 0.0 => self.force.abs() / self.target_force.abs(),
            WindPhase::RampDown if self.start_force != 0.0 => self.force.abs() / self.start_force.abs(),
            _ => 0.0,
        };
        ratio.clamp(0.0, 1.0)
    }

    /// Velocity change this tick's wind applies to the ball
    pub fn applied_force(&self, config: &WindConfig, on_ground: bool) -> f32 {
        if !config.enabled {
            return 0.0;
        }
        if on_ground {
            if config.affects_grounded { self.force } else { 0.0 }
        } else if config.affects_air {
            self.force * config.air_multiplier
        } else {
            0.0
        }
    }
}
