//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, touch halves, device tilt)
//! - The fixed-timestep frame driver
//! - The wasm entry point and its JS-facing handle

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputTracker, Key};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{World, tick};

/// Longest wall-clock gap one frame may catch up on
const MAX_FRAME_DT: f32 = 0.1;

/// Runs simulation ticks at a fixed rate from variable frame times
#[derive(Debug, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp, e.g. after the tab was hidden
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Advance to `time_ms` and run as many ticks as have come due; returns
    /// the number run
    pub fn advance(&mut self, time_ms: f64, world: &mut World, input: &mut InputTracker) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let tick_input = input.take_tick_input();
            tick(world, &tick_input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
