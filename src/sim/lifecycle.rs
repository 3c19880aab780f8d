//! Floor lifecycle: per-type animation and the fade sweep
//!
//! Runs after collisions each tick, so collision always sees the floor field
//! as it was at the start of the tick.

use serde::{Deserialize, Serialize};

use super::difficulty::Multipliers;
use super::state::{Floor, FloorType, World};
use crate::consts::*;

/// Progress of the score-triggered fade sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeSweep {
    pub active: bool,
    /// Ticks since the sweep started
    pub timer: u32,
    /// Lowest floor number not yet claimed by the sweep
    pub next_floor_to_fade: u32,
}

impl FadeSweep {
    /// Start the sweep; returns false if it was already running
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        *self = FadeSweep {
            active: true,
            timer: 0,
            next_floor_to_fade: 0,
        };
        true
    }

    /// How many floors (from floor 0 up) the sweep should have claimed by now
    pub fn target_floor_count(&self) -> u32 {
        if self.timer < FLOOR_FADE_INITIAL_DELAY {
            return 0;
        }
        let since_start = (self.timer - FLOOR_FADE_INITIAL_DELAY) / FLOOR_FADE_TIME_BETWEEN_FLOORS;
        since_start.min(FLOOR_FADE_MAX_FLOORS_AT_ONCE)
    }
}

fn update_moving(floor: &mut Floor, m: &Multipliers) {
    let Some(moving) = floor.moving.as_mut() else {
        return;
    };
    let speed = MOVING_FLOOR_SPEED * m.moving_speed;
    let range = MOVING_FLOOR_RANGE * m.moving_range;

    floor.x += speed * moving.direction;

    if floor.x > moving.origin_x + range {
        floor.x = moving.origin_x + range;
        moving.direction = -1.0;
    } else if floor.x < moving.origin_x - range {
        floor.x = moving.origin_x - range;
        moving.direction = 1.0;
    }

    // Hard bounds are applied last so they win over the range
    let max_x = MOVING_FLOOR_MAX_X - floor.width;
    if floor.x > max_x {
        floor.x = max_x;
        moving.direction = -1.0;
    } else if floor.x < MOVING_FLOOR_MIN_X {
        floor.x = MOVING_FLOOR_MIN_X;
        moving.direction = 1.0;
    }
}

fn update_shrinking(floor: &mut Floor, m: &Multipliers) {
    let Some(shrink) = floor.shrink.as_mut() else {
        return;
    };
    if shrink.delay > 0.0 {
        shrink.delay -= 1.0;
        return;
    }

    let speed = SHRINKING_FLOOR_SHRINK_SPEED * m.shrinking_speed;
    let min_width = SHRINKING_FLOOR_WIDTH_FLOOR.max(SHRINKING_FLOOR_MIN_WIDTH * m.shrinking_min_width);
    if floor.width > min_width {
        floor.width = (floor.width - speed).max(min_width);
        floor.x = shrink.origin_x + (shrink.original_width - floor.width) / 2.0;
    }
}

/// Returns true when the floor has just broken through
fn update_breaking(floor: &mut Floor, m: &Multipliers) -> bool {
    if !floor.is_breaking || floor.is_fading || floor.should_remove {
        return false;
    }
    floor.fade_alpha -= BREAKING_FLOOR_FADE_SPEED * m.breaking_fade_speed;
    if floor.fade_alpha <= 0.0 {
        floor.should_remove = true;
        return true;
    }
    false
}

/// Animate moving/shrinking/breaking floors and drop broken ones
///
/// A floor that breaks through this tick is flagged `should_remove` and its
/// coins leave the world immediately; the floor itself is dropped on the
/// next pass.
pub fn update_floor_behaviors(world: &mut World) {
    let m = world.difficulty.multipliers();

    let before = world.floors.len();
    world.floors.retain(|f| !f.should_remove);
    if world.floors.len() != before {
        log::debug!("Removed {} broken floor(s)", before - world.floors.len());
    }

    let mut broken = Vec::new();
    for floor in &mut world.floors {
        match floor.kind {
            FloorType::Moving => update_moving(floor, &m),
            FloorType::Shrinking => update_shrinking(floor, &m),
            FloorType::Breaking => {
                if update_breaking(floor, &m) {
                    broken.push(floor.number);
                }
            }
            FloorType::Normal | FloorType::Special => {}
        }
    }

    for number in broken {
        world.evict_coins(number);
    }
}

/// Advance the fade sweep: claim floors on cadence, fade them, drop the faded
pub fn update_fade_sweep(world: &mut World) {
    if !world.fade.active {
        return;
    }
    world.fade.timer += 1;

    let target = world.fade.target_floor_count();
    for number in world.fade.next_floor_to_fade..target {
        if let Some(floor) = world.floor_mut(number) {
            if !floor.is_fading {
                floor.is_fading = true;
                // The generic fade replaces an in-progress break
                floor.is_breaking = false;
            }
        }
    }
    world.fade.next_floor_to_fade = world.fade.next_floor_to_fade.max(target);

    let speed = FLOOR_FADE_ALPHA_SPEED * world.difficulty.fade_speed_scale();
    let mut faded = Vec::new();
    for floor in world.floors.iter_mut().filter(|f| f.is_fading) {
        if floor.fade_alpha > FLOOR_FADE_MIN_ALPHA {
            floor.fade_alpha -= speed;
        }
        if floor.fade_alpha <= FLOOR_FADE_MIN_ALPHA {
            faded.push(floor.number);
        }
    }

    if !faded.is_empty() {
        world.floors.retain(|f| !faded.contains(&f.number));
        world.coins.retain(|c| !faded.contains(&c.floor_number));
        log::debug!("Faded out floors {:?}", faded);
    }
}
