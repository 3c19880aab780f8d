//! Collision detection and response
//!
//! The ball is a circle, everything else is an axis-aligned segment: the two
//! side walls, floor top edges and cannon trigger lines. Fast motion is
//! handled by sweeping the ball along its motion segment for this tick
//! instead of testing only the end position.

use glam::Vec2;

use super::ball::BallConfig;
use super::state::{Ball, Floor, FloorType, GameEvent, Side, World};
use crate::consts::*;
use crate::wall_bounds;

/// Result of a downward crossing test against a horizontal line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Fraction of this tick's motion at which the bottom edge reached the line
    pub t: f32,
    /// Ball center x at that moment
    pub x: f32,
}

/// Whether the ball's bottom edge crossed `line_y` moving down this tick
///
/// Above the CCD speed threshold, horizontal overlap is judged at the
/// interpolated crossing point instead of the end position, so a fast
/// diagonal fall cannot skip a narrow floor.
pub fn downward_crossing(prev: Vec2, ball: &Ball, line_y: f32) -> Option<Crossing> {
    let prev_bottom = prev.y + ball.radius;
    let bottom = ball.bottom();
    if !(prev_bottom <= line_y && bottom >= line_y) {
        return None;
    }

    let travel = ball.pos - prev;
    if travel.length() <= CCD_MIN_VELOCITY_FOR_STEPS {
        return Some(Crossing {
            t: 1.0,
            x: ball.pos.x,
        });
    }

    let dy = bottom - prev_bottom;
    let t = if dy > 0.0 { (line_y - prev_bottom) / dy } else { 1.0 };
    Some(Crossing {
        t,
        x: prev.x + travel.x * t,
    })
}

/// Horizontal overlap of a circle centered at `x` with the span `[left, right]`
#[inline]
fn overlaps_span(x: f32, radius: f32, left: f32, right: f32) -> bool {
    x >= left - radius && x <= right + radius
}

/// Sub-sample the horizontal motion for the first point past a wall bound
///
/// Returns the sample fraction, or None if the segment never crosses.
pub fn swept_wall_crossing(prev_x: f32, x: f32, bound: f32, side: Side) -> Option<f32> {
    let past = |sample: f32| match side {
        Side::Left => sample < bound,
        Side::Right => sample > bound,
    };
    (0..=CCD_MAX_STEPS)
        .map(|i| i as f32 / CCD_MAX_STEPS as f32)
        .find(|&t| past(prev_x + (x - prev_x) * t))
}

/// Clamp to a wall and reflect or stop; returns true if the rebound arms a boost
fn bounce_off_wall(ball: &mut Ball, config: &BallConfig, bound: f32, side: Side) -> bool {
    ball.pos.x = bound;

    let speed = ball.vel.x.abs();
    if speed <= config.min_bounce_velocity {
        ball.vel.x = 0.0;
        return false;
    }

    let rebound = speed * config.wall_bounce_factor;
    ball.vel.x = match side {
        Side::Left => rebound,
        Side::Right => -rebound,
    };
    config.wall_boost.enabled && rebound >= config.wall_boost.min_velocity
}

/// Keep the ball between the walls
pub fn resolve_walls(world: &mut World, prev: Vec2) {
    let config = world.config;
    let (left, right) = wall_bounds(world.ball.radius);

    for (side, bound) in [(Side::Left, left), (Side::Right, right)] {
        let outside = match side {
            Side::Left => world.ball.pos.x < bound,
            Side::Right => world.ball.pos.x > bound,
        };
        if !outside {
            continue;
        }

        let hit = if world.ball.vel.x.abs() > CCD_MIN_VELOCITY_FOR_STEPS {
            swept_wall_crossing(prev.x, world.ball.pos.x, bound, side).is_some()
        } else {
            true
        };

        if hit && bounce_off_wall(&mut world.ball, &config, bound, side) {
            world.wall_boost.armed = Some(side);
        }
    }
}

/// Trigger line of a floor's cannon for the current ball
fn cannon_line(floor: &Floor, config: &BallConfig) -> f32 {
    if config.cannon.can_use {
        floor.y
    } else {
        // Non-launching balls rest on top of the barrel
        floor.y - CANNON_VERTICAL_LENGTH
    }
}

/// Check cannons; returns true if one fired or caught the ball this tick
pub fn resolve_cannons(world: &mut World, prev: Vec2) -> bool {
    if world.ball.vel.y <= 0.0 {
        return false;
    }
    let config = world.config;

    let hit = world.floors.iter().find_map(|floor| {
        if floor.fade_alpha <= 0.0 {
            return None;
        }
        let (left, right) = floor.cannon_span()?;
        let line = cannon_line(floor, &config);
        let crossing = downward_crossing(prev, &world.ball, line)?;
        overlaps_span(crossing.x, world.ball.radius, left, right).then_some((floor.number, line))
    });

    let Some((number, line)) = hit else {
        return false;
    };

    let ball = &mut world.ball;
    ball.pos.y = line - ball.radius;
    if config.cannon.can_use {
        ball.vel.y = config.cannon.boost_force;
        ball.on_ground = false;
        world.wall_boost.activated_frames = BOOST_ACTIVATED_DURATION * CANNON_BOOST_DISPLAY_FACTOR;
        world.events.push(GameEvent::CannonLaunch { floor: number });
        log::debug!("Cannon launch from floor {}", number);
    } else {
        ball.vel.y = 0.0;
        ball.on_ground = true;
    }
    true
}

/// Whether a rising or resting ball is in contact with a floor's top edge
///
/// Never starts a landing: the ball must already be at or just below the
/// surface.
pub fn is_on_floor(ball: &Ball, floor: &Floor) -> bool {
    if !floor.is_solid() {
        return false;
    }
    let depth = ball.bottom() - floor.y;
    (0.0..=5.0).contains(&depth) && overlaps_span(ball.pos.x, ball.radius, floor.x, floor.right())
}

/// Land on floors; returns the floor number landed on this tick
pub fn resolve_floors(world: &mut World, prev: Vec2) -> Option<u32> {
    world.ball.on_ground = false;

    if world.ball.vel.y <= 0.0 {
        // Moving up or level: only maintain existing contact
        world.ball.on_ground = world.floors.iter().any(|f| is_on_floor(&world.ball, f));
        return None;
    }

    // A fast fall can cross several top edges; the highest one is reached first
    let ball = &world.ball;
    let index = world
        .floors
        .iter()
        .enumerate()
        .filter(|(_, floor)| {
            floor.is_solid()
                && downward_crossing(prev, ball, floor.y)
                    .is_some_and(|c| overlaps_span(c.x, ball.radius, floor.x, floor.right()))
        })
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
        .map(|(index, _)| index)?;

    let floor = &mut world.floors[index];
    let ball = &mut world.ball;
    ball.pos.y = floor.y - ball.radius;
    ball.vel.y = 0.0;
    ball.on_ground = true;

    if floor.kind == FloorType::Breaking && !floor.is_breaking {
        floor.is_breaking = true;
        log::debug!("Floor {} starts breaking", floor.number);
    }

    world.wall_boost.clear();
    world.wall_boost.activated_frames = 0;
    Some(floor.number)
}

/// Pull coins toward the ball when the magnet is on, then pick up touching ones
pub fn collect_coins(world: &mut World) {
    let magnet = world.config.magnet;
    let center = world.ball.pos;
    let radius = world.ball.radius;

    let mut collected = Vec::new();
    for coin in world.coins.iter_mut().filter(|c| !c.collected) {
        if magnet.enabled {
            let offset = center - coin.pos;
            let distance = offset.length();
            if distance < magnet.range && distance > 0.0 {
                let pull = (1.0 - distance / magnet.range) * magnet.force;
                coin.pos += offset / distance * pull;
            }
        }

        if center.distance(coin.pos) < radius + coin.radius {
            coin.collected = true;
            collected.push((coin.id, coin.floor_number));
        }
    }

    if collected.is_empty() {
        return;
    }

    world.coins.retain(|c| !c.collected);
    for (id, floor_number) in collected {
        if let Some(floor) = world.floor_mut(floor_number) {
            floor.coin_ids.retain(|&c| c != id);
        }
        world.run.coins_collected += 1;
        world.events.push(GameEvent::CoinCollected {
            coin_id: id,
            total: world.run.coins_collected,
        });
    }
}
