//! Ball motion: input forces, jumping, gravity and the wall boost

use glam::Vec2;

use super::ball::BallConfig;
use super::state::{Ball, GameEvent, Side, World};
use super::tick::{ControlFlags, TickInput};
use crate::consts::*;

/// Accelerate from held input, clamp to max speed, then apply friction
///
/// Friction uses `on_ground` as left by the previous tick's collisions.
pub fn apply_input(ball: &mut Ball, config: &BallConfig, input: &TickInput, flags: &ControlFlags) {
    let accel = config.acceleration;

    if input.move_left {
        ball.vel.x -= accel;
    }
    if input.move_right {
        ball.vel.x += accel;
    }

    if flags.mobile_controls {
        ball.vel.x += input.touch_direction.signum() as f32 * accel;
    }

    if flags.accelerometer && input.tilt_x.abs() > TILT_DEAD_ZONE {
        ball.vel.x += input.tilt_x.clamp(-1.0, 1.0) * accel * 2.0;
    }

    ball.vel.x = ball.vel.x.clamp(-config.max_speed, config.max_speed);

    ball.vel.x *= if ball.on_ground {
        config.ground_friction
    } else {
        config.air_resistance
    };
}

/// Jump velocity for the current horizontal speed
///
/// Running at full speed adds the whole bonus.
pub fn jump_force(config: &BallConfig, vx: f32) -> f32 {
    let speed_ratio = vx.abs() / config.max_speed;
    config.base_jump_force + config.max_jump_bonus * speed_ratio
}

/// Jump if grounded and not already rising; returns true if it jumped
pub fn try_jump(ball: &mut Ball, config: &BallConfig, input: &TickInput, flags: &ControlFlags) -> bool {
    let can_jump = ball.on_ground && ball.vel.y >= 0.0;
    let wants_jump = flags.auto_jump || input.jump_pressed;
    if !(can_jump && wants_jump) {
        return false;
    }
    ball.vel.y = jump_force(config, ball.vel.x);
    ball.on_ground = false;
    true
}

/// Apply gravity and advance the position; returns the pre-move position
pub fn integrate(ball: &mut Ball, gravity: f32) -> Vec2 {
    ball.vel.y += gravity;
    let prev = ball.pos;
    ball.pos += ball.vel;
    prev
}

/// Gap between the ball's edge and a wall's inner face
fn wall_gap(ball: &Ball, side: Side) -> f32 {
    match side {
        Side::Left => ((ball.pos.x - ball.radius) - (WALL_LEFT_X + WALL_THICKNESS)).abs(),
        Side::Right => ((ball.pos.x + ball.radius) - (WALL_RIGHT_X - WALL_THICKNESS)).abs(),
    }
}

/// Track, fire and display the wall boost
///
/// An armed boost stays available while the ball is within the trigger
/// distance of its wall and disarms once it drifts farther. It fires on
/// input toward the far wall, or immediately under mobile controls.
pub fn update_wall_boost(world: &mut World, input: &TickInput) {
    let config = world.config.wall_boost;
    let boost = &mut world.wall_boost;

    if config.enabled {
        match boost.armed {
            Some(side) if wall_gap(&world.ball, side) < config.max_distance => {
                boost.distance = wall_gap(&world.ball, side);
                boost.can_boost = true;
            }
            _ => boost.clear(),
        }

        if let Some(side) = boost.armed.filter(|_| boost.can_boost) {
            let away_from_wall = match side {
                Side::Left => input.move_right,
                Side::Right => input.move_left,
            };
            if world.flags.mobile_controls || away_from_wall {
                world.ball.vel.x = match side {
                    Side::Left => config.velocity_x,
                    Side::Right => -config.velocity_x,
                };
                world.ball.vel.y += config.velocity_y;
                boost.activated_frames = BOOST_ACTIVATED_DURATION;
                boost.clear();
                world.events.push(GameEvent::WallBoost { side });
                log::debug!("Wall boost off {:?} wall", side);
            }
        }
    }

    if boost.activated_frames > 0 {
        boost.activated_frames -= 1;
    }
}
