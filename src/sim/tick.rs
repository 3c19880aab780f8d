//! Fixed-rate simulation tick
//!
//! Phase order within a tick:
//! input → wind → gravity/integrate → walls → cannons → floors → coins →
//! wall boost → score → floor lifecycle → streaming → difficulty →
//! camera/height → game over.
//!
//! Collision sees the floor field before lifecycle mutates it; do not reorder.

use serde::{Deserialize, Serialize};

use super::collision;
use super::generator::{self, floor_index_at};
use super::lifecycle;
use super::physics;
use super::state::{GameEvent, GamePhase, World};
use crate::consts::*;

/// Input intent for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// ArrowLeft / a held
    pub move_left: bool,
    /// ArrowRight / d held
    pub move_right: bool,
    /// Jump went down since the previous tick
    pub jump_pressed: bool,
    /// Touch half of the screen: -1 left, 0 none, 1 right
    pub touch_direction: i8,
    /// Device tilt in [-1, 1]
    pub tilt_x: f32,
    /// Pause toggle
    pub pause: bool,
}

/// Control-scheme toggles the simulation reads each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    /// Jump whenever grounded
    pub auto_jump: bool,
    /// Touch steering; wall boosts fire without a confirming press
    pub mobile_controls: bool,
    /// Tilt steering
    pub accelerometer: bool,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) {
    if input.pause {
        match world.phase {
            GamePhase::Playing => {
                world.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => world.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if world.phase != GamePhase::Playing {
        return;
    }
    world.time_ticks += 1;

    // Input and jump
    physics::apply_input(&mut world.ball, &world.config, input, &world.flags);
    physics::try_jump(&mut world.ball, &world.config, input, &world.flags);

    // Wind pushes after the state machine has picked this tick's force
    let push = world.advance_wind();
    world.ball.vel.x += push;

    let prev = physics::integrate(&mut world.ball, world.config.gravity);

    // Collisions
    collision::resolve_walls(world, prev);
    if !collision::resolve_cannons(world, prev) {
        collision::resolve_floors(world, prev);
    }
    collision::collect_coins(world);
    physics::update_wall_boost(world, input);

    update_score(world);

    // Floor lifecycle
    lifecycle::update_floor_behaviors(world);
    lifecycle::update_fade_sweep(world);

    generator::stream_floors(world);
    world.difficulty.update(world.run.max_floor_reached);

    update_camera(world);
    update_height(world);
    check_game_over(world);
}

/// Floor the ball is standing on, if it is grounded on one
fn grounded_floor(world: &World) -> Option<u32> {
    if !world.ball.on_ground {
        return None;
    }
    let ball = &world.ball;
    let bottom = ball.bottom();
    world
        .floors
        .iter()
        .find(|f| {
            bottom >= f.y && bottom <= f.y + f.height && ball.pos.x >= f.x && ball.pos.x <= f.right()
        })
        .map(|f| f.number)
}

/// Track the current floor and raise the score while grounded
pub fn update_score(world: &mut World) {
    let current = grounded_floor(world)
        .unwrap_or_else(|| floor_index_at(world.ball.pos.y).clamp(0, u32::MAX as i64) as u32);
    world.run.current_floor = current;

    if !world.ball.on_ground || current <= world.run.max_floor_reached {
        return;
    }
    world.run.max_floor_reached = current;

    if current >= FLOOR_FADE_START_AT_SCORE && world.fade.start() {
        log::info!("Fade sweep started at floor {}", current);
        world.events.push(GameEvent::FadeSweepStarted);
    }

    if current > world.run.best_score {
        world.run.best_score = current;
        log::info!("New best score: {}", current);
        world.events.push(GameEvent::NewBestScore { best_score: current });
    }
}

fn update_camera(world: &mut World) {
    let y = world.ball.pos.y;
    world.run.camera_y = if y < CAMERA_THRESHOLD {
        CAMERA_THRESHOLD - y
    } else {
        0.0
    };
}

fn update_height(world: &mut World) {
    let height = (START_FLOOR_LEVEL - world.ball.pos.y).round().max(0.0) as u32;
    world.run.current_height = height;
    world.run.max_height = world.run.max_height.max(height);
}

/// Whether a collidable floor lies within falling distance below the ball
pub fn has_floor_in_reach(world: &World) -> bool {
    let lowest = world
        .floors
        .iter()
        .filter(|f| f.is_solid())
        .map(|f| f.y)
        .max_by(|a, b| a.total_cmp(b));

    match lowest {
        Some(lowest_y) => world.ball.pos.y <= lowest_y + GAME_OVER_FALL_THRESHOLD,
        None => false,
    }
}

fn check_game_over(world: &mut World) {
    if has_floor_in_reach(world) || world.ball.vel.y <= 0.0 {
        return;
    }

    world.phase = GamePhase::GameOver;
    let score = world.run.max_floor_reached;
    let coins_earned = world.run.coins_collected;
    log::info!(
        "Game over after {} ticks: score={} coins={}",
        world.time_ticks,
        score,
        coins_earned
    );
    world.events.push(GameEvent::RunEnded {
        score,
        coins_earned,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallKind;
    use crate::sim::difficulty::Multipliers;
    use crate::sim::generator::floor_y;
    use crate::sim::state::{Coin, FloorType};
    use crate::sim::test_support::{set_floors, world_with};
    use crate::sim::World;
    use glam::Vec2;

    fn right() -> TickInput {
        TickInput {
            move_right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_tick_move_right() {
        let mut world = world_with(vec![0.5]);
        tick(&mut world, &right());
        assert_eq!(world.ball.vel.x, 0.2 * 0.96);
        assert!(world.ball.on_ground);
        assert_eq!(world.ball.bottom(), floor_y(0));
        assert_eq!(world.ball.vel.y, 0.0);
    }

    #[test]
    fn test_resting_ball_stays_put() {
        let mut world = world_with(vec![0.5]);
        let start = world.ball.pos;
        for _ in 0..120 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.ball.pos, start);
        assert!(world.ball.on_ground);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.time_ticks, 120);
    }

    #[test]
    fn test_pause_toggle() {
        let mut world = world_with(vec![0.5]);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Paused);

        tick(&mut world, &right());
        assert_eq!(world.time_ticks, 0);
        assert_eq!(world.ball.vel.x, 0.0);

        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.time_ticks, 1);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut world = world_with(vec![0.5]);
        let jump = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        tick(&mut world, &jump);
        assert!(!world.ball.on_ground);
        assert_eq!(world.ball.vel.y, -12.0 + 0.5);
        assert!(world.ball.bottom() < floor_y(0));
    }

    #[test]
    fn test_breaking_floor_end_to_end() {
        let mut world = world_with(vec![0.5]);
        set_floors(&mut world, &[(0, 10.0, 410.0)]);
        world.floors[0].kind = FloorType::Breaking;
        world.coins.push(Coin {
            id: 500,
            pos: Vec2::new(400.0, floor_y(0) - 15.0),
            radius: COIN_RADIUS,
            floor_number: 0,
            collected: false,
        });

        // The first tick lands and starts the break
        let fade_speed = BREAKING_FLOOR_FADE_SPEED * world.difficulty.multipliers().breaking_fade_speed;
        let ticks = (1.0 / fade_speed).ceil() as u32;
        assert_eq!(ticks, 34);
        for n in 1..=ticks {
            tick(&mut world, &TickInput::default());
            let floor = world.floor(0).expect("floor 0");
            assert!(floor.is_breaking);
            assert_eq!(floor.should_remove, n == ticks, "tick {n}");
            assert_eq!(world.coins.iter().any(|c| c.id == 500), n < ticks, "tick {n}");
        }

        tick(&mut world, &TickInput::default());
        assert!(world.floor(0).is_none());
    }

    #[test]
    fn test_difficulty_inactive_below_threshold() {
        let mut world = world_with(vec![0.5]);
        for _ in 0..60 {
            tick(&mut world, &right());
        }
        assert!(world.run.max_floor_reached < DIFFICULTY_START_AT_SCORE);
        assert!(!world.difficulty.active);
        assert_eq!(world.difficulty.multipliers(), Multipliers::default());
    }

    fn land_on(world: &mut World, number: u32) {
        set_floors(world, &[(0, 10.0, 410.0), (number, 10.0, 410.0)]);
        world.ball.pos = Vec2::new(200.0, floor_y(number) - world.ball.radius - 0.25);
        world.ball.vel = Vec2::ZERO;
        world.ball.on_ground = false;
    }

    #[test]
    fn test_score_milestones() {
        let mut world = world_with(vec![0.5]);
        land_on(&mut world, 5);
        tick(&mut world, &TickInput::default());

        assert!(world.ball.on_ground);
        assert_eq!(world.run.current_floor, 5);
        assert_eq!(world.run.max_floor_reached, 5);
        assert!(world.fade.active);
        assert!(world.difficulty.active);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::FadeSweepStarted));
        assert!(events.contains(&GameEvent::NewBestScore { best_score: 5 }));
        assert_eq!(world.floors.last().map(|f| f.number), Some(15));
    }

    #[test]
    fn test_score_needs_ground() {
        let mut world = world_with(vec![0.5]);
        world.ball.pos.y = floor_y(3) - 40.0;
        world.ball.vel.y = -10.0;
        world.ball.on_ground = false;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.run.current_floor, 3);
        assert_eq!(world.run.max_floor_reached, 0);
    }

    #[test]
    fn test_best_score_only_when_beaten() {
        let mut world = World::with_rng(
            1,
            BallKind::Standard,
            BallKind::Standard.base_config(),
            ControlFlags::default(),
            10,
            Box::new(crate::sim::SequenceSource::constant(0.5)),
        );
        land_on(&mut world, 3);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.run.max_floor_reached, 3);
        assert_eq!(world.run.best_score, 10);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_camera_follows_above_threshold() {
        let mut world = world_with(vec![0.5]);
        world.ball.pos.y = 150.0;
        world.ball.vel.y = -1.0;
        world.ball.on_ground = false;
        tick(&mut world, &TickInput::default());
        assert!((world.run.camera_y - (CAMERA_THRESHOLD - world.ball.pos.y)).abs() < 1e-4);
        assert!(world.run.current_height > 0);
        assert_eq!(world.run.max_height, world.run.current_height);
    }

    #[test]
    fn test_game_over_past_fall_threshold() {
        let mut world = world_with(vec![0.5]);
        set_floors(&mut world, &[(0, 10.0, 410.0)]);
        world.run.coins_collected = 4;
        world.ball.pos.y = floor_y(0) + GAME_OVER_FALL_THRESHOLD + 1.0;
        world.ball.vel = Vec2::new(0.0, 2.0);
        world.ball.on_ground = false;

        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::RunEnded {
                score: 0,
                coins_earned: 4
            }]
        );

        // Further ticks are no-ops
        let pos = world.ball.pos;
        tick(&mut world, &right());
        assert_eq!(world.ball.pos, pos);
    }

    #[test]
    fn test_no_game_over_within_threshold() {
        let mut world = world_with(vec![0.5]);
        set_floors(&mut world, &[(0, 10.0, 410.0)]);
        // A faint but still collidable floor counts
        world.floors[0].is_fading = true;
        world.floors[0].fade_alpha = 0.2;
        world.ball.pos.y = floor_y(0) + GAME_OVER_FALL_THRESHOLD - 10.0;
        world.ball.vel = Vec2::new(0.0, 1.0);
        world.ball.on_ground = false;

        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_no_game_over_while_rising() {
        let mut world = world_with(vec![0.5]);
        set_floors(&mut world, &[(0, 10.0, 410.0)]);
        world.ball.pos.y = floor_y(0) + GAME_OVER_FALL_THRESHOLD + 50.0;
        world.ball.vel = Vec2::new(0.0, -20.0);
        world.ball.on_ground = false;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut world = World::new(
                99,
                BallKind::Beach,
                BallKind::Beach.base_config(),
                ControlFlags {
                    auto_jump: true,
                    ..Default::default()
                },
                0,
            );
            for i in 0..600 {
                let input = TickInput {
                    move_left: i % 200 < 60,
                    move_right: i % 200 >= 100,
                    ..Default::default()
                };
                tick(&mut world, &input);
            }
            (world.ball.pos, world.ball.vel, world.floors.len(), world.wind.force)
        };
        assert_eq!(run(), run());
    }
}
