//! Tower Climb - an endless vertical climber
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (physics, collisions, floor streaming, wind)
//! - `renderer`: Vertex geometry built from simulation snapshots
//! - `platform`: Input tracking and the browser entry point
//! - `persistence`: Best score, coin totals and purchases
//! - `settings`: Player-facing feature toggles

pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, PersistError, PurchaseError};
pub use persistence::Progress;
pub use settings::Settings;

/// Game configuration constants
///
/// All distances are in canvas pixels, all speeds in pixels per tick.
/// The canvas y axis points down, so "up the tower" means decreasing y.
pub mod consts {
    /// Nominal simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum ticks per rendered frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 430.0;
    pub const CANVAS_HEIGHT: f32 = 932.0;

    /// Side walls
    pub const WALL_THICKNESS: f32 = 10.0;
    pub const WALL_LEFT_X: f32 = 0.0;
    pub const WALL_RIGHT_X: f32 = CANVAS_WIDTH;

    /// Camera starts scrolling once the ball rises above this screen y
    pub const CAMERA_THRESHOLD: f32 = 200.0;

    /// Floor geometry
    pub const FLOOR_HEIGHT: f32 = 15.0;
    /// y of floor 0; floor n sits at `FLOOR_BASELINE_Y - n * FLOOR_VERTICAL_SPACING`
    pub const FLOOR_BASELINE_Y: f32 = CANVAS_HEIGHT - 50.0;
    pub const FLOOR_VERTICAL_SPACING: f32 = 150.0;
    pub const START_FLOOR_WIDTH: f32 = 410.0;
    pub const FLOOR_MIN_WIDTH: f32 = 70.0;
    pub const FLOOR_MAX_WIDTH: f32 = 215.0;
    pub const FLOOR_MAX_HORIZONTAL_GAP: f32 = 330.0;
    pub const FLOOR_MARGIN: f32 = 10.0;
    pub const SPECIAL_FLOOR_INTERVAL: u32 = 100;
    pub const SPECIAL_FLOOR_MIN_NUMBER: u32 = 5;
    pub const SPECIAL_FLOOR_WIDTH: f32 = 410.0;

    /// Streaming window
    pub const FLOORS_TO_GENERATE_AHEAD: i64 = 10;
    pub const FLOORS_TO_GENERATE_BEHIND: i64 = 10_000;

    /// Fade sweep
    pub const FLOOR_FADE_START_AT_SCORE: u32 = 5;
    pub const FLOOR_FADE_INITIAL_DELAY: u32 = 180;
    pub const FLOOR_FADE_TIME_BETWEEN_FLOORS: u32 = 30;
    pub const FLOOR_FADE_MAX_FLOORS_AT_ONCE: u32 = 10_000;
    pub const FLOOR_FADE_ALPHA_SPEED: f32 = 0.02;
    pub const FLOOR_FADE_MIN_ALPHA: f32 = 0.1;
    /// Fading or breaking floors below this alpha no longer collide
    pub const FADING_FLOOR_MIN_ALPHA_FOR_COLLISION: f32 = 0.1;
    pub const GAME_OVER_FALL_THRESHOLD: f32 = 1000.0;

    /// Moving floors
    pub const MOVING_FLOOR_MIN_WIDTH: f32 = 70.0;
    pub const MOVING_FLOOR_MAX_WIDTH: f32 = 215.0;
    pub const MOVING_FLOOR_SPEED: f32 = 2.0;
    pub const MOVING_FLOOR_RANGE: f32 = 120.0;
    pub const MOVING_FLOOR_MIN_X: f32 = 10.0;
    pub const MOVING_FLOOR_MAX_X: f32 = 420.0;

    /// Shrinking floors
    pub const SHRINKING_FLOOR_MIN_WIDTH: f32 = 7.0;
    /// Absolute lower bound on a shrunk floor, whatever the difficulty
    pub const SHRINKING_FLOOR_WIDTH_FLOOR: f32 = 20.0;
    pub const SHRINKING_FLOOR_SHRINK_SPEED: f32 = 0.2;
    pub const SHRINKING_FLOOR_START_DELAY: f32 = 180.0;

    /// Breaking floors
    pub const BREAKING_FLOOR_MIN_WIDTH: f32 = 70.0;
    pub const BREAKING_FLOOR_MAX_WIDTH: f32 = 150.0;
    pub const BREAKING_FLOOR_FADE_SPEED: f32 = 0.03;

    /// Base floor type chances (moving, shrinking, breaking; rest is normal)
    pub const BASE_MOVING_FLOOR_CHANCE: f32 = 0.1;
    pub const BASE_SHRINKING_FLOOR_CHANCE: f32 = 0.1;
    pub const BASE_BREAKING_FLOOR_CHANCE: f32 = 0.05;

    /// Difficulty scaling
    pub const DIFFICULTY_START_AT_SCORE: u32 = 5;
    pub const DIFFICULTY_PER_FLOOR: f32 = 0.01;
    pub const DIFFICULTY_FLOOR_FADE_MULTIPLIER: f32 = 1.5;
    pub const DIFFICULTY_MAX_FADE_MULTIPLIER: f32 = 5.0;
    pub const DIFFICULTY_TYPE_CHANCE_MULTIPLIER: f32 = 1.5;
    pub const DIFFICULTY_MAX_CHANCE: f32 = 0.3;
    pub const DIFFICULTY_MOVING_SPEED_MULTIPLIER: f32 = 1.5;
    pub const DIFFICULTY_MOVING_RANGE_MULTIPLIER: f32 = 1.3;
    pub const DIFFICULTY_SHRINKING_MIN_WIDTH_MULTIPLIER: f32 = 0.7;
    pub const DIFFICULTY_SHRINKING_SPEED_MULTIPLIER: f32 = 1.5;
    pub const DIFFICULTY_SHRINKING_DELAY_MULTIPLIER: f32 = 0.5;
    pub const DIFFICULTY_BREAKING_FADE_SPEED_MULTIPLIER: f32 = 2.0;

    /// Cannons
    pub const CANNON_CHANCE: f32 = 0.02;
    pub const CANNON_MIN_FLOOR: u32 = 5;
    pub const CANNON_HORIZONTAL_LENGTH: f32 = 20.0;
    pub const CANNON_VERTICAL_LENGTH: f32 = 10.0;
    pub const CANNON_THICKNESS: f32 = 5.0;

    /// Continuous collision detection
    pub const CCD_MAX_STEPS: u32 = 10;
    pub const CCD_MIN_VELOCITY_FOR_STEPS: f32 = 8.0;

    /// Coins
    pub const COIN_CHANCE_BASE: f32 = 0.15;
    pub const COIN_CHANCE_PER_FLOOR: f32 = 0.005;
    pub const COIN_MAX_CHANCE: f32 = 0.8;
    pub const MIN_FLOOR_FOR_COINS: u32 = 1;
    pub const MIN_COINS_PER_FLOOR: u32 = 1;
    pub const MAX_COINS_PER_FLOOR: u32 = 3;
    pub const COINS_PER_FLOOR_MULTIPLIER: f32 = 1.005;
    pub const COIN_Y_OFFSET: f32 = -15.0;
    pub const COIN_RADIUS: f32 = 6.0;

    /// Ticks the "boost activated" ring stays visible
    pub const BOOST_ACTIVATED_DURATION: u32 = 10;
    /// Cannon launches show the ring this many times longer
    pub const CANNON_BOOST_DISPLAY_FACTOR: u32 = 3;

    /// Tilt below this magnitude is ignored
    pub const TILT_DEAD_ZONE: f32 = 0.1;
    /// Device gamma (degrees) mapped to full tilt
    pub const TILT_FULL_SCALE_DEGREES: f32 = 45.0;

    /// Ball spawns horizontally centered, resting on the start floor
    pub const PLAYER_START_X: f32 = CANVAS_WIDTH / 2.0;
    /// Reference line for the height readout
    pub const START_FLOOR_LEVEL: f32 = CANVAS_HEIGHT - 100.0;

    /// Colors
    pub const FLOOR_COLOR: &str = "#666";
    pub const SPECIAL_FLOOR_COLOR: &str = "#a66";
    pub const MOVING_FLOOR_COLOR: &str = "#4a9eff";
    pub const SHRINKING_FLOOR_COLOR: &str = "#4aff4a";
    pub const BREAKING_FLOOR_COLOR: &str = "#ff4a4a";
    pub const CANNON_COLOR: &str = "#ffff00";
    pub const COIN_COLOR: &str = "#FFD700";
}

/// Interior x range a ball center may occupy between the walls
#[inline]
pub fn wall_bounds(radius: f32) -> (f32, f32) {
    use consts::*;
    (
        WALL_LEFT_X + WALL_THICKNESS + radius,
        WALL_RIGHT_X - WALL_THICKNESS - radius,
    )
}
