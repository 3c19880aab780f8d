//! Game state and core simulation types
//!
//! Everything one run mutates lives in [`World`]; each tick phase takes it by
//! `&mut` in a fixed order (see `tick.rs`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{BallConfig, BallKind};
use super::difficulty::Difficulty;
use super::generator;
use super::lifecycle::FadeSweep;
use super::rng::{self, RandomSource};
use super::tick::ControlFlags;
use super::wind::WindState;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Tick body skipped until unpaused
    Paused,
    /// Run ended; a new `World` starts the next run
    GameOver,
}

/// Left or right, for walls and cannons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub on_ground: bool,
}

impl Ball {
    /// A ball at rest on the start floor
    pub fn spawn(radius: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, generator::floor_y(0) - radius),
            vel: Vec2::ZERO,
            radius,
            on_ground: true,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// Floor types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorType {
    #[default]
    Normal,
    Special,
    Moving,
    Shrinking,
    Breaking,
}

impl FloorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloorType::Normal => "normal",
            FloorType::Special => "special",
            FloorType::Moving => "moving",
            FloorType::Shrinking => "shrinking",
            FloorType::Breaking => "breaking",
        }
    }
}

/// Oscillation state of a moving floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingState {
    /// +1 right, -1 left
    pub direction: f32,
    /// Spawn x the oscillation is centered on
    pub origin_x: f32,
}

/// Countdown and anchor of a shrinking floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShrinkState {
    /// Ticks left before shrinking starts
    pub delay: f32,
    pub origin_x: f32,
    pub original_width: f32,
}

/// A platform at a fixed vertical slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    /// Sequence number; `y = FLOOR_BASELINE_Y - number * FLOOR_VERTICAL_SPACING`
    pub number: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: FloorType,
    /// Drawn in the special color (special floors and floor 0)
    pub is_special: bool,
    pub fade_alpha: f32,
    /// Claimed by the fade sweep
    pub is_fading: bool,
    /// Breaking floor that has been landed on
    pub is_breaking: bool,
    pub moving: Option<MovingState>,
    pub shrink: Option<ShrinkState>,
    pub cannon: Option<Side>,
    /// Broken through; dropped on the next lifecycle pass
    pub should_remove: bool,
    /// Ids of coins spawned on this floor
    pub coin_ids: Vec<u32>,
}

impl Floor {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the ball can still land on this floor
    pub fn is_solid(&self) -> bool {
        if self.fade_alpha <= 0.0 {
            return false;
        }
        if (self.is_fading || self.is_breaking)
            && self.fade_alpha < FADING_FLOOR_MIN_ALPHA_FOR_COLLISION
        {
            return false;
        }
        true
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            FloorType::Moving => MOVING_FLOOR_COLOR,
            FloorType::Shrinking => SHRINKING_FLOOR_COLOR,
            FloorType::Breaking => BREAKING_FLOOR_COLOR,
            _ if self.is_special => SPECIAL_FLOOR_COLOR,
            _ => FLOOR_COLOR,
        }
    }

    /// Horizontal footprint of this floor's cannon, if it has one
    pub fn cannon_span(&self) -> Option<(f32, f32)> {
        self.cannon.map(|side| match side {
            Side::Right => {
                let x = WALL_RIGHT_X - WALL_THICKNESS - CANNON_HORIZONTAL_LENGTH;
                (x, x + CANNON_HORIZONTAL_LENGTH)
            }
            Side::Left => {
                let x = WALL_LEFT_X + WALL_THICKNESS;
                (x, x + CANNON_HORIZONTAL_LENGTH)
            }
        })
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Owning floor; the coin is evicted with it
    pub floor_number: u32,
    pub collected: bool,
}

/// Wall boost arming state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WallBoost {
    /// Wall the ball last rebounded from fast enough to arm a boost
    pub armed: Option<Side>,
    /// Armed and still within trigger distance
    pub can_boost: bool,
    pub distance: f32,
    /// Ticks left on the "boost activated" indicator
    pub activated_frames: u32,
}

impl WallBoost {
    pub fn clear(&mut self) {
        self.armed = None;
        self.can_boost = false;
        self.distance = 0.0;
    }

    pub fn is_activated(&self) -> bool {
        self.activated_frames > 0
    }
}

/// Per-run scoring and camera state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRunState {
    /// Highest floor reached while grounded
    pub max_floor_reached: u32,
    /// Best score across runs, seeded from persistence
    pub best_score: u32,
    /// Floor the ball is on (or level with)
    pub current_floor: u32,
    pub coins_collected: u32,
    pub camera_y: f32,
    pub current_height: u32,
    pub max_height: u32,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    CoinCollected { coin_id: u32, total: u32 },
    WallBoost { side: Side },
    CannonLaunch { floor: u32 },
    FadeSweepStarted,
    /// Persist `best_score`
    NewBestScore { best_score: u32 },
    /// Fold `coins_earned` into the coin total
    RunEnded { score: u32, coins_earned: u32 },
}

/// The simulation aggregate for one run
#[derive(Debug)]
pub struct World {
    pub seed: u64,
    pub ball_kind: BallKind,
    pub config: BallConfig,
    pub flags: ControlFlags,
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub ball: Ball,
    /// Ordered by ascending `number`
    pub floors: Vec<Floor>,
    /// Every live coin, for flat collision scans
    pub coins: Vec<Coin>,
    pub wind: WindState,
    pub wall_boost: WallBoost,
    pub difficulty: Difficulty,
    pub fade: FadeSweep,
    pub run: GameRunState,
    pub events: Vec<GameEvent>,
    rng: Box<dyn RandomSource>,
    next_id: u32,
}

impl World {
    /// Start a run with a seeded PCG source
    pub fn new(
        seed: u64,
        ball_kind: BallKind,
        config: BallConfig,
        flags: ControlFlags,
        best_score: u32,
    ) -> Self {
        Self::with_rng(seed, ball_kind, config, flags, best_score, rng::seeded(seed))
    }

    /// Start a run drawing from an arbitrary random source
    pub fn with_rng(
        seed: u64,
        ball_kind: BallKind,
        config: BallConfig,
        flags: ControlFlags,
        best_score: u32,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let wind = WindState::new(&config.wind, rng.as_mut());
        let mut world = Self {
            seed,
            ball_kind,
            config,
            flags,
            phase: GamePhase::Playing,
            time_ticks: 0,
            ball: Ball::spawn(config.radius),
            floors: Vec::new(),
            coins: Vec::new(),
            wind,
            wall_boost: WallBoost::default(),
            difficulty: Difficulty::default(),
            fade: FadeSweep::default(),
            run: GameRunState {
                best_score,
                ..Default::default()
            },
            events: Vec::new(),
            rng,
            next_id: 1,
        };

        for number in 0..=FLOORS_TO_GENERATE_AHEAD as u32 {
            generator::spawn_floor(&mut world, number);
        }

        log::info!(
            "Run started: ball={} seed={} best={}",
            ball_kind,
            seed,
            best_score
        );
        world
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Step the wind state machine; returns the push to apply to the ball
    pub fn advance_wind(&mut self) -> f32 {
        self.wind.update(&self.config.wind, self.rng.as_mut());
        self.wind.applied_force(&self.config.wind, self.ball.on_ground)
    }

    pub fn floor(&self, number: u32) -> Option<&Floor> {
        self.floors.iter().find(|f| f.number == number)
    }

    pub fn floor_mut(&mut self, number: u32) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.number == number)
    }

    /// Remove every coin owned by a floor
    pub fn evict_coins(&mut self, floor_number: u32) {
        self.coins.retain(|c| c.floor_number != floor_number);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
