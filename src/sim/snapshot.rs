//! Render-ready view of the world after a tick

use serde::Serialize;

use super::state::{FloorType, GamePhase, Side, World};
use super::wind::WindPhase;
use crate::consts::COIN_COLOR;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorView {
    pub number: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: &'static str,
    pub kind: FloorType,
    pub fade_alpha: f32,
    pub is_fading: bool,
    pub cannon: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub collected: bool,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindView {
    pub active: bool,
    pub direction: f32,
    pub force: f32,
    /// Ramp progress in [0, 1] for the HUD arrow
    pub strength: f32,
    pub state: WindPhase,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub ball: BallView,
    /// Ascending by floor number
    pub floors: Vec<FloorView>,
    pub coins: Vec<CoinView>,
    pub camera_y: f32,
    /// Highest floor reached this run
    pub score: u32,
    pub best_score: u32,
    pub current_floor: u32,
    pub coins_collected: u32,
    pub current_height: u32,
    pub max_height: u32,
    pub wind: WindView,
    pub boost_activated: bool,
    pub can_wall_boost: bool,
    pub paused: bool,
    pub game_over: bool,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        Self {
            ball: BallView {
                x: world.ball.pos.x,
                y: world.ball.pos.y,
                radius: world.ball.radius,
                color: world.config.color,
            },
            floors: world
                .floors
                .iter()
                .map(|f| FloorView {
                    number: f.number,
                    x: f.x,
                    y: f.y,
                    width: f.width,
                    height: f.height,
                    color: f.color(),
                    kind: f.kind,
                    fade_alpha: f.fade_alpha,
                    is_fading: f.is_fading,
                    cannon: f.cannon,
                })
                .collect(),
            coins: world
                .coins
                .iter()
                .map(|c| CoinView {
                    x: c.pos.x,
                    y: c.pos.y,
                    radius: c.radius,
                    collected: c.collected,
                    color: COIN_COLOR,
                })
                .collect(),
            camera_y: world.run.camera_y,
            score: world.run.max_floor_reached,
            best_score: world.run.best_score,
            current_floor: world.run.current_floor,
            coins_collected: world.run.coins_collected,
            current_height: world.run.current_height,
            max_height: world.run.max_height,
            wind: WindView {
                active: world.wind.blowing,
                direction: world.wind.direction,
                force: world.wind.force,
                strength: world.wind.strength(),
                state: world.wind.phase,
            },
            boost_activated: world.wall_boost.is_activated(),
            can_wall_boost: world.wall_boost.can_boost,
            paused: world.phase == GamePhase::Paused,
            game_over: world.phase == GamePhase::GameOver,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
