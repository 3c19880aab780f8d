//! Frame geometry built from a simulation snapshot
//!
//! Everything is emitted in canvas pixels with the camera offset already
//! applied, back to front: background, walls, floors, cannons, coins, ball,
//! boost rings, HUD wind arrow.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, hex_color};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::snapshot::{FloorView, Snapshot};
use crate::sim::{Side, WindPhase};

const CIRCLE_SEGMENTS: u32 = 24;
const COIN_SEGMENTS: u32 = 12;
const WIND_ARROW_CENTER: Vec2 = Vec2::new(CANVAS_WIDTH - 50.0, 100.0);
const WIND_ARROW_LENGTH: f32 = 40.0;
const WIND_ARROW_HEAD: f32 = 25.0;

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

fn floor_geometry(floor: &FloorView, y: f32, out: &mut Vec<Vertex>) {
    let alpha = floor.fade_alpha;
    out.extend(shapes::rect(
        floor.x,
        y,
        floor.width,
        floor.height,
        hex_color(floor.color, alpha),
    ));

    if floor.color == SPECIAL_FLOOR_COLOR && alpha > 0.5 {
        out.extend(shapes::rect_outline(
            floor.x,
            y,
            floor.width,
            floor.height,
            2.0,
            with_alpha(colors::FLOOR_OUTLINE, alpha),
        ));
    }
    if floor.is_fading && alpha > FADING_FLOOR_MIN_ALPHA_FOR_COLLISION {
        out.extend(shapes::rect_outline(
            floor.x,
            y,
            floor.width,
            floor.height,
            2.0,
            with_alpha(colors::FADING_OUTLINE, alpha),
        ));
    }
}

/// Horizontal bar along the floor line plus a vertical lip on the inner end
fn cannon_geometry(floor: &FloorView, y: f32, out: &mut Vec<Vertex>) {
    let Some(side) = floor.cannon else {
        return;
    };
    let color = hex_color(CANNON_COLOR, floor.fade_alpha);
    let (x, lip_x) = match side {
        Side::Right => {
            let x = WALL_RIGHT_X - WALL_THICKNESS - CANNON_HORIZONTAL_LENGTH;
            (x, x)
        }
        Side::Left => {
            let x = WALL_LEFT_X + WALL_THICKNESS;
            (x, x + CANNON_HORIZONTAL_LENGTH - CANNON_THICKNESS)
        }
    };
    out.extend(shapes::rect(x, y, CANNON_HORIZONTAL_LENGTH, CANNON_THICKNESS, color));
    out.extend(shapes::rect(
        lip_x,
        y - CANNON_VERTICAL_LENGTH,
        CANNON_THICKNESS,
        CANNON_VERTICAL_LENGTH,
        color,
    ));
}

fn coin_geometry(center: Vec2, radius: f32, color: &str, out: &mut Vec<Vertex>) {
    out.extend(shapes::circle(center, radius + 3.0, colors::COIN_GLOW, COIN_SEGMENTS));
    out.extend(shapes::circle(center, radius, colors::COIN_OUTLINE, COIN_SEGMENTS));
    out.extend(shapes::circle(center, radius - 1.5, hex_color(color, 1.0), COIN_SEGMENTS));
    out.extend(shapes::triangle(
        center + Vec2::new(0.0, -radius * 0.3),
        center + Vec2::new(radius * 0.5, -radius * 0.5),
        center + Vec2::new(radius * 0.3, 0.0),
        colors::COIN_SHINE,
    ));
}

fn wind_arrow(snapshot: &Snapshot, out: &mut Vec<Vertex>) {
    let wind = &snapshot.wind;
    if wind.state == WindPhase::Break || wind.force.abs() <= 0.001 {
        return;
    }
    // Faint while ramping, solid at full strength
    let alpha = 0.3 + 0.7 * wind.strength;
    out.extend(shapes::arrow(
        WIND_ARROW_CENTER,
        WIND_ARROW_LENGTH,
        WIND_ARROW_HEAD,
        wind.direction,
        with_alpha(colors::WIND_ARROW, alpha),
    ));
}

/// Build the full frame as a triangle list
pub fn build_scene(snapshot: &Snapshot, settings: &Settings) -> Vec<Vertex> {
    let cam = snapshot.camera_y;
    let mut out = Vec::with_capacity(2048);

    out.extend(shapes::rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, colors::BACKGROUND));
    out.extend(shapes::rect(0.0, 0.0, WALL_THICKNESS, CANVAS_HEIGHT, colors::WALL));
    out.extend(shapes::rect(
        CANVAS_WIDTH - WALL_THICKNESS,
        0.0,
        WALL_THICKNESS,
        CANVAS_HEIGHT,
        colors::WALL,
    ));

    let visible = |y: f32, h: f32| y + cam + h >= 0.0 && y + cam <= CANVAS_HEIGHT;

    let floors = snapshot
        .floors
        .iter()
        .filter(|f| f.fade_alpha > FLOOR_FADE_MIN_ALPHA && visible(f.y, f.height));
    for floor in floors.clone() {
        floor_geometry(floor, floor.y + cam, &mut out);
    }
    for floor in floors {
        cannon_geometry(floor, floor.y + cam, &mut out);
    }

    for coin in snapshot.coins.iter().filter(|c| !c.collected) {
        if visible(coin.y - coin.radius, coin.radius * 2.0) {
            coin_geometry(Vec2::new(coin.x, coin.y + cam), coin.radius, coin.color, &mut out);
        }
    }

    let ball = &snapshot.ball;
    let center = Vec2::new(ball.x, ball.y + cam);
    out.extend(shapes::circle(center, ball.radius, hex_color(ball.color, 1.0), CIRCLE_SEGMENTS));

    let ring_radius = ball.radius + 5.0;
    if settings.debug_info && snapshot.can_wall_boost {
        out.extend(shapes::ring(
            center,
            ring_radius - 1.0,
            ring_radius + 1.0,
            colors::BOOST_HINT,
            CIRCLE_SEGMENTS,
        ));
    }
    if snapshot.boost_activated {
        let half = (ball.radius * 0.1).max(2.0) / 2.0;
        out.extend(shapes::ring(
            center,
            ring_radius - half,
            ring_radius + half,
            colors::BOOST_ACTIVATED,
            CIRCLE_SEGMENTS,
        ));
    }

    if settings.show_wind {
        wind_arrow(snapshot, &mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::world_with;

    fn scene_for(snapshot: &Snapshot) -> Vec<Vertex> {
        build_scene(snapshot, &Settings::default())
    }

    /// Matches on rgb; alpha varies with fades and wind strength
    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color[..3] == color[..3])
    }

    #[test]
    fn test_scene_is_triangles_and_draws_ball() {
        let world = world_with(vec![0.5]);
        let snapshot = Snapshot::capture(&world);
        let scene = scene_for(&snapshot);
        assert_eq!(scene.len() % 3, 0);
        assert!(has_color(&scene, hex_color(snapshot.ball.color, 1.0)));
        assert!(has_color(&scene, colors::WALL));
    }

    #[test]
    fn test_faded_floors_skipped() {
        let world = world_with(vec![0.5]);
        let mut snapshot = Snapshot::capture(&world);
        snapshot.floors.truncate(1);
        snapshot.coins.clear();
        let with_floor = scene_for(&snapshot).len();

        snapshot.floors[0].fade_alpha = FLOOR_FADE_MIN_ALPHA;
        assert_eq!(scene_for(&snapshot).len(), with_floor - 6 - 24);
    }

    #[test]
    fn test_camera_offsets_geometry() {
        let world = world_with(vec![0.5]);
        let mut snapshot = Snapshot::capture(&world);
        let ball_y = snapshot.ball.y;
        snapshot.floors.clear();
        snapshot.camera_y = 100.0;
        let scene = scene_for(&snapshot);
        let ball_color = hex_color(snapshot.ball.color, 1.0);
        let center = scene
            .iter()
            .find(|v| v.color == ball_color && v.position[0] == snapshot.ball.x)
            .map(|v| v.position[1]);
        assert_eq!(center, Some(ball_y + 100.0));
    }

    #[test]
    fn test_wind_arrow_respects_setting() {
        let world = world_with(vec![0.5]);
        let mut snapshot = Snapshot::capture(&world);
        snapshot.wind.state = WindPhase::Active;
        snapshot.wind.force = 0.3;
        snapshot.wind.strength = 1.0;

        assert!(has_color(&scene_for(&snapshot), colors::WIND_ARROW));

        let hidden = Settings {
            show_wind: false,
            ..Default::default()
        };
        assert!(!has_color(&build_scene(&snapshot, &hidden), colors::WIND_ARROW));
    }

    #[test]
    fn test_boost_ring_when_activated() {
        let world = world_with(vec![0.5]);
        let mut snapshot = Snapshot::capture(&world);
        assert!(!has_color(&scene_for(&snapshot), colors::BOOST_ACTIVATED));
        snapshot.boost_activated = true;
        assert!(has_color(&scene_for(&snapshot), colors::BOOST_ACTIVATED));
    }
}
