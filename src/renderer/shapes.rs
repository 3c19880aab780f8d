//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (x1, y1) = (x + w, y + h);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x1, y, color),
        Vertex::new(x, y1, color),
        Vertex::new(x, y1, color),
        Vertex::new(x1, y, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle outline drawn as four bars centered on the edges
pub fn rect_outline(x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = thickness / 2.0;
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x - half, y - half, w + thickness, thickness, color));
    vertices.extend(rect(x - half, y + h - half, w + thickness, thickness, color));
    vertices.extend(rect(x - half, y + half, thickness, h - thickness, color));
    vertices.extend(rect(x + w - half, y + half, thickness, h - thickness, color));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let point = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = point(inner_radius, theta1);
        let outer1 = point(outer_radius, theta1);
        let inner2 = point(inner_radius, theta2);
        let outer2 = point(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Horizontal arrow centered at `center`, pointing right for a positive
/// direction and left otherwise
pub fn arrow(center: Vec2, length: f32, head: f32, direction: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = if direction < 0.0 { -1.0 } else { 1.0 };
    let shaft_len = length - head;
    let shaft_thickness = head * 0.4;

    let tail_x = center.x - dir * length / 2.0;
    let shaft_x = if dir > 0.0 { tail_x } else { tail_x - shaft_len };
    let mut vertices = rect(
        shaft_x,
        center.y - shaft_thickness / 2.0,
        shaft_len,
        shaft_thickness,
        color,
    );

    let base_x = tail_x + dir * shaft_len;
    vertices.extend(triangle(
        Vec2::new(base_x, center.y - head / 2.0),
        Vec2::new(base_x + dir * head, center.y),
        Vec2::new(base_x, center.y + head / 2.0),
        color,
    ));
    vertices
}
