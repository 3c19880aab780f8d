//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Floats per vertex in the flattened buffer
    pub const FLOATS: usize = 6;

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Flatten a vertex list to `[x, y, r, g, b, a, ...]` for a JS typed array
pub fn flatten(vertices: &[Vertex]) -> Vec<f32> {
    bytemuck::cast_slice(vertices).to_vec()
}

/// Parse a CSS hex color (`#rgb` or `#rrggbb`) into RGBA floats
///
/// Malformed input renders magenta so it stands out.
pub fn hex_color(hex: &str, alpha: f32) -> [f32; 4] {
    let digits = hex.trim_start_matches('#');
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

    let rgb = match digits.len() {
        _ if !digits.is_ascii() => None,
        3 => {
            let mut it = digits.chars().map(|c| channel(&c.to_string().repeat(2)));
            match (it.next().flatten(), it.next().flatten(), it.next().flatten()) {
                (Some(r), Some(g), Some(b)) => Some((r, g, b)),
                _ => None,
            }
        }
        6 => match (
            channel(&digits[0..2]),
            channel(&digits[2..4]),
            channel(&digits[4..6]),
        ) {
            (Some(r), Some(g), Some(b)) => Some((r, g, b)),
            _ => None,
        },
        _ => None,
    };

    let (r, g, b) = rgb.unwrap_or((1.0, 0.0, 1.0));
    [r, g, b, alpha]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.067, 0.067, 0.067, 1.0]; // #111
    pub const WALL: [f32; 4] = [0.2, 0.2, 0.2, 1.0]; // #333
    pub const FLOOR_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FADING_OUTLINE: [f32; 4] = [1.0, 0.4, 0.4, 1.0]; // #ff6666
    pub const COIN_GLOW: [f32; 4] = [1.0, 0.843, 0.0, 0.3];
    pub const COIN_OUTLINE: [f32; 4] = [1.0, 0.647, 0.0, 1.0]; // #FFA500
    pub const COIN_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const BOOST_HINT: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BOOST_ACTIVATED: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
    pub const WIND_ARROW: [f32; 4] = [0.6, 0.85, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(hex_color("#ffffff", 1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(hex_color("#f00", 0.5), [1.0, 0.0, 0.0, 0.5]);
        let grey = hex_color("#666", 1.0);
        assert_eq!(grey[0], 0x66 as f32 / 255.0);
        assert_eq!(hex_color("nope", 1.0), [1.0, 0.0, 1.0, 1.0]);
        assert_eq!(hex_color("#zzzzzz", 1.0), [1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_flatten_layout() {
        let v = [Vertex::new(1.0, 2.0, [0.1, 0.2, 0.3, 0.4])];
        assert_eq!(flatten(&v), vec![1.0, 2.0, 0.1, 0.2, 0.3, 0.4]);
        assert_eq!(std::mem::size_of::<Vertex>(), Vertex::FLOATS * 4);
    }
}
