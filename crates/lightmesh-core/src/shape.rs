//! Closed-form 2D distance functions for light source shapes
//!
//! Distances are unsigned: 0 inside or on a filled shape, growing outward.

use crate::glyph::GlyphField;
use crate::light::{LightSource, ShapeKind};
use glam::Vec2;

/// Lower bound applied to `stretch` before dividing by it
pub const MIN_STRETCH: f32 = 0.01;

/// Signed distance to an origin-centered box with half-extents `b`
pub fn sd_box(p: Vec2, b: Vec2) -> f32 {
    let q = p.abs() - b;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

/// Distance from `p` to the segment `a..b`
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length()
}

/// Map a query point into a source's local frame
///
/// Translates to the source center, rotates by `-angle`, then divides x by
/// the stretch. Non-point shapes scale x back up by the raw stretch, so for
/// them the stretch only matters where it falls under [`MIN_STRETCH`].
pub fn local_frame(p: Vec2, light: &LightSource) -> Vec2 {
    let mut d = Vec2::from_angle(-light.angle).rotate(p - light.position);
    d.x /= light.stretch.max(MIN_STRETCH);
    if light.shape != ShapeKind::Point {
        d.x *= light.stretch;
    }
    d
}

/// Distance from `p` to a light source's shape
pub fn shape_distance(p: Vec2, light: &LightSource, glyph: &GlyphField) -> f32 {
    let d = local_frame(p, light);
    let size = light.shape_size;

    match light.shape {
        ShapeKind::Point => d.length(),
        ShapeKind::Circle => (d.length() - size).max(0.0),
        ShapeKind::Square => sd_box(d, Vec2::splat(size)).max(0.0),
        ShapeKind::Diamond => {
            let r = Vec2::new(d.x + d.y, d.y - d.x) * std::f32::consts::FRAC_1_SQRT_2;
            sd_box(r, Vec2::splat(size * 0.7)).max(0.0)
        }
        ShapeKind::Segment => sd_segment(d, Vec2::new(-size, 0.0), Vec2::new(size, 0.0)),
        ShapeKind::Glyph => glyph_distance(d, size, glyph),
    }
}

/// Distance to the glyph mask stretched over a 3:1 box
///
/// Outside the box the distance to the box is added to the edge sample so
/// the field keeps growing.
fn glyph_distance(d: Vec2, size: f32, glyph: &GlyphField) -> f32 {
    let half = Vec2::new(size * 3.0, size);
    let uv = d / half / 2.0 + 0.5;
    let outside = sd_box(d, half);
    if outside > 0.0 {
        glyph.sample(uv.clamp(Vec2::ZERO, Vec2::ONE)) + outside
    } else {
        glyph.sample(uv)
    }
}
