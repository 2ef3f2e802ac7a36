//! Vector glyph rasterization
//!
//! Paths are parsed from SVG path data with kurbo and filled with tiny-skia,
//! white on black, using the non-zero winding rule.

use super::GlyphSet;
use crate::{Error, Result};
use kurbo::{BezPath, PathEl};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

/// Red channel above which a pixel counts as covered
const COVERAGE_THRESHOLD: u8 = 128;

/// Rasterize every path of the set into a row-major coverage mask
pub fn rasterize(set: &GlyphSet) -> Result<Vec<bool>> {
    let mut pixmap = Pixmap::new(set.width, set.height).ok_or(Error::InvalidDimensions {
        width: set.width,
        height: set.height,
    })?;
    pixmap.fill(Color::BLACK);

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;

    let transform = Transform::from_row(
        set.scale,
        0.0,
        0.0,
        set.scale,
        set.translate.x,
        set.translate.y,
    );

    for data in &set.paths {
        let path = parse_path(data)?;
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    Ok(pixmap
        .pixels()
        .iter()
        .map(|px| px.red() > COVERAGE_THRESHOLD)
        .collect())
}

/// Convert SVG path data into a tiny-skia path
fn parse_path(data: &str) -> Result<Path> {
    let bez = BezPath::from_svg(data.trim())
        .map_err(|e| Error::Glyph(format!("invalid path data: {e}")))?;

    let mut builder = PathBuilder::new();
    for el in bez.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32);
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }

    builder
        .finish()
        .ok_or_else(|| Error::Glyph(format!("path has no fillable area: {data:?}")))
}
