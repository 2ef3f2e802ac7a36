//! CPU frame renderer
//!
//! Pixels are independent, so scanlines are shaded in parallel with Rayon.

use crate::compositor::FrameLights;
use crate::glyph::GlyphField;
use crate::light::{GlobalParameters, LightSource};
use crate::palette::Palette;
use crate::post::PixelShader;
use crate::{Error, Result};
use glam::{Vec2, Vec3};
use image::RgbaImage;
use rayon::prelude::*;

/// Immutable copy of everything one frame needs apart from its size
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Lights with palette colors already resolved
    pub lights: FrameLights,
    pub globals: GlobalParameters,
    /// Animation time in seconds
    pub time: f32,
}

impl FrameSnapshot {
    pub fn new(
        lights: &[LightSource],
        palette: &Palette,
        globals: GlobalParameters,
        time: f32,
    ) -> Result<Self> {
        Ok(Self {
            lights: FrameLights::new(lights, palette)?,
            globals,
            time,
        })
    }

    /// Shade the snapshot on the CPU
    pub fn render(&self, size: (u32, u32), glyph: &GlyphField) -> Result<RgbaImage> {
        render_resolved(&self.lights, &self.globals, self.time, size, glyph)
    }
}

/// Render one frame from raw light sources
///
/// Resolves palette colors, rejects more than
/// [`MAX_LIGHTS`](crate::MAX_LIGHTS) sources and zero-sized outputs.
pub fn render_frame(
    lights: &[LightSource],
    globals: &GlobalParameters,
    time: f32,
    (width, height): (u32, u32),
    glyph: &GlyphField,
    palette: &Palette,
) -> Result<RgbaImage> {
    let frame = FrameLights::new(lights, palette)?;
    render_resolved(&frame, globals, time, (width, height), glyph)
}

/// Render one frame from an already resolved light list
pub fn render_resolved(
    frame: &FrameLights,
    globals: &GlobalParameters,
    time: f32,
    (width, height): (u32, u32),
    glyph: &GlyphField,
) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(invalid_dims(width, height));
    }
    let row_bytes = (width as usize).checked_mul(4).ok_or_else(|| invalid_dims(width, height))?;
    let total = row_bytes
        .checked_mul(height as usize)
        .ok_or_else(|| invalid_dims(width, height))?;

    let resolution = Vec2::new(width as f32, height as f32);
    let shader = PixelShader::new(frame, globals, glyph, time, resolution);

    let mut pixels = vec![0u8; total];
    pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(row, line)| {
            let v = (row as f32 + 0.5) / resolution.y;
            for (x, px) in line.chunks_exact_mut(4).enumerate() {
                let uv = Vec2::new((x as f32 + 0.5) / resolution.x, v);
                px.copy_from_slice(&to_rgba8(shader.shade(uv)));
            }
        });

    RgbaImage::from_raw(width, height, pixels).ok_or_else(|| invalid_dims(width, height))
}

fn invalid_dims(width: u32, height: u32) -> Error {
    Error::InvalidDimensions { width, height }
}

/// Quantize a 0..1 color to opaque RGBA8
pub fn to_rgba8(color: Vec3) -> [u8; 4] {
    let [r, g, b] = color
        .clamp(Vec3::ZERO, Vec3::ONE)
        .to_array()
        .map(|c| (c * 255.0).round() as u8);
    [r, g, b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{MAX_LIGHTS, ShapeKind};
    use crate::palette::PaletteEntry;

    fn rgb_palette() -> Palette {
        let mut palette = Palette::empty();
        palette.insert(PaletteEntry::new("red", "Red", [1.0, 0.0, 0.0]));
        palette.insert(PaletteEntry::new("blue", "Blue", [0.0, 0.0, 1.0]));
        palette
    }

    fn render(lights: &[LightSource], globals: &GlobalParameters, size: (u32, u32)) -> RgbaImage {
        render_frame(
            lights,
            globals,
            0.0,
            size,
            &GlyphField::saturated(),
            &rgb_palette(),
        )
        .unwrap()
    }

    #[test]
    fn rgba8_quantization() {
        assert_eq!(to_rgba8(Vec3::new(0.0, 0.5, 1.0)), [0, 128, 255, 255]);
        assert_eq!(to_rgba8(Vec3::new(-1.0, 2.0, 0.2)), [0, 255, 51, 255]);
    }

    #[test]
    fn rejects_zero_sized_output() {
        let result = render_frame(
            &[],
            &GlobalParameters::default(),
            0.0,
            (0, 16),
            &GlyphField::saturated(),
            &rgb_palette(),
        );
        assert!(matches!(result, Err(Error::InvalidDimensions { width: 0, height: 16 })));
    }

    #[test]
    fn rejects_too_many_lights() {
        let lights = vec![LightSource::new(0.5, 0.5); MAX_LIGHTS + 1];
        let result = render_frame(
            &lights,
            &GlobalParameters::default(),
            0.0,
            (8, 8),
            &GlyphField::saturated(),
            &rgb_palette(),
        );
        assert!(matches!(result, Err(Error::TooManyLights { .. })));
    }

    #[test]
    fn single_red_source_is_red_at_center() {
        let lights = [LightSource::new(0.5, 0.5).with_color("red")];
        let img = render(&lights, &GlobalParameters::neutral(), (33, 33));
        assert_eq!(img.get_pixel(16, 16).0, [255, 0, 0, 255]);
    }

    #[test]
    fn symmetric_pair_blends_to_purple_at_midpoint() {
        let lights = [
            LightSource::new(0.3, 0.5).with_color("red"),
            LightSource::new(0.7, 0.5).with_color("blue"),
        ];
        let img = render(&lights, &GlobalParameters::neutral(), (65, 65));
        let [r, g, b, a] = img.get_pixel(32, 32).0;
        assert!((127..=128).contains(&r), "red {r}");
        assert_eq!(g, 0);
        assert!((127..=128).contains(&b), "blue {b}");
        assert_eq!(a, 255);
    }

    #[test]
    fn uncolored_scene_is_black() {
        let corners = [
            LightSource::new(0.08, 0.08),
            LightSource::new(0.92, 0.08),
            LightSource::new(0.5, 0.5).with_shape(ShapeKind::Diamond, 0.2),
        ];
        let styled = GlobalParameters {
            contrast: 1.4,
            bloom: 0.8,
            chromatic_aberration: 0.05,
            scanline_intensity: 0.5,
            ..GlobalParameters::default()
        };
        let empty: &[LightSource] = &[];
        for lights in [&corners[..], empty] {
            for globals in [GlobalParameters::default(), styled] {
                let img = render(lights, &globals, (24, 16));
                assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn square_interior_takes_source_color() {
        let lights = [
            LightSource::new(0.5, 0.5)
                .with_color("blue")
                .with_shape(ShapeKind::Square, 0.1),
            LightSource::new(0.05, 0.05).with_color("red"),
            LightSource::new(0.95, 0.95),
        ];
        let img = render(&lights, &GlobalParameters::neutral(), (40, 40));
        // Pixels 17..=22 have centers strictly inside the 0.4..0.6 box
        for y in 17..=22 {
            for x in 17..=22 {
                assert_eq!(img.get_pixel(x, y).0, [0, 0, 255, 255], "pixel {x},{y}");
            }
        }
    }

    #[test]
    fn rows_run_top_to_bottom() {
        let lights = [
            LightSource::new(0.5, 0.1).with_color("red"),
            LightSource::new(0.5, 0.9).with_color("blue"),
        ];
        let img = render(&lights, &GlobalParameters::neutral(), (16, 16));
        let top = img.get_pixel(8, 1).0;
        let bottom = img.get_pixel(8, 14).0;
        assert!(top[0] > 200 && top[2] < 50);
        assert!(bottom[2] > 200 && bottom[0] < 50);
    }

    #[test]
    fn frames_are_deterministic() {
        let lights = [
            LightSource::new(0.2, 0.7).with_color("red"),
            LightSource::new(0.6, 0.3).with_color("blue").with_softness(0.7),
        ];
        let globals = GlobalParameters {
            grain: 0.1,
            ..GlobalParameters::default()
        };
        let glyph = GlyphField::saturated();
        let a = render_frame(&lights, &globals, 2.5, (48, 27), &glyph, &rgb_palette()).unwrap();
        let b = FrameSnapshot::new(&lights, &rgb_palette(), globals, 2.5)
            .unwrap()
            .render((48, 27), &glyph)
            .unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
