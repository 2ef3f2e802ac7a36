//! Per-pixel shading: compositor plus post-processing
//!
//! Stages run in a fixed order:
//!
//! 1. Domain warp (value noise)
//! 2. Chromatic aberration
//! 3. Contrast curve
//! 4. Bloom
//! 5. Vignette
//! 6. Scanlines
//! 7. Grain
//!
//! Each stage is a no-op at its neutral parameter value, see
//! [`GlobalParameters::neutral`].

use crate::compositor::{FrameLights, composite};
use crate::glyph::GlyphField;
use crate::light::GlobalParameters;
use crate::noise::{HashValueNoise, hash, sample2};
use glam::{Vec2, Vec3};
use noise::NoiseFn;

/// Below this, chromatic aberration and scanlines are skipped entirely
const STAGE_EPSILON: f32 = 0.001;

const LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Hermite interpolation between two edges, GLSL semantics
///
/// `edge0 > edge1` yields a falling curve.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Everything needed to shade one frame's pixels
#[derive(Debug, Clone, Copy)]
pub struct PixelShader<'a, N = HashValueNoise> {
    pub frame: &'a FrameLights,
    pub globals: &'a GlobalParameters,
    pub glyph: &'a GlyphField,
    /// Animation time in seconds
    pub time: f32,
    /// Output size in pixels, used by the grain stage
    pub resolution: Vec2,
    /// Noise driving the domain warp
    pub warp_noise: N,
}

impl<'a> PixelShader<'a> {
    pub fn new(
        frame: &'a FrameLights,
        globals: &'a GlobalParameters,
        glyph: &'a GlyphField,
        time: f32,
        resolution: Vec2,
    ) -> Self {
        Self {
            frame,
            globals,
            glyph,
            time,
            resolution,
            warp_noise: HashValueNoise,
        }
    }
}

impl<'a, N: NoiseFn<f64, 2>> PixelShader<'a, N> {
    /// Swap the domain warp noise source
    pub fn with_warp_noise<M: NoiseFn<f64, 2>>(self, noise: M) -> PixelShader<'a, M> {
        PixelShader {
            frame: self.frame,
            globals: self.globals,
            glyph: self.glyph,
            time: self.time,
            resolution: self.resolution,
            warp_noise: noise,
        }
    }

    /// Compositor output at `uv`, without any post-processing
    pub fn gradient(&self, uv: Vec2) -> Vec3 {
        composite(uv, self.frame, self.globals.blend_power, self.glyph)
    }

    /// Final color at `uv` (0..1 per channel, y down)
    pub fn shade(&self, uv: Vec2) -> Vec3 {
        let g = self.globals;
        let t = self.time;

        let n = sample2(&self.warp_noise, uv * 5.0 + t * 0.03) * g.warp_amount;
        let uv = uv + Vec2::new(n, n * 0.8);

        let mut col = if g.chromatic_aberration > STAGE_EPSILON {
            let dir = (uv - 0.5) * g.chromatic_aberration;
            Vec3::new(
                self.gradient(uv + dir).x,
                self.gradient(uv).y,
                self.gradient(uv - dir).z,
            )
        } else {
            self.gradient(uv)
        };

        col = safe_pow(col, g.contrast);

        let lum = col.dot(LUMA);
        col += col * smoothstep(0.4, 1.0, lum) * g.bloom;

        let vig = smoothstep(1.2, 0.3, ((uv - 0.5) * 1.8).length() * g.vignette);
        col *= mix(0.85, 1.0, vig);

        if g.scanline_intensity > STAGE_EPSILON {
            let lines = (uv.x * g.scanline_frequency * 100.0).sin().abs();
            let sc = smoothstep(0.3, 0.5, lines);
            col *= mix(1.0, sc, g.scanline_intensity);
        }

        col += (hash(uv * self.resolution * 0.01 + t) - 0.5) * g.grain;

        col.clamp(Vec3::ZERO, Vec3::ONE)
    }
}

/// Component-wise `c^e` over non-negative channels
///
/// A zero channel maps to 0 for positive exponents and 1 otherwise, matching
/// the GPU pass where `pow` is undefined at a zero base.
pub fn safe_pow(c: Vec3, e: f32) -> Vec3 {
    let at_zero = if e > 0.0 { 0.0 } else { 1.0 };
    let pow = |x: f32| if x <= 0.0 { at_zero } else { x.powf(e) };
    let c = c.max(Vec3::ZERO);
    Vec3::new(pow(c.x), pow(c.y), pow(c.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightSource;
    use crate::palette::{Palette, PaletteEntry};
    use approx::assert_relative_eq;

    fn palette() -> Palette {
        let mut palette = Palette::empty();
        palette.insert(PaletteEntry::new("warm", "Warm", [0.9, 0.6, 0.2]));
        palette.insert(PaletteEntry::new("cool", "Cool", [0.1, 0.4, 0.8]));
        palette
    }

    fn scene() -> FrameLights {
        let lights = [
            LightSource::new(0.25, 0.3).with_color("warm"),
            LightSource::new(0.75, 0.6).with_color("cool").with_radius(0.3),
            LightSource::new(0.9, 0.1),
        ];
        FrameLights::new(&lights, &palette()).unwrap()
    }

    fn probes() -> Vec<Vec2> {
        (0..8)
            .flat_map(|y| (0..8).map(move |x| Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / 8.0))
            .collect()
    }

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-6);
    }

    #[test]
    fn smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        // Reversed edges fall
        assert_eq!(smoothstep(1.2, 0.3, 0.0), 1.0);
        assert_eq!(smoothstep(1.2, 0.3, 2.0), 0.0);
    }

    #[test]
    fn neutral_parameters_pass_gradient_through() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters::neutral();
        for time in [0.0, 3.7] {
            let shader = PixelShader::new(&frame, &globals, &glyph, time, Vec2::new(64.0, 64.0));
            for uv in probes() {
                assert_vec3_eq(shader.shade(uv), shader.gradient(uv));
            }
        }
    }

    #[test]
    fn zero_warp_noise_matches_zero_amplitude() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters::default();
        let flat = GlobalParameters {
            warp_amount: 0.0,
            ..globals
        };
        let res = Vec2::new(32.0, 32.0);

        let silenced = PixelShader::new(&frame, &globals, &glyph, 1.0, res)
            .with_warp_noise(noise::Constant::new(0.0));
        let unwarped = PixelShader::new(&frame, &flat, &glyph, 1.0, res);
        for uv in probes() {
            assert_vec3_eq(silenced.shade(uv), unwarped.shade(uv));
        }
    }

    #[test]
    fn warp_moves_with_time() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            warp_amount: 0.05,
            ..GlobalParameters::neutral()
        };
        let res = Vec2::new(32.0, 32.0);
        let a = PixelShader::new(&frame, &globals, &glyph, 0.0, res);
        let b = PixelShader::new(&frame, &globals, &glyph, 40.0, res);
        assert!(probes().iter().any(|&uv| (a.shade(uv) - b.shade(uv)).length() > 1e-4));
    }

    #[test]
    fn vignette_darkens_corners_only() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            vignette: 1.0,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.0, Vec2::splat(64.0));

        let center = Vec2::splat(0.5);
        assert_vec3_eq(shader.shade(center), shader.gradient(center));

        let corner = Vec2::new(0.02, 0.98);
        let raw = shader.gradient(corner);
        let shaded = shader.shade(corner);
        assert!(shaded.x < raw.x && shaded.y < raw.y && shaded.z < raw.z);
        assert!(shaded.x >= raw.x * 0.85 - 1e-6);
    }

    #[test]
    fn contrast_darkens_midtones() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            contrast: 2.0,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.0, Vec2::splat(64.0));
        let uv = Vec2::new(0.3, 0.3);
        let raw = shader.gradient(uv);
        assert_relative_eq!(shader.shade(uv).x, raw.x * raw.x, epsilon = 1e-6);
    }

    #[test]
    fn zero_contrast_lifts_black_to_white() {
        assert_eq!(safe_pow(Vec3::ZERO, 0.0), Vec3::ONE);
        assert_eq!(safe_pow(Vec3::ZERO, -1.0), Vec3::ONE);
        assert_eq!(safe_pow(Vec3::ZERO, 2.0), Vec3::ZERO);
        assert_vec3_eq(safe_pow(Vec3::new(0.5, -0.2, 1.0), 2.0), Vec3::new(0.25, 0.0, 1.0));

        let frame = FrameLights::new(&[], &palette()).unwrap();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            contrast: 0.0,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.0, Vec2::splat(64.0));
        let uv = Vec2::new(0.4, 0.6);
        assert_eq!(shader.gradient(uv), Vec3::ZERO);
        assert_vec3_eq(shader.shade(uv), Vec3::ONE);
    }

    #[test]
    fn bloom_brightens_bright_pixels() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            bloom: 0.5,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.0, Vec2::splat(64.0));
        let uv = Vec2::new(0.25, 0.3);
        assert!(shader.shade(uv).y > shader.gradient(uv).y);
    }

    #[test]
    fn chromatic_aberration_splits_channels() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            chromatic_aberration: 0.2,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.0, Vec2::splat(64.0));

        // At the exact center the offset vanishes
        let center = Vec2::splat(0.5);
        assert_vec3_eq(shader.shade(center), shader.gradient(center));

        let uv = Vec2::new(0.1, 0.8);
        let dir = (uv - 0.5) * 0.2;
        let shaded = shader.shade(uv);
        assert_relative_eq!(shaded.x, shader.gradient(uv + dir).x, epsilon = 1e-6);
        assert_relative_eq!(shaded.y, shader.gradient(uv).y, epsilon = 1e-6);
        assert_relative_eq!(shaded.z, shader.gradient(uv - dir).z, epsilon = 1e-6);
    }

    #[test]
    fn full_scanlines_black_out_troughs() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            scanline_intensity: 1.0,
            scanline_frequency: 1.0,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.0, Vec2::splat(64.0));
        // sin(x * 100) crosses zero at x = pi / 100
        let trough = Vec2::new(std::f32::consts::PI / 100.0, 0.5);
        assert_eq!(shader.shade(trough), Vec3::ZERO);
    }

    #[test]
    fn grain_perturbs_and_output_stays_clamped() {
        let frame = scene();
        let glyph = GlyphField::saturated();
        let globals = GlobalParameters {
            grain: 2.0,
            ..GlobalParameters::neutral()
        };
        let shader = PixelShader::new(&frame, &globals, &glyph, 0.5, Vec2::splat(64.0));
        let mut changed = false;
        for uv in probes() {
            let c = shader.shade(uv);
            assert!(c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all());
            changed |= (c - shader.gradient(uv)).length() > 1e-3;
        }
        assert!(changed);
    }
}
