//! Inverse-power-law gradient compositor
//!
//! Every source pulls the pixel towards its own color with weight
//!
//! ```text
//! w = intensity / max(distance / radius, 1e-4) ^ (blend_power * softness)
//! ```
//!
//! and the pixel color is the weighted mean. Weights are accumulated in the
//! log domain, rescaled by the largest log-weight, so exponents that would
//! overflow `f32` still blend to the same result.

use crate::glyph::GlyphField;
use crate::light::{LightSource, MAX_LIGHTS};
use crate::palette::Palette;
use crate::shape::shape_distance;
use crate::{Error, Result};
use glam::{Vec2, Vec3};

/// Lower bound on a source's falloff radius
pub const MIN_RADIUS: f32 = 0.01;

/// Lower bound on the normalized distance, which caps the weight at the
/// center of a source
pub const MIN_DISTANCE: f32 = 1e-4;

/// Lower bound on per-source softness
pub const MIN_SOFTNESS: f32 = 0.01;

/// A light source with its palette color resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLight {
    pub source: LightSource,
    /// Palette color, or black for uncolored and unknown keys
    pub color: Vec3,
}

/// The validated, color-resolved light list for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLights {
    lights: Vec<ResolvedLight>,
}

impl FrameLights {
    /// Resolve colors and check the source bound
    pub fn new(lights: &[LightSource], palette: &Palette) -> Result<Self> {
        if lights.len() > MAX_LIGHTS {
            return Err(Error::TooManyLights {
                count: lights.len(),
                max: MAX_LIGHTS,
            });
        }

        Ok(Self {
            lights: lights
                .iter()
                .map(|source| ResolvedLight {
                    color: palette.lookup(&source.color).unwrap_or(Vec3::ZERO),
                    source: source.clone(),
                })
                .collect(),
        })
    }

    pub fn lights(&self) -> &[ResolvedLight] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Whether any source contributes color
    pub fn has_color(&self) -> bool {
        self.lights.iter().any(|l| l.color != Vec3::ZERO)
    }
}

/// Falloff exponent of a source under the given blend power
pub fn falloff_exponent(light: &LightSource, blend_power: f32) -> f32 {
    blend_power * light.softness.max(MIN_SOFTNESS)
}

/// Natural log of a source's weight at a raw shape distance
///
/// Returns negative infinity for sources with no weight.
pub fn log_weight(distance: f32, light: &LightSource, blend_power: f32) -> f32 {
    if light.intensity.is_nan() || light.intensity <= 0.0 {
        return f32::NEG_INFINITY;
    }
    let normalized = (distance / light.radius.max(MIN_RADIUS)).max(MIN_DISTANCE);
    light.intensity.ln() - falloff_exponent(light, blend_power) * normalized.ln()
}

/// A source's weight at a raw shape distance
///
/// May overflow to infinity for large exponents; the compositor itself works
/// with [`log_weight`].
pub fn source_weight(distance: f32, light: &LightSource, blend_power: f32) -> f32 {
    log_weight(distance, light, blend_power).exp()
}

/// Blend all sources at `uv`
///
/// Returns black for an empty list or when no source has a finite, positive
/// weight. The result is not clamped.
pub fn composite(uv: Vec2, frame: &FrameLights, blend_power: f32, glyph: &GlyphField) -> Vec3 {
    let mut logs = [f32::NEG_INFINITY; MAX_LIGHTS];
    let mut max_log = f32::NEG_INFINITY;

    for (slot, light) in logs.iter_mut().zip(&frame.lights) {
        let dist = shape_distance(uv, &light.source, glyph);
        let lw = log_weight(dist, &light.source, blend_power);
        if lw.is_finite() {
            *slot = lw;
            max_log = max_log.max(lw);
        }
    }

    if !max_log.is_finite() {
        return Vec3::ZERO;
    }

    let mut color = Vec3::ZERO;
    let mut total = 0.0;
    for (&lw, light) in logs.iter().zip(&frame.lights) {
        if lw.is_finite() {
            let w = (lw - max_log).exp();
            color += light.color * w;
            total += w;
        }
    }

    if total > 0.0 && total.is_finite() {
        color / total
    } else {
        Vec3::ZERO
    }
}
