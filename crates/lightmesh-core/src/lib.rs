//! # Lightmesh Core
//!
//! Mesh gradients from a handful of shaped light sources.
//!
//! Each source pulls nearby pixels towards its palette color with an
//! inverse-power-law weight; the weighted mean is then run through a short
//! post-processing chain (warp, chromatic aberration, contrast, bloom,
//! vignette, scanlines, grain).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lightmesh_core::prelude::*;
//!
//! let lights = [
//!     LightSource::new(0.08, 0.08),
//!     LightSource::new(0.5, 0.42).with_color("mind"),
//!     LightSource::new(0.3, 0.7)
//!         .with_color("aura")
//!         .with_shape(ShapeKind::Glyph, 0.15),
//! ];
//!
//! let glyph = build_glyph_field(&GlyphSet::wordmark())?;
//! let image = render_frame(
//!     &lights,
//!     &GlobalParameters::default(),
//!     0.0,
//!     (1280, 720),
//!     &glyph,
//!     &Palette::practices(),
//! )?;
//! image.save("gradient.png")?;
//! ```
//!
//! ## Conventions
//!
//! - **Coordinates**: normalized `0..1` on both axes, x right, y down
//! - **Angles**: radians (see [`LightSource::with_angle_degrees`])
//! - **Colors**: linear `0..1` RGB, quantized to RGBA8 only on output
//! - **Sources**: at most [`MAX_LIGHTS`] per frame

pub mod compositor;
pub mod frame;
pub mod glyph;
pub mod light;
pub mod noise;
pub mod palette;
pub mod post;
pub mod shape;

mod error;

pub use error::{Error, Result};
pub use light::{GlobalParameters, LightSource, MAX_LIGHTS, ShapeKind};

/// Prelude module for convenient imports
pub mod prelude {
    // Scene description
    pub use crate::light::{GlobalParameters, LightSource, MAX_LIGHTS, ShapeKind};
    pub use crate::palette::{ColorKey, Palette, PaletteEntry};

    // Glyph distance field
    pub use crate::glyph::{GlyphField, GlyphSet, build_glyph_field};

    // Rendering
    pub use crate::compositor::{FrameLights, composite};
    pub use crate::frame::{FrameSnapshot, render_frame, render_resolved};
    pub use crate::post::PixelShader;
    pub use crate::shape::shape_distance;

    // Math (re-export glam)
    pub use glam::{Vec2, Vec3};

    // Error handling
    pub use crate::{Error, Result};
}
