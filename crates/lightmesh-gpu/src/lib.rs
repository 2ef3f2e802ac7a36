//! Lightmesh GPU - WGPU fragment-shader backend
//!
//! Renders the same frames as `lightmesh_core::frame` in a single
//! full-screen pass. Weights are combined in the log domain on both paths
//! so the GPU and CPU images agree up to floating-point precision.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lightmesh_core::prelude::*;
//! use lightmesh_gpu::GpuRenderer;
//!
//! let glyph = build_glyph_field(&GlyphSet::wordmark())?;
//! let renderer = GpuRenderer::headless(&glyph)?;
//! let snapshot = FrameSnapshot::new(&lights, &Palette::practices(), GlobalParameters::default(), 0.0)?;
//! renderer.render_to_image(&snapshot, 1280, 720)?.save("frame.png")?;
//! ```

pub mod error;
pub mod renderer;
pub mod uniforms;

// Re-export wgpu for callers that bring their own surface
pub use wgpu;

pub use error::{GpuError, Result};
pub use renderer::{GRADIENT_SHADER, GpuRenderer, init_headless, padded_row_bytes};
pub use uniforms::{FrameUniforms, GpuLight};
