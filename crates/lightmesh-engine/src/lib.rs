//! Lightmesh Engine - render sessions around the core compositor
//!
//! The engine owns the mutable side of rendering: the scene an editor (or a
//! scene file) describes, the glyph field built once at startup, the frame
//! clock, and the loop that turns refresh ticks into frames.
//!
//! ## Example
//!
//! ```ignore
//! use lightmesh_engine::{EngineConfig, FixedRate, RenderSession, StopHandle};
//!
//! let session = RenderSession::new(EngineConfig::default())?;
//!
//! // Move the colored light between frames
//! session.edit(|scene| {
//!     if let Some(light) = scene.light_mut(6) {
//!         light.position.x = 0.3;
//!     }
//! });
//!
//! // Render 60 frames at 30 fps
//! let mut signal = FixedRate::new(30.0).take(60);
//! session.run_loop(&mut signal, &StopHandle::new(), |frame| {
//!     frame.image.save(format!("frame_{:04}.png", frame.index))
//! })?;
//! ```

pub mod config;
pub mod scene;
pub mod session;

pub use config::{EngineConfig, GlyphPolicy, MIN_FPS};
pub use scene::Scene;
pub use session::{
    FixedRate, FrameClock, MAX_FRAME_INTERVAL, RefreshSignal, RenderSession, RenderedFrame,
    SessionError, StopHandle,
};

// Re-export commonly used types from dependencies
pub use lightmesh_core::frame::FrameSnapshot;
pub use lightmesh_core::glyph::{GlyphField, GlyphSet};
pub use lightmesh_core::palette::{ColorKey, Palette, PaletteEntry};
pub use lightmesh_core::{GlobalParameters, LightSource, MAX_LIGHTS, ShapeKind};
