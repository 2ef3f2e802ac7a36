//! Error types for Lightmesh

use thiserror::Error;

/// Result type alias using Lightmesh's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Lightmesh operations
#[derive(Error, Debug)]
pub enum Error {
    /// Glyph path could not be parsed or rasterized
    #[error("Glyph rasterization failed: {0}")]
    Glyph(String),

    /// A canvas, texture, or output surface has a zero or oversized dimension
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// More light sources than the compositor can bind
    #[error("Too many light sources: {count} (maximum is {max})")]
    TooManyLights { count: usize, max: usize },

    /// Light index out of range
    #[error("No light source at index {0}")]
    NoSuchLight(usize),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Image encoding/decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
