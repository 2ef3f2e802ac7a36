//! Error types for the GPU backend

use thiserror::Error;

/// Errors that can occur while setting up or running the GPU renderer
#[derive(Error, Debug)]
pub enum GpuError {
    /// No adapter matched the request
    #[error("No suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to open a device
    #[error("Failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Output size is zero or beyond the device's texture limit
    #[error("Invalid output size: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Output format the readback path can't convert to RGBA8
    #[error("Unsupported output format: {0:?}")]
    UnsupportedFormat(wgpu::TextureFormat),

    /// Mapping or polling the readback buffer failed
    #[error("Readback failed: {0}")]
    Readback(String),
}

/// Result type alias for GPU operations
pub type Result<T> = std::result::Result<T, GpuError>;
