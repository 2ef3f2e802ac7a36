//! Glyph distance-field builder
//!
//! Turns a fixed set of vector paths into an RGBA8 texture whose alpha
//! channel holds the quantized distance to the nearest covered pixel. The
//! texture is built once per session and then only sampled.
//!
//! ## Pipeline
//!
//! ```text
//! SVG path data → [raster] coverage mask → [chamfer] distances → RGBA8 texture
//! ```

pub mod chamfer;
pub mod raster;

use crate::{Error, Result};
use glam::Vec2;
use image::{GrayImage, Luma, RgbaImage};
use std::borrow::Cow;
use std::path::Path;

pub use chamfer::chamfer_distance;
pub use raster::rasterize;

/// The wordmark glyphs rendered by [`ShapeKind::Glyph`](crate::ShapeKind::Glyph) sources
pub const WORDMARK_PATHS: [&str; 5] = [
    "M352.404,197.609c-4.391,9.829-15.058,16.94-28.86,16.94-30.323,0-50.4-23.631-50.4-54.792,0-30.115,19.658-53.956,49.564-53.956,18.403,0,26.978,9.829,29.487,15.685v-7.861c0-2.704,2.192-4.896,4.896-4.896h17.186c2.704,0,4.896,2.192,4.896,4.896v79.382c0,5.357.213,10.005.432,13.407.175,2.694-1.868,5.021-4.562,5.196-.107.007-.215.01-.323.01h-16.99c-2.516-.002-4.62-1.911-4.868-4.414-.253-2.476-.458-5.477-.458-8.342v-1.255ZM326.89,190.499c14.43,0,25.305-11.922,25.305-30.743s-10.665-29.906-25.305-29.906c-14.848,0-25.723,11.084-25.723,29.906,0,18.611,10.665,30.743,25.723,30.743h0Z",
    "M419.633,211.62h-18.022c-2.704,0-4.896-2.192-4.896-4.896h0v-93.099c0-2.704,2.192-4.896,4.896-4.896h17.186c2.704,0,4.896,2.192,4.896,4.896h0v7.861c6.274-10.665,18.612-15.476,29.696-15.476,25.515,0,37.226,18.195,37.226,40.78v59.934c0,2.704-2.192,4.896-4.896,4.896h-18.022c-2.704,0-4.896-2.192-4.896-4.896h0v-55.125c0-11.502-5.646-20.494-19.031-20.494-12.129,0-19.24,9.41-19.24,21.331v54.288c0,2.704-2.192,4.896-4.896,4.896Z",
    "M648.755,200.537c-5.646,9.619-17.567,13.803-28.442,13.803-24.886,0-39.107-18.195-39.107-40.571v-60.143c0-2.704,2.192-4.896,4.896-4.896h18.022c2.704,0,4.896,2.192,4.896,4.896h0v54.496c0,11.502,5.856,20.705,18.822,20.705,12.339,0,19.449-8.366,19.449-20.286v-54.914c0-2.704,2.192-4.896,4.896-4.896h18.022c2.704,0,4.896,2.192,4.896,4.896h0v79.382c0,5.01.249,9.686.538,13.35.208,2.691-1.805,5.041-4.497,5.249-.128.01-.256.015-.385.014h-16.844c-2.543.005-4.665-1.942-4.879-4.476-.169-2.054-.284-4.417-.284-6.608Z",
    "M569.392,113.625v17.161c0,2.704-2.192,4.896-4.896,4.896h-18.034v40.805c0,8.992,4.182,11.92,12.129,11.92,2.88.028,5.754-.253,8.575-.837v19.5c-.001,2.225-1.518,4.162-3.677,4.699-3.934.929-7.967,1.371-12.008,1.315-.186,0-.573-.001-.757-.003-19.753-.218-32.069-12.101-32.069-31.785v-45.614h-15.966c-2.704,0-4.896-2.192-4.896-4.896h0v-17.161c0-2.704,2.192-4.896,4.896-4.896h61.808c2.704,0,4.896,2.192,4.896,4.896h0Z",
    "M257.346,214.494c-5.816,0-11.264-3.616-13.322-9.41l-17.211-48.464-23.963,49.856c-2.354,4.898-7.308,8.013-12.742,8.013s-10.387-3.115-12.742-8.013l-23.963-49.856-17.211,48.464c-2.614,7.357-10.696,11.206-18.053,8.59-7.357-2.612-11.204-10.695-8.591-18.053l28.57-80.448c1.91-5.379,6.868-9.081,12.567-9.386,5.705-.311,11.024,2.848,13.497,7.993l25.926,53.939,25.926-53.939c2.473-5.145,7.792-8.306,13.497-7.993,5.699.305,10.657,4.007,12.567,9.386l28.57,80.448c2.613,7.357-1.234,15.441-8.591,18.053-1.563.556-3.161.819-4.731.819Z",
];

/// Alpha units per pixel of chamfer distance
pub const DISTANCE_SCALE: f32 = 0.8;

/// A set of vector paths and the canvas they are rasterized onto
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSet {
    /// SVG path data, filled in order
    pub paths: Vec<Cow<'static, str>>,
    pub width: u32,
    pub height: u32,
    /// Canvas translation applied after scaling
    pub translate: Vec2,
    /// Uniform path scale
    pub scale: f32,
    /// Alpha units per pixel of distance before saturation at 255
    pub distance_scale: f32,
}

impl GlyphSet {
    /// Empty canvas with an identity transform
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            paths: Vec::new(),
            width,
            height,
            translate: Vec2::ZERO,
            scale: 1.0,
            distance_scale: DISTANCE_SCALE,
        }
    }

    /// The built-in wordmark on a 2048x680 canvas
    pub fn wordmark() -> Self {
        Self {
            paths: WORDMARK_PATHS.iter().map(|&p| Cow::Borrowed(p)).collect(),
            width: 2048,
            height: 680,
            translate: Vec2::new(240.0, 20.0),
            scale: 2.0,
            distance_scale: DISTANCE_SCALE,
        }
    }

    pub fn with_path(mut self, data: impl Into<Cow<'static, str>>) -> Self {
        self.paths.push(data.into());
        self
    }

    pub fn with_transform(mut self, translate: Vec2, scale: f32) -> Self {
        self.translate = translate;
        self.scale = scale;
        self
    }

    pub fn with_distance_scale(mut self, scale: f32) -> Self {
        self.distance_scale = scale;
        self
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::wordmark()
    }
}

/// Build the distance-field texture for a glyph set
///
/// Deterministic: the same set always yields byte-identical pixels.
pub fn build_glyph_field(set: &GlyphSet) -> Result<GlyphField> {
    let coverage = rasterize(set)?;
    let dist = chamfer_distance(&coverage, set.width as usize, set.height as usize);
    GlyphField::from_rgba(set.width, set.height, quantize(&dist, set.distance_scale))
}

/// Pack distances as white RGBA texels with the distance in alpha
fn quantize(dist: &[f32], scale: f32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(dist.len() * 4);
    for &d in dist {
        let alpha = (d * scale).clamp(0.0, 255.0) as u8;
        pixels.extend_from_slice(&[255, 255, 255, alpha]);
    }
    pixels
}

/// Immutable RGBA8 distance-field texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphField {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GlyphField {
    /// Wrap raw RGBA8 pixels, row 0 at the top
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "glyph texture needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single saturated texel: every sample reads the maximum distance, so
    /// glyph sources have no interior.
    pub fn saturated() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> (Vec<u8>, u32, u32) {
        (self.pixels, self.width, self.height)
    }

    /// Alpha of a single texel, `None` outside the field
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.texel(x, y))
    }

    // Callers keep x < width and y < height
    fn texel(&self, x: u32, y: u32) -> u8 {
        let idx = (y as usize * self.width as usize + x as usize) * 4 + 3;
        self.pixels[idx]
    }

    /// Bilinear alpha sample in 0..1 with clamp-to-edge addressing
    ///
    /// Texel centers sit at `(i + 0.5) / size`, like a GPU sampler with
    /// linear filtering.
    pub fn sample(&self, uv: Vec2) -> f32 {
        let (x0, x1, fx) = Self::taps(uv.x, self.width);
        let (y0, y1, fy) = Self::taps(uv.y, self.height);

        let a00 = f32::from(self.texel(x0, y0));
        let a10 = f32::from(self.texel(x1, y0));
        let a01 = f32::from(self.texel(x0, y1));
        let a11 = f32::from(self.texel(x1, y1));

        let top = a00 + (a10 - a00) * fx;
        let bottom = a01 + (a11 - a01) * fx;
        (top + (bottom - top) * fy) / 255.0
    }

    fn taps(coord: f32, size: u32) -> (u32, u32, f32) {
        let max = size.saturating_sub(1) as f32;
        let texel = coord * size as f32 - 0.5;
        let base = texel.floor();
        let frac = if texel.is_finite() { texel - base } else { 0.0 };
        let i0 = base.clamp(0.0, max) as u32;
        let i1 = (base + 1.0).clamp(0.0, max) as u32;
        (i0, i1, frac)
    }

    /// RGBA image of the raw texture
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let idx = (y as usize * self.width as usize + x as usize) * 4;
            image::Rgba([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        })
    }

    /// Grayscale view of the distance channel (black on the glyph)
    pub fn distance_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| Luma([self.texel(x, y)]))
    }

    /// Save the distance channel as a grayscale PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.distance_image().save(path)?;
        Ok(())
    }
}
