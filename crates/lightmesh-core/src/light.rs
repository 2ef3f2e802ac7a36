//! Light sources and global blend parameters

use crate::palette::ColorKey;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maximum number of light sources evaluated per frame
pub const MAX_LIGHTS: usize = 16;

/// Shape of a light source's emitting region
///
/// Serialized as a lowercase name. Scene files may also use the numeric id
/// or the editor label `"line"` for [`ShapeKind::Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "ShapeRepr")]
pub enum ShapeKind {
    /// Pure radial falloff from the center
    #[default]
    Point,
    Circle,
    Square,
    Diamond,
    /// Line segment along the local x axis
    Segment,
    /// Distance-field glyph (wordmark) mask
    Glyph,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        Self::Point,
        Self::Circle,
        Self::Square,
        Self::Diamond,
        Self::Segment,
        Self::Glyph,
    ];

    /// Stable numeric id, shared with the GPU uniform layout
    pub fn id(self) -> u32 {
        match self {
            Self::Point => 0,
            Self::Circle => 1,
            Self::Square => 2,
            Self::Diamond => 3,
            Self::Segment => 4,
            Self::Glyph => 5,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Parse a shape name or editor label, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "point" => Some(Self::Point),
            "circle" => Some(Self::Circle),
            "square" => Some(Self::Square),
            "diamond" => Some(Self::Diamond),
            "segment" | "line" => Some(Self::Segment),
            "glyph" => Some(Self::Glyph),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Circle => "Circle",
            Self::Square => "Square",
            Self::Diamond => "Diamond",
            Self::Segment => "Line",
            Self::Glyph => "Glyph",
        }
    }
}

/// Accepted spellings of a shape in scene files
#[derive(Deserialize)]
#[serde(untagged)]
enum ShapeRepr {
    Id(u32),
    Name(String),
}

impl TryFrom<ShapeRepr> for ShapeKind {
    type Error = String;

    fn try_from(repr: ShapeRepr) -> Result<Self, Self::Error> {
        match repr {
            ShapeRepr::Id(id) => {
                Self::from_id(id).ok_or_else(|| format!("unknown shape id {id}, expected 0..=5"))
            }
            ShapeRepr::Name(name) => {
                Self::from_name(&name).ok_or_else(|| format!("unknown shape {name:?}"))
            }
        }
    }
}

/// A single placed light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSource {
    /// Center in normalized image coordinates (x right, y down)
    pub position: Vec2,
    pub color: ColorKey,
    /// Falloff radius; shape distances are divided by it
    pub radius: f32,
    pub intensity: f32,
    /// Multiplier on the global blend power for this source
    pub softness: f32,
    /// Anisotropy along the local x axis
    pub stretch: f32,
    /// Rotation of the local frame in radians
    pub angle: f32,
    pub shape: ShapeKind,
    /// Shape extent; ignored by [`ShapeKind::Point`]
    pub shape_size: f32,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vec2::splat(0.5),
            color: ColorKey::Black,
            radius: 0.5,
            intensity: 1.0,
            softness: 1.0,
            stretch: 1.0,
            angle: 0.0,
            shape: ShapeKind::Point,
            shape_size: 0.15,
        }
    }
}

impl LightSource {
    /// Create an uncolored point light with default parameters
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<ColorKey>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_softness(mut self, softness: f32) -> Self {
        self.softness = softness;
        self
    }

    pub fn with_stretch(mut self, stretch: f32) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_angle(mut self, radians: f32) -> Self {
        self.angle = radians;
        self
    }

    /// Set the rotation in degrees, as the editor presents it
    pub fn with_angle_degrees(self, degrees: f32) -> Self {
        self.with_angle(degrees.to_radians())
    }

    pub fn with_shape(mut self, shape: ShapeKind, size: f32) -> Self {
        self.shape = shape;
        self.shape_size = size;
        self
    }

    pub fn is_colored(&self) -> bool {
        self.color.is_colored()
    }
}

/// Global blend and post-processing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalParameters {
    /// Base falloff exponent; larger values localize each source
    pub blend_power: f32,
    pub contrast: f32,
    pub bloom: f32,
    pub grain: f32,
    pub chromatic_aberration: f32,
    pub vignette: f32,
    pub scanline_frequency: f32,
    pub scanline_intensity: f32,
    /// Amplitude of the animated domain warp
    pub warp_amount: f32,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            blend_power: 3.2,
            contrast: 1.0,
            bloom: 0.0,
            grain: 0.0,
            chromatic_aberration: 0.0,
            vignette: 1.0,
            scanline_frequency: 50.0,
            scanline_intensity: 0.0,
            warp_amount: 0.012,
        }
    }
}

impl GlobalParameters {
    /// Parameters under which every post-processing stage is a no-op
    pub fn neutral() -> Self {
        Self {
            vignette: 0.0,
            warp_amount: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_ids_round_trip() {
        for shape in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_id(shape.id()), Some(shape));
        }
        assert_eq!(ShapeKind::from_id(6), None);
    }

    #[test]
    fn light_defaults_match_editor() {
        let light = LightSource::new(0.2, 0.3);
        assert_eq!(light.position, Vec2::new(0.2, 0.3));
        assert_eq!(light.radius, 0.5);
        assert_eq!(light.shape, ShapeKind::Point);
        assert_eq!(light.shape_size, 0.15);
        assert!(!light.is_colored());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let light: LightSource =
            serde_json::from_str(r#"{ "position": [0.1, 0.9], "color": "aura", "shape": "diamond" }"#)
                .unwrap();
        assert_eq!(light.position, Vec2::new(0.1, 0.9));
        assert!(light.is_colored());
        assert_eq!(light.shape, ShapeKind::Diamond);
        assert_eq!(light.intensity, 1.0);
    }

    #[test]
    fn shapes_parse_from_ids_and_labels() {
        let by_id: ShapeKind = serde_json::from_str("2").unwrap();
        assert_eq!(by_id, ShapeKind::Square);
        let line: ShapeKind = serde_json::from_str("\"line\"").unwrap();
        assert_eq!(line, ShapeKind::Segment);
        let upper: ShapeKind = serde_json::from_str("\"Glyph\"").unwrap();
        assert_eq!(upper, ShapeKind::Glyph);

        assert!(serde_json::from_str::<ShapeKind>("6").is_err());
        assert!(serde_json::from_str::<ShapeKind>("\"star\"").is_err());
        assert_eq!(serde_json::to_string(&ShapeKind::Segment).unwrap(), "\"segment\"");
    }

    #[test]
    fn degrees_convert_to_radians() {
        let light = LightSource::new(0.5, 0.5).with_angle_degrees(180.0);
        assert!((light.angle - std::f32::consts::PI).abs() < 1e-6);
    }
}
