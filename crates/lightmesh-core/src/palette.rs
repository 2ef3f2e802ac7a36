//! Color palette for light sources
//!
//! Light sources never carry raw colors. They reference a palette entry by
//! [`ColorKey`], or use [`ColorKey::Black`] to contribute weight without
//! color.

use crate::{Error, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key identifying a palette entry
///
/// Serialized as a plain string. The string `"black"` maps to the uncolored
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorKey {
    /// No color contribution (the source still pulls weight towards black)
    #[default]
    Black,
    /// A named palette entry
    Named(String),
}

impl ColorKey {
    pub fn named(key: impl Into<String>) -> Self {
        Self::from(key.into())
    }

    /// Whether this key refers to a palette entry rather than the sentinel
    pub fn is_colored(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Black => "black",
            Self::Named(key) => key,
        }
    }
}

impl From<String> for ColorKey {
    fn from(key: String) -> Self {
        if key.eq_ignore_ascii_case("black") || key.is_empty() {
            Self::Black
        } else {
            Self::Named(key)
        }
    }
}

impl From<&str> for ColorKey {
    fn from(key: &str) -> Self {
        Self::from(key.to_string())
    }
}

impl From<ColorKey> for String {
    fn from(key: ColorKey) -> Self {
        match key {
            ColorKey::Black => "black".to_string(),
            ColorKey::Named(key) => key,
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single palette color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub key: String,
    pub label: String,
    /// Linear RGB in 0..1
    pub rgb: [f32; 3],
}

impl PaletteEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>, rgb: [f32; 3]) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            rgb,
        }
    }

    /// Build an entry from a `#RRGGBB` hex string
    pub fn from_hex(key: impl Into<String>, label: impl Into<String>, hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::InvalidParameter(format!(
                "expected #RRGGBB color, got {hex:?}"
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| Error::InvalidParameter(format!("invalid hex color {hex:?}")))
        };

        Ok(Self::new(
            key,
            label,
            [channel(0..2)?, channel(2..4)?, channel(4..6)?],
        ))
    }

    /// `#RRGGBB` representation
    pub fn hex(&self) -> String {
        let [r, g, b] = self.rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.rgb)
    }
}

/// Ordered set of palette entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Create an empty palette
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The four "practice" colors the editor ships with
    pub fn practices() -> Self {
        Self {
            entries: vec![
                PaletteEntry::new("mind", "Mind", [0.831, 0.722, 1.0]),
                PaletteEntry::new("core", "Core", [0.690, 0.941, 1.0]),
                PaletteEntry::new("soma", "Soma", [0.831, 1.0, 0.831]),
                PaletteEntry::new("aura", "Aura", [1.0, 0.839, 1.0]),
            ],
        }
    }

    /// Resolve a key to its RGB color
    ///
    /// Returns `None` for [`ColorKey::Black`] and for keys with no entry.
    pub fn lookup(&self, key: &ColorKey) -> Option<Vec3> {
        match key {
            ColorKey::Black => None,
            ColorKey::Named(name) => self.get(name).map(PaletteEntry::color),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Add an entry, replacing any entry with the same key
    pub fn insert(&mut self, entry: PaletteEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == entry.key) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::practices()
    }
}
