//! Scene representation for the Lightmesh engine
//!
//! A Scene owns the ordered light list, the global blend parameters, and the
//! palette the lights' color keys resolve against. It is the only place
//! lights are created, edited, and removed.

use anyhow::{Context, Result, bail};
use lightmesh_core::palette::{ColorKey, Palette};
use lightmesh_core::{Error, GlobalParameters, LightSource, MAX_LIGHTS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Ordered light sources plus the parameters they are rendered with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    lights: Vec<LightSource>,

    /// Blend and post-processing parameters
    pub globals: GlobalParameters,

    /// Colors the lights' keys resolve against
    pub palette: Palette,
}

impl Scene {
    /// A scene with no lights, default parameters, and the practice palette
    pub fn empty() -> Self {
        Self {
            lights: Vec::new(),
            globals: GlobalParameters::default(),
            palette: Palette::practices(),
        }
    }

    /// The editor's starting layout: six dark anchors around a single
    /// "mind" light
    pub fn default_layout() -> Self {
        let anchors = [
            (0.08, 0.08),
            (0.92, 0.08),
            (0.08, 0.92),
            (0.92, 0.92),
            (0.32, 0.68),
            (0.68, 0.28),
        ];

        let mut lights: Vec<LightSource> = anchors
            .iter()
            .map(|&(x, y)| LightSource::new(x, y))
            .collect();
        lights.push(LightSource::new(0.50, 0.42).with_color(ColorKey::named("mind")));

        Self {
            lights,
            ..Self::empty()
        }
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Append a light, returning its index
    ///
    /// Fails with [`Error::TooManyLights`] once the scene is full.
    pub fn add_light(&mut self, light: LightSource) -> lightmesh_core::Result<usize> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(Error::TooManyLights {
                count: self.lights.len() + 1,
                max: MAX_LIGHTS,
            });
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    /// Remove and return the light at `index`, keeping the others in order
    pub fn remove_light(&mut self, index: usize) -> lightmesh_core::Result<LightSource> {
        if index >= self.lights.len() {
            return Err(Error::NoSuchLight(index));
        }
        Ok(self.lights.remove(index))
    }

    /// Mutable access to a single light
    pub fn light_mut(&mut self, index: usize) -> Option<&mut LightSource> {
        self.lights.get_mut(index)
    }

    /// Remove every light
    pub fn clear(&mut self) {
        self.lights.clear();
    }

    /// Whether any light resolves to a palette color
    pub fn has_colored_sources(&self) -> bool {
        self.lights
            .iter()
            .any(|l| self.palette.lookup(&l.color).is_some())
    }

    /// Parse a scene from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(json).context("Failed to parse scene JSON")?;
        if scene.lights.len() > MAX_LIGHTS {
            bail!(Error::TooManyLights {
                count: scene.lights.len(),
                max: MAX_LIGHTS,
            });
        }
        Ok(scene)
    }

    /// Load a scene from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("Invalid scene file {}", path.display()))
    }

    /// Pretty-printed JSON representation
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scene")
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::empty()
    }
}
