//! Engine configuration
//!
//! Stored in `{config_dir}/lightmesh/config.json`. Missing or unreadable
//! files fall back to defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Slowest frame rate a config may request
pub const MIN_FPS: f32 = 0.1;

/// What to do when the glyph distance field cannot be built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphPolicy {
    /// Refuse to start the session
    Strict,
    /// Substitute a saturated field so glyph lights have no interior
    #[default]
    Degraded,
}

/// Session and output defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Frame rate of the render loop
    pub fps: f32,
    /// Behavior on glyph build failure
    pub glyph_policy: GlyphPolicy,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30.0,
            glyph_policy: GlyphPolicy::Degraded,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Output size as `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_glyph_policy(mut self, policy: GlyphPolicy) -> Self {
        self.glyph_policy = policy;
        self
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightmesh").join("config.json"))
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the default location, returning defaults if the
    /// file doesn't exist or is invalid
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Save to a config file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).context("Failed to write config file")
    }

    /// Reject sizes and rates the renderer cannot use
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("Output size must be non-zero, got {}x{}", self.width, self.height);
        }
        if !(self.fps.is_finite() && self.fps >= MIN_FPS) {
            bail!("Frame rate must be at least {}, got {}", MIN_FPS, self.fps);
        }
        Ok(())
    }
}
