//! `glaze.toml` handling
//!
//! ```toml
//! density = 2.0
//! background = { r = 1.0, g = 1.0, b = 1.0, a = 1.0 }
//!
//! [surface]
//! x = 40.0
//! y = 40.0
//! width = 200.0
//! height = 120.0
//!
//! [style.refraction]
//! height = 12.0
//! amount = { dp = -24.0 }
//!
//! [sampler]
//! policy = "impulse"
//! interval_ms = 300
//! ```
//!
//! Every table is optional; missing keys take their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glaze_core::{Color, Density, GlassStyle, Rect, Size};
use glaze_effects::SamplerPolicy;
use serde::{Deserialize, Serialize};

/// Root-space rectangle of the glass surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 200.0,
        }
    }
}

impl SurfaceConfig {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width.round(), self.height.round())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlazeConfig {
    /// Pixels per dp
    pub density: f32,
    /// Fill behind the backdrop image, and the whole backdrop when none loads
    pub background: Color,
    pub surface: SurfaceConfig,
    pub style: GlassStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler: Option<SamplerPolicy>,
}

impl Default for GlazeConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            background: Color::WHITE,
            surface: SurfaceConfig::default(),
            style: GlassStyle::default(),
            sampler: None,
        }
    }
}

impl GlazeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Built-in configs printed by `glaze presets`
    pub fn preset(name: &str) -> Option<Self> {
        let style = match name {
            "default" => GlassStyle::default(),
            "frosted" => GlassStyle::frosted(),
            "lens" => GlassStyle::lens(),
            _ => return None,
        };
        Some(Self {
            style,
            ..Self::default()
        })
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["default", "frosted", "lens"]
    }

    pub fn density(&self) -> Density {
        Density::new(self.density)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }
}
