//! Render configuration.
//!
//! Loaded from an optional JSON file, then overridden field by field from
//! the command line. Every field has a default so a partial file is fine.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Framebuffer width in logical pixels
    pub width: u32,
    /// Framebuffer height in logical pixels
    pub height: u32,
    /// Output pixels per logical pixel
    pub pixel_scale: u32,
    /// Overrides the scene's own ray depth when set
    pub ray_depth: Option<u32>,
    pub use_bounding_box: bool,
    pub compute_shadows: bool,
    /// Rows traced between progress reports
    pub rows_per_chunk: u32,
    /// Request a stop after this many milliseconds
    pub time_limit_ms: Option<u64>,
    pub scene: String,
    pub model: String,
    /// Image sampled by the textured raster models
    pub texture: Option<PathBuf>,
    /// Outline drawn around every rasterized triangle
    pub border: Option<String>,
    pub winding_debug: bool,
    pub trace_output: PathBuf,
    pub raster_output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 120,
            pixel_scale: 2,
            ray_depth: None,
            use_bounding_box: true,
            compute_shadows: true,
            rows_per_chunk: 8,
            time_limit_ms: None,
            scene: "sphere".to_string(),
            model: "mesh".to_string(),
            texture: None,
            border: None,
            winding_debug: false,
            trace_output: PathBuf::from("trace.png"),
            raster_output: PathBuf::from("raster.png"),
        }
    }
}

impl RenderConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Invalid render configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&text).with_context(|| format!("In {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject sizes the framebuffer cannot hold.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("Framebuffer size {}x{} is empty", self.width, self.height);
        }
        if self.pixel_scale == 0 {
            anyhow::bail!("Pixel scale must be at least 1");
        }
        Ok(())
    }
}
