//! Renderer configuration.

use common::error::{DrawError, DrawResult};
use common::polygon::DEFAULT_SAMPLE_ATTEMPTS;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Longest accepted frame interval, one minute.
pub const MAX_FRAME_INTERVAL_MS: f64 = 60_000.0;

/// Diagnostics passed explicitly through the traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    /// Wrap every element in a `debug` span named after its kind.
    pub trace: bool,
    /// Mark vertices and control points of smoothed paths.
    pub control_points: bool,
}

/// Renderer configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame width in drawing units.
    pub width: f64,
    /// Frame height in drawing units.
    pub height: f64,
    /// Output pixels per drawing unit.
    pub resolution: f64,
    /// Device pixel ratio, multiplied with `resolution`.
    pub pixel_density: f64,
    /// Whether click regions and visibility gating are available.
    pub interactive: bool,
    /// Target frame duration. `None` disables pacing.
    pub frame_interval_ms: Option<f64>,
    /// Extra distance around the viewport at which deferred content counts
    /// as visible.
    pub visibility_margin: f64,
    /// Cap for polygon rejection sampling.
    pub sample_attempts: usize,
    pub debug: DebugOptions,
}

impl RenderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for offscreen rendering: no frame pacing.
    pub fn headless() -> Self {
        Self {
            frame_interval_ms: None,
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> DrawResult<Self> {
        let config: Self = toml::from_str(source).map_err(|err| DrawError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> DrawResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> DrawResult<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(DrawError::config(format!(
                "frame size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.resolution > 0.0 && self.pixel_density > 0.0) {
            return Err(DrawError::config("resolution and pixel density must be positive"));
        }
        if let Some(interval) = self.frame_interval_ms {
            if !(0.0..=MAX_FRAME_INTERVAL_MS).contains(&interval) {
                return Err(DrawError::config(format!(
                    "frame_interval_ms must be within 0..={}, got {}",
                    MAX_FRAME_INTERVAL_MS, interval
                )));
            }
        }
        Ok(())
    }

    /// Set frame size in drawing units.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_pixel_density(mut self, pixel_density: f64) -> Self {
        self.pixel_density = pixel_density;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_frame_interval(mut self, interval_ms: Option<f64>) -> Self {
        self.frame_interval_ms = interval_ms;
        self
    }

    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }

    /// Drawing units to device pixels.
    pub fn scale(&self) -> f64 {
        self.resolution * self.pixel_density
    }

    /// Surface size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let scale = self.scale();
        (
            (self.width * scale).round() as u32,
            (self.height * scale).round() as u32,
        )
    }

    /// Canvas diagonal, the longest probe that can cross the frame.
    pub fn max_distance(&self) -> f64 {
        self.width.hypot(self.height)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            resolution: 1.0,
            pixel_density: 1.0,
            interactive: false,
            frame_interval_ms: Some(16.7),
            visibility_margin: 200.0,
            sample_attempts: DEFAULT_SAMPLE_ATTEMPTS,
            debug: DebugOptions::default(),
        }
    }
}
