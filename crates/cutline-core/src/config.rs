//! Engine configuration.
//!
//! Stored as JSON. Every field has a default, so a partial file only needs
//! to name the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CutlineError, Result};
use crate::geometry::{TimelineScale, BASE_PIXELS_PER_SECOND, DEFAULT_LANE_HEIGHT, MAX_ZOOM, MIN_ZOOM};

/// Duration given to dropped items that carry no duration of their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultDurations {
    pub video: f64,
    pub audio: f64,
    pub image: f64,
    pub text: f64,
}

impl Default for DefaultDurations {
    fn default() -> Self {
        Self {
            video: 5.0,
            audio: 5.0,
            image: 5.0,
            text: 3.0,
        }
    }
}

/// Tunable parameters of the timeline engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pixels per second at zoom 1.0.
    pub base_pixels_per_second: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier applied by a single zoom-in / zoom-out step.
    pub zoom_step: f64,
    /// Height of one lane in pixels.
    pub lane_height: f64,
    /// Shortest duration a clip may have, in seconds.
    pub min_clip_duration: f64,
    pub default_durations: DefaultDurations,
    /// Upper bound on a single export. `None` waits forever.
    pub export_timeout_secs: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_pixels_per_second: BASE_PIXELS_PER_SECOND,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: 1.25,
            lane_height: DEFAULT_LANE_HEIGHT,
            min_clip_duration: 0.1,
            default_durations: DefaultDurations::default(),
            export_timeout_secs: None,
        }
    }
}

impl EngineConfig {
    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(CutlineError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        }

        positive("base_pixels_per_second", self.base_pixels_per_second)?;
        positive("min_zoom", self.min_zoom)?;
        positive("max_zoom", self.max_zoom)?;
        positive("lane_height", self.lane_height)?;
        positive("min_clip_duration", self.min_clip_duration)?;
        positive("default_durations.video", self.default_durations.video)?;
        positive("default_durations.audio", self.default_durations.audio)?;
        positive("default_durations.image", self.default_durations.image)?;
        positive("default_durations.text", self.default_durations.text)?;

        if self.min_zoom > self.max_zoom {
            return Err(CutlineError::Config(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(CutlineError::Config(format!(
                "zoom_step must be greater than 1.0, got {}",
                self.zoom_step
            )));
        }
        if let Some(secs) = self.export_timeout_secs {
            positive("export_timeout_secs", secs)?;
            Duration::try_from_secs_f64(secs).map_err(|_| {
                CutlineError::Config(format!("export_timeout_secs is out of range, got {secs}"))
            })?;
        }
        Ok(())
    }

    /// Layout parameters derived from this config.
    pub fn scale(&self) -> TimelineScale {
        TimelineScale {
            base_pixels_per_second: self.base_pixels_per_second,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            lane_height: self.lane_height,
        }
    }

    /// Export timeout as a `Duration`, if one is configured and
    /// representable.
    pub fn export_timeout(&self) -> Option<Duration> {
        self.export_timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| CutlineError::Serialization(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CutlineError::Serialization(format!("Failed to serialize config: {e}")))
    }

    /// Load config from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Platform config location, e.g. `~/.config/cutline/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutline").join("config.json"))
    }
}
