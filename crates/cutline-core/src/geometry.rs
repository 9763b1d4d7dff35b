//! Conversion between the temporal domain (seconds) and the horizontal
//! pixel domain of the timeline.
//!
//! All functions here are pure. Non-finite inputs are treated as zero so a
//! bad pointer coordinate can never poison the composition with NaN.

use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;

/// Pixels per second at zoom 1.0.
pub const BASE_PIXELS_PER_SECOND: f64 = 50.0;

/// Smallest supported zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest supported zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Default height of one lane in pixels.
pub const DEFAULT_LANE_HEIGHT: f64 = 48.0;

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Convert seconds to pixels using the default base scale.
#[inline]
pub fn time_to_pixels(t: f64, zoom: f64) -> f64 {
    TimelineScale::default().time_to_pixels(t, zoom)
}

/// Convert pixels to seconds using the default base scale. Never negative.
#[inline]
pub fn pixels_to_time(p: f64, zoom: f64) -> f64 {
    TimelineScale::default().pixels_to_time(p, zoom)
}

/// Clamp a zoom factor into the default supported range.
#[inline]
pub fn clamp_zoom(zoom: f64) -> f64 {
    TimelineScale::default().clamp_zoom(zoom)
}

/// Axis-aligned rectangle in timeline pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside (right and bottom edges exclusive).
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Timeline layout parameters: base scale, zoom range and lane height.
///
/// Every conversion in the engine goes through one of these so that the
/// drop, resize and render paths agree on the same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    /// Pixels per second at zoom 1.0.
    pub base_pixels_per_second: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Height of a single lane in pixels.
    pub lane_height: f64,
}

impl TimelineScale {
    /// Effective pixels per second at the given zoom.
    ///
    /// Zero when the zoom is non-finite or not positive.
    #[inline]
    pub fn pixels_per_second(&self, zoom: f64) -> f64 {
        let zoom = finite_or_zero(zoom);
        if zoom <= 0.0 {
            return 0.0;
        }
        self.base_pixels_per_second * zoom
    }

    /// `t * base * zoom`.
    pub fn time_to_pixels(&self, t: f64, zoom: f64) -> f64 {
        finite_or_zero(t) * self.pixels_per_second(zoom)
    }

    /// `p / (base * zoom)`, clamped to `>= 0`.
    pub fn pixels_to_time(&self, p: f64, zoom: f64) -> f64 {
        let pps = self.pixels_per_second(zoom);
        if pps <= 0.0 {
            return 0.0;
        }
        (finite_or_zero(p) / pps).max(0.0)
    }

    /// Convert a horizontal pixel delta into a signed time delta.
    pub fn pixel_delta_to_time(&self, dp: f64, zoom: f64) -> f64 {
        let pps = self.pixels_per_second(zoom);
        if pps <= 0.0 {
            return 0.0;
        }
        finite_or_zero(dp) / pps
    }

    /// Clamp zoom into `[min_zoom, max_zoom]`. Non-finite maps to `min_zoom`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Lane index under a vertical coordinate. Coordinates above the first
    /// lane map to lane 0.
    pub fn lane_for_y(&self, y: f64) -> u32 {
        let y = finite_or_zero(y);
        if y <= 0.0 || self.lane_height <= 0.0 {
            return 0;
        }
        (y / self.lane_height).floor().min(u32::MAX as f64) as u32
    }

    /// Top pixel coordinate of a lane.
    #[inline]
    pub fn lane_top(&self, layer: u32) -> f64 {
        layer as f64 * self.lane_height
    }

    /// Pixel rectangle occupied by a clip with the given span and lane.
    pub fn clip_rect(&self, span: TimeSpan, layer: u32, zoom: f64) -> PixelRect {
        PixelRect::new(
            self.time_to_pixels(span.start, zoom),
            self.lane_top(layer),
            self.time_to_pixels(span.duration, zoom),
            self.lane_height,
        )
    }
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            base_pixels_per_second: BASE_PIXELS_PER_SECOND,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            lane_height: DEFAULT_LANE_HEIGHT,
        }
    }
}
