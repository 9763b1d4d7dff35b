//! Cutline Core - Foundation types for the timeline engine
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Time spans on the composition timeline
//! - Conversion between seconds and horizontal pixels (the time-geometry mapper)
//! - Engine configuration
//! - The common error type

pub mod config;
pub mod error;
pub mod geometry;
pub mod span;

pub use config::{DefaultDurations, EngineConfig};
pub use error::{CutlineError, Result};
pub use geometry::{
    clamp_zoom, pixels_to_time, time_to_pixels, PixelRect, TimelineScale,
    BASE_PIXELS_PER_SECOND, MAX_ZOOM, MIN_ZOOM,
};
pub use span::TimeSpan;
