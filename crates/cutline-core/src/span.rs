//! Time spans on the composition timeline, in seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A span with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start time (inclusive)
    pub start: f64,
    /// Duration of the span
    pub duration: f64,
}

impl TimeSpan {
    /// Create a new span from start and duration.
    #[inline]
    pub const fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// Check if a time is within this span.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if a time lies strictly between start and end.
    #[inline]
    pub fn strictly_inside(self, time: f64) -> bool {
        time > self.start && time < self.end()
    }

    /// Check if two spans overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s..{:.3}s", self.start, self.end())
    }
}
