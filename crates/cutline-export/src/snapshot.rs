//! Immutable copies of a composition taken at export time.

use cutline_core::{CutlineError, Result};
use cutline_timeline::{ClipId, ClipKind, Composition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Turns an opaque `source_ref` into something the renderer can open.
pub trait SourceResolver: Send + Sync {
    fn resolve(&self, source_ref: &str) -> Result<String>;
}

/// Passes references through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl SourceResolver for IdentityResolver {
    fn resolve(&self, source_ref: &str) -> Result<String> {
        Ok(source_ref.to_string())
    }
}

/// Output frame shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const LANDSCAPE: Self = Self::new(16, 9);
    pub const PORTRAIT: Self = Self::new(9, 16);
    pub const SQUARE: Self = Self::new(1, 1);
    pub const CLASSIC: Self = Self::new(4, 3);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Frame size for a given output height; width rounded to an even
    /// number of pixels as most encoders require.
    ///
    /// `None` when either side is zero or the width does not fit in `u32`.
    pub fn frame_size(self, height: u32) -> Option<(u32, u32)> {
        if self.width == 0 || self.height == 0 || height == 0 {
            return None;
        }
        let width = (height as f64 * self.ratio()).round();
        if !(1.0..u32::MAX as f64).contains(&width) {
            return None;
        }
        let width = width as u32;
        Some((width + width % 2, height))
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::LANDSCAPE
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = CutlineError;

    /// Parse `"16:9"`-style strings.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CutlineError::InvalidOperation(format!("invalid aspect ratio '{s}'"));
        let (w, h) = s.split_once(':').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self::new(width, height))
    }
}

/// One clip as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotClip {
    pub id: ClipId,
    pub kind: ClipKind,
    pub name: String,
    /// Resolved media location.
    pub source: String,
    pub start: f64,
    pub duration: f64,
    pub layer: u32,
}

impl SnapshotClip {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Owned copy of a composition. Later edits do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionSnapshot {
    clips: Vec<SnapshotClip>,
    duration: f64,
    revision: u64,
}

impl CompositionSnapshot {
    /// Copy the composition, resolving every clip's media reference.
    pub fn capture(composition: &Composition, resolver: &dyn SourceResolver) -> Result<Self> {
        let clips = composition
            .clips()
            .iter()
            .map(|clip| {
                Ok(SnapshotClip {
                    id: clip.id(),
                    kind: clip.kind(),
                    name: clip.name().to_string(),
                    source: resolver.resolve(clip.source_ref())?,
                    start: clip.start(),
                    duration: clip.duration(),
                    layer: clip.layer(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clips,
            duration: composition.duration(),
            revision: composition.revision(),
        })
    }

    /// Clips in composition insertion order.
    pub fn clips(&self) -> &[SnapshotClip] {
        &self.clips
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Composition revision the snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
