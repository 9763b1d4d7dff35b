//! Clip types for the timeline.

use cutline_core::{DefaultDurations, TimeSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique clip identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generate a fresh random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of media a clip carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Video,
    Audio,
    Image,
    Text,
}

impl ClipKind {
    /// Short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    /// Duration used when a dropped item does not know its own length.
    pub fn default_duration(self, defaults: &DefaultDurations) -> f64 {
        match self {
            Self::Video => defaults.video,
            Self::Audio => defaults.audio,
            Self::Image => defaults.image,
            Self::Text => defaults.text,
        }
    }
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A clip placed on the timeline.
///
/// Fields are private: every change goes through [`crate::Composition`] so
/// the start/duration invariants hold for every clip a caller can observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clip {
    id: ClipId,
    kind: ClipKind,
    source_ref: String,
    start: f64,
    duration: f64,
    layer: u32,
    name: String,
}

impl Clip {
    pub(crate) fn new(
        kind: ClipKind,
        source_ref: String,
        start: f64,
        duration: f64,
        layer: u32,
        name: String,
    ) -> Self {
        Self {
            id: ClipId::generate(),
            kind,
            source_ref,
            start,
            duration,
            layer,
            name,
        }
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn kind(&self) -> ClipKind {
        self.kind
    }

    /// Opaque reference to the clip's media.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    /// Start on the timeline, in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Duration on the timeline, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// End on the timeline (exclusive).
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timeline span occupied by this clip.
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.duration)
    }

    pub(crate) fn set_start(&mut self, start: f64) {
        self.start = start;
    }

    pub(crate) fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub(crate) fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }
}

/// Display label for a media reference: its last path segment without any
/// query string or fragment.
pub(crate) fn display_name(source_ref: &str, kind: ClipKind) -> String {
    let trimmed = source_ref
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches(['/', '\\']);
    let name = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();
    if name.is_empty() {
        kind.label().to_string()
    } else {
        name.to_string()
    }
}
