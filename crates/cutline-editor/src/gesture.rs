//! Gesture events delivered by the UI layer.
//!
//! Coordinates are timeline pixels relative to the scrollable origin
//! (scroll offset already applied). Events are serde-friendly so a recorded
//! interaction can be replayed from JSON.

use cutline_timeline::{ClipId, ClipKind};
use serde::{Deserialize, Serialize};

/// Media item being dragged from the library onto the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragItem {
    pub kind: ClipKind,
    pub source_ref: String,
    /// Known media length in seconds. Falls back to the per-kind default.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// An item released over the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEvent {
    pub item: DragItem,
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

/// Right-edge drag of a clip, as a horizontal pixel delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub clip: ClipId,
    pub d_width: f64,
}

/// Body drag of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub clip: ClipId,
    pub dx: f64,
    /// Vertical pointer position at release; `None` keeps the current lane.
    #[serde(default)]
    pub target_y: Option<f64>,
}

/// Primary button pressed somewhere on the timeline body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerDown {
    pub x: f64,
    pub y: f64,
}

/// Everything the interaction controller can be asked to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    Drop(DropEvent),
    Resize(ResizeEvent),
    Move(MoveEvent),
    PointerDown(PointerDown),
    /// Cut the selected clip at the playback cursor.
    Split,
    /// Delete the selected clip.
    Remove,
    TogglePlay,
    Seek { time: f64 },
    ZoomIn,
    ZoomOut,
    SetZoom { zoom: f64 },
}

impl Gesture {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drop(_) => "drop",
            Self::Resize(_) => "resize",
            Self::Move(_) => "move",
            Self::PointerDown(_) => "pointer_down",
            Self::Split => "split",
            Self::Remove => "remove",
            Self::TogglePlay => "toggle_play",
            Self::Seek { .. } => "seek",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::SetZoom { .. } => "set_zoom",
        }
    }
}
