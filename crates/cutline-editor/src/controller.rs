//! Interaction controller: resolves gestures into composition mutations.
//!
//! Nothing here returns an error to the UI. A gesture either applies, is
//! disabled (nothing to act on), or is rejected with a short notice the UI
//! may show transiently.

use cutline_core::{CutlineError, DefaultDurations, EngineConfig, Result};
use cutline_timeline::{ClipId, Composition, PlaybackCursor};
use std::fmt;
use tracing::debug;

use crate::gesture::{DropEvent, Gesture, MoveEvent, PointerDown, ResizeEvent};

/// User-facing explanation of a rejected gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn from_error(err: &CutlineError) -> Self {
        let message = match err {
            CutlineError::InvalidSplitPoint { .. } => {
                "Move the playhead inside the selected clip to split it."
            }
            CutlineError::NotFound(_) => "That clip is no longer on the timeline.",
            e if e.is_invalid_operation() => "That change isn't possible for this clip.",
            _ => "Something went wrong while editing the timeline.",
        };
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of dispatching one gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The action has nothing to act on (e.g. split with no selection).
    Disabled,
    Rejected(Notice),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Stateless dispatcher from gestures to composition operations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    default_durations: DefaultDurations,
    zoom_step: f64,
}

impl InteractionController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            default_durations: config.default_durations,
            zoom_step: config.zoom_step,
        }
    }

    /// Apply one gesture. Never fails; see [`Outcome`].
    pub fn dispatch(
        &self,
        gesture: &Gesture,
        composition: &mut Composition,
        cursor: &mut PlaybackCursor,
    ) -> Outcome {
        let result = match gesture {
            Gesture::Drop(event) => self.drop_item(event, composition).map(|_| ()),
            Gesture::Resize(event) => self.resize(event, composition),
            Gesture::Move(event) => self.move_clip(event, composition),
            Gesture::PointerDown(event) => {
                self.pointer_down(event, composition);
                Ok(())
            }
            Gesture::Split => match composition.selected_id() {
                Some(id) => composition
                    .split_clip(id, cursor.current_time())
                    .map(|_| ()),
                None => return Outcome::Disabled,
            },
            Gesture::Remove => match composition.selected_id() {
                Some(id) => composition.remove_clip(id).map(|_| ()),
                None => return Outcome::Disabled,
            },
            Gesture::TogglePlay => {
                cursor.toggle_play();
                Ok(())
            }
            Gesture::Seek { time } => {
                cursor.seek(*time);
                Ok(())
            }
            Gesture::ZoomIn => {
                composition.set_zoom(composition.zoom() * self.zoom_step);
                Ok(())
            }
            Gesture::ZoomOut => {
                composition.set_zoom(composition.zoom() / self.zoom_step);
                Ok(())
            }
            Gesture::SetZoom { zoom } => {
                composition.set_zoom(*zoom);
                Ok(())
            }
        };

        match result {
            Ok(()) => Outcome::Applied,
            Err(err) => {
                debug!(gesture = gesture.name(), error = %err, "Gesture rejected");
                Outcome::Rejected(Notice::from_error(&err))
            }
        }
    }

    /// Whether the split action should be offered.
    pub fn can_split(&self, composition: &Composition, cursor: &PlaybackCursor) -> bool {
        composition.selected_clip().is_some_and(|clip| {
            let at = cursor.current_time();
            let floor = composition.min_clip_duration();
            clip.span().strictly_inside(at)
                && at - clip.start() >= floor
                && clip.end() - at >= floor
        })
    }

    /// Place a dropped item: x resolves to the start time, y to the lane.
    /// The new clip becomes the selection.
    pub fn drop_item(&self, event: &DropEvent, composition: &mut Composition) -> Result<ClipId> {
        let scale = *composition.scale();
        let zoom = composition.zoom();
        let start = scale.pixels_to_time(event.offset_x, zoom);
        let layer = scale.lane_for_y(event.offset_y);
        let duration = event
            .item
            .duration
            .unwrap_or_else(|| event.item.kind.default_duration(&self.default_durations));

        let clip = composition.add_clip(
            event.item.kind,
            event.item.source_ref.clone(),
            start,
            layer,
            duration,
        )?;
        composition.select_clip(Some(clip.id()));
        Ok(clip.id())
    }

    /// Right-edge drag. Shrinking past the floor clamps instead of failing
    /// so the drag keeps tracking the pointer.
    pub fn resize(&self, event: &ResizeEvent, composition: &mut Composition) -> Result<()> {
        let old = composition
            .clip(event.clip)
            .map(|clip| clip.duration())
            .ok_or_else(|| CutlineError::NotFound(event.clip.to_string()))?;
        let delta = composition
            .scale()
            .pixel_delta_to_time(event.d_width, composition.zoom());
        let new_duration = (old + delta).max(composition.min_clip_duration());
        composition.resize_clip(event.clip, new_duration)
    }

    /// Body drag: shift in time by the pixel delta and optionally change lane.
    pub fn move_clip(&self, event: &MoveEvent, composition: &mut Composition) -> Result<()> {
        let (start, layer) = composition
            .clip(event.clip)
            .map(|clip| (clip.start(), clip.layer()))
            .ok_or_else(|| CutlineError::NotFound(event.clip.to_string()))?;
        let scale = *composition.scale();
        let new_start = start + scale.pixel_delta_to_time(event.dx, composition.zoom());
        let new_layer = event.target_y.map_or(layer, |y| scale.lane_for_y(y));
        composition.move_clip_to_layer(event.clip, new_start, new_layer)
    }

    /// Select the topmost clip under the pointer, or clear the selection.
    pub fn pointer_down(&self, event: &PointerDown, composition: &mut Composition) {
        let hit = hit_test(composition, event.x, event.y);
        composition.select_clip(hit);
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Clip under a pixel position. Later clips draw on top, so the last match
/// wins.
pub fn hit_test(composition: &Composition, x: f64, y: f64) -> Option<ClipId> {
    composition
        .clips()
        .iter()
        .rev()
        .find(|clip| {
            composition
                .clip_rect(clip.id())
                .is_some_and(|rect| rect.contains(x, y))
        })
        .map(|clip| clip.id())
}
