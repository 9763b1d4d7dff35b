//! The composition: authoritative list of clips plus zoom and selection.
//!
//! Every method that changes state validates its input first and either
//! applies the whole change or returns an error with the composition left
//! untouched. Successful mutations bump [`Composition::revision`], which is
//! the signal for consumers to re-derive cached pixel positions.

use cutline_core::{CutlineError, EngineConfig, PixelRect, Result, TimelineScale};
use tracing::{debug, trace};

use crate::clip::{display_name, Clip, ClipId, ClipKind};

/// A multi-lane arrangement of clips being edited.
#[derive(Debug, Clone)]
pub struct Composition {
    clips: Vec<Clip>,
    zoom: f64,
    selected: Option<ClipId>,
    scale: TimelineScale,
    min_clip_duration: f64,
    revision: u64,
}

impl Composition {
    /// Create an empty composition at zoom 1.0.
    pub fn new(config: &EngineConfig) -> Self {
        let scale = config.scale();
        Self {
            clips: Vec::new(),
            zoom: scale.clamp_zoom(1.0),
            selected: None,
            scale,
            min_clip_duration: config.min_clip_duration,
            revision: 0,
        }
    }

    // ── Reads ──────────────────────────────────────────────────

    /// Clips in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Look up a clip by ID.
    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id() == id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scale(&self) -> &TimelineScale {
        &self.scale
    }

    /// Shortest duration any clip may have.
    pub fn min_clip_duration(&self) -> f64 {
        self.min_clip_duration
    }

    /// The selected ID, whether or not it still refers to a clip.
    pub fn selected_id(&self) -> Option<ClipId> {
        self.selected
    }

    /// The selected clip, if the selection refers to a live clip.
    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected.and_then(|id| self.clip(id))
    }

    /// Incremented on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total length: the latest clip end, or zero when empty.
    pub fn duration(&self) -> f64 {
        self.clips.iter().map(Clip::end).fold(0.0, f64::max)
    }

    /// Clips whose span contains `time`, in insertion order.
    pub fn clips_at(&self, time: f64) -> impl Iterator<Item = &Clip> {
        self.clips
            .iter()
            .filter(move |clip| clip.span().contains(time))
    }

    /// Number of lanes needed to show every clip.
    pub fn lane_count(&self) -> u32 {
        self.clips
            .iter()
            .map(|clip| clip.layer().saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Pixel rectangle of a clip at the current zoom.
    pub fn clip_rect(&self, id: ClipId) -> Option<PixelRect> {
        self.clip(id)
            .map(|clip| self.scale.clip_rect(clip.span(), clip.layer(), self.zoom))
    }

    // ── Mutations ──────────────────────────────────────────────

    /// Create and append a clip.
    ///
    /// `start` is clamped to `>= 0`; a positive hint shorter than the
    /// duration floor is raised to the floor.
    pub fn add_clip(
        &mut self,
        kind: ClipKind,
        source_ref: impl Into<String>,
        start: f64,
        layer: u32,
        duration_hint: f64,
    ) -> Result<Clip> {
        if !(duration_hint.is_finite() && duration_hint > 0.0) {
            return Err(CutlineError::InvalidOperation(format!(
                "clip duration must be positive, got {duration_hint}"
            )));
        }

        let source_ref = source_ref.into();
        let name = display_name(&source_ref, kind);
        let clip = Clip::new(
            kind,
            source_ref,
            sanitize_start(start),
            duration_hint.max(self.min_clip_duration),
            layer,
            name,
        );

        debug!(clip = %clip.id(), kind = %kind, start = clip.start(), layer, "Clip added");
        self.clips.push(clip.clone());
        self.touch();
        Ok(clip)
    }

    /// Move a clip to a new start time. Overlap with other clips is allowed.
    pub fn move_clip(&mut self, id: ClipId, new_start: f64) -> Result<()> {
        let start = sanitize_start(new_start);
        let clip = self.clip_mut(id)?;
        clip.set_start(start);
        trace!(clip = %id, start, "Clip moved");
        self.touch();
        Ok(())
    }

    /// Move a clip in time and to another lane in one step.
    pub fn move_clip_to_layer(&mut self, id: ClipId, new_start: f64, layer: u32) -> Result<()> {
        let start = sanitize_start(new_start);
        let clip = self.clip_mut(id)?;
        clip.set_start(start);
        clip.set_layer(layer);
        trace!(clip = %id, start, layer, "Clip moved across lanes");
        self.touch();
        Ok(())
    }

    /// Change a clip's duration. Values at or below the floor clamp to it.
    pub fn resize_clip(&mut self, id: ClipId, new_duration: f64) -> Result<()> {
        if !new_duration.is_finite() {
            return Err(CutlineError::InvalidOperation(format!(
                "clip duration must be finite, got {new_duration}"
            )));
        }
        let duration = new_duration.max(self.min_clip_duration);
        let clip = self.clip_mut(id)?;
        clip.set_duration(duration);
        trace!(clip = %id, duration, "Clip resized");
        self.touch();
        Ok(())
    }

    /// Cut a clip in two at `at`.
    ///
    /// The original clip is replaced, in place, by a left and a right half
    /// with fresh IDs. `at` must lie strictly inside the clip and leave both
    /// halves at least as long as the duration floor.
    pub fn split_clip(&mut self, id: ClipId, at: f64) -> Result<(Clip, Clip)> {
        let index = self.index_of(id)?;
        let original = &self.clips[index];
        let span = original.span();

        let fits = span.strictly_inside(at)
            && at - span.start >= self.min_clip_duration
            && span.end() - at >= self.min_clip_duration;
        if !fits {
            return Err(CutlineError::InvalidSplitPoint {
                at,
                start: span.start,
                end: span.end(),
            });
        }

        let left = Clip::new(
            original.kind(),
            original.source_ref().to_string(),
            span.start,
            at - span.start,
            original.layer(),
            original.name().to_string(),
        );
        let right = Clip::new(
            original.kind(),
            original.source_ref().to_string(),
            at,
            span.end() - at,
            original.layer(),
            format!("{} (split)", original.name()),
        );

        if self.selected == Some(id) {
            self.selected = Some(left.id());
        }
        self.clips[index] = left.clone();
        self.clips.insert(index + 1, right.clone());

        debug!(clip = %id, at, left = %left.id(), right = %right.id(), "Clip split");
        self.touch();
        Ok((left, right))
    }

    /// Delete a clip, clearing the selection if it pointed at it.
    pub fn remove_clip(&mut self, id: ClipId) -> Result<Clip> {
        let index = self.index_of(id)?;
        let removed = self.clips.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(clip = %id, "Clip removed");
        self.touch();
        Ok(removed)
    }

    /// Set or clear the selection. The ID is not checked against the clip
    /// list; a stale ID simply resolves to nothing in [`Self::selected_clip`].
    pub fn select_clip(&mut self, id: Option<ClipId>) {
        if self.selected != id {
            self.selected = id;
            self.touch();
        }
    }

    /// Store a zoom factor, clamped into the supported range.
    pub fn set_zoom(&mut self, value: f64) {
        let zoom = self.scale.clamp_zoom(value);
        if zoom != self.zoom {
            self.zoom = zoom;
            trace!(zoom, "Zoom changed");
            self.touch();
        }
    }

    // ── Internals ──────────────────────────────────────────────

    fn index_of(&self, id: ClipId) -> Result<usize> {
        self.clips
            .iter()
            .position(|clip| clip.id() == id)
            .ok_or_else(|| CutlineError::NotFound(id.to_string()))
    }

    fn clip_mut(&mut self, id: ClipId) -> Result<&mut Clip> {
        self.clips
            .iter_mut()
            .find(|clip| clip.id() == id)
            .ok_or_else(|| CutlineError::NotFound(id.to_string()))
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn sanitize_start(start: f64) -> f64 {
    if start.is_finite() {
        start.max(0.0)
    } else {
        0.0
    }
}
