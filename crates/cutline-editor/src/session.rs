//! Editing session: exclusive owner of the composition and playback cursor.
//!
//! The UI holds one `EditorSession` and passes it by reference; nothing else
//! gets mutable access to the composition. Reads are open, writes go through
//! [`EditorSession::dispatch`].

use cutline_core::EngineConfig;
use cutline_timeline::{Clip, Clock, Composition, PlaybackCursor};
use tracing::info;

use crate::controller::{InteractionController, Outcome};
use crate::gesture::Gesture;

pub struct EditorSession {
    config: EngineConfig,
    composition: Composition,
    cursor: PlaybackCursor,
    controller: InteractionController,
}

impl EditorSession {
    /// Start a session with an empty composition.
    pub fn new(config: EngineConfig) -> Self {
        info!(
            base_pixels_per_second = config.base_pixels_per_second,
            min_clip_duration = config.min_clip_duration,
            "Editor session started"
        );
        Self {
            composition: Composition::new(&config),
            cursor: PlaybackCursor::new(),
            controller: InteractionController::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// Selected clip, if it still exists.
    pub fn selected_clip(&self) -> Option<&Clip> {
        self.composition.selected_clip()
    }

    /// Apply a gesture in dispatch order.
    pub fn dispatch(&mut self, gesture: &Gesture) -> Outcome {
        self.controller
            .dispatch(gesture, &mut self.composition, &mut self.cursor)
    }

    /// Apply a sequence of gestures, returning one outcome per gesture.
    pub fn dispatch_all<'a>(
        &mut self,
        gestures: impl IntoIterator<Item = &'a Gesture>,
    ) -> Vec<Outcome> {
        gestures
            .into_iter()
            .map(|gesture| self.dispatch(gesture))
            .collect()
    }

    /// Whether the split action is currently enabled.
    pub fn can_split(&self) -> bool {
        self.controller.can_split(&self.composition, &self.cursor)
    }

    /// Advance playback by whatever ticks the clock has pending.
    pub fn tick(&mut self, clock: &mut dyn Clock) -> f64 {
        self.cursor.drive(clock)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
