//! Cutline Timeline - Composition data model
//!
//! Implements the editable state of a timeline session:
//! - Clips placed on lanes with a start and duration
//! - The composition that owns them and exposes the only legal mutations
//! - The playback cursor and the clock capability that drives it

pub mod clip;
pub mod composition;
pub mod playback;

pub use clip::{Clip, ClipId, ClipKind};
pub use composition::Composition;
pub use playback::{Clock, InstantClock, ManualClock, PlaybackCursor};
