//! Cutline Export - Rendering a composition through an external backend
//!
//! This crate handles:
//! - Immutable composition snapshots with resolved media references
//! - The render capability contract and progress reporting
//! - Orchestration: one export at a time, timeout and cancellation

pub mod error;
pub mod orchestrator;
pub mod render;
pub mod snapshot;

pub use error::{ExportError, RenderError};
pub use orchestrator::{ExportCancel, ExportOrchestrator};
pub use render::{ArtifactRef, ManifestRenderBackend, ProgressSink, RenderBackend};
pub use snapshot::{AspectRatio, CompositionSnapshot, IdentityResolver, SnapshotClip, SourceResolver};
