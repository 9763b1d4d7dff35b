//! Error types for the export subsystem.

use cutline_core::CutlineError;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a render backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to render: the composition is empty")]
    EmptyComposition,

    #[error("Render timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Render backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced to the caller of an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The render capability rejected the job; the cause is preserved.
    #[error("Export failed: {cause}")]
    ExportFailed {
        #[source]
        cause: RenderError,
    },

    /// Another export is still pending on this orchestrator.
    #[error("An export is already in progress")]
    ExportAlreadyInProgress,

    #[error("Export cancelled")]
    ExportCancelled,

    /// The composition could not be snapshotted (e.g. unresolvable media).
    #[error("Could not prepare composition for export: {0}")]
    Snapshot(#[from] CutlineError),
}

impl ExportError {
    /// Short, non-technical description for the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ExportFailed {
                cause: RenderError::EmptyComposition,
            } => "Add at least one clip before exporting.",
            Self::ExportFailed {
                cause: RenderError::TimedOut(_),
            } => "The export took too long and was stopped. Please try again.",
            Self::ExportFailed { .. } => "The video could not be exported. Please try again.",
            Self::ExportAlreadyInProgress => "An export is already running. Wait for it to finish.",
            Self::ExportCancelled => "The export was cancelled.",
            Self::Snapshot(_) => "Some media in the timeline could not be found.",
        }
    }
}

impl From<RenderError> for ExportError {
    fn from(cause: RenderError) -> Self {
        Self::ExportFailed { cause }
    }
}
