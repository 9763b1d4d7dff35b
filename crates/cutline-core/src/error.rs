//! Error types for Cutline.

use thiserror::Error;

/// Main error type for timeline operations.
#[derive(Error, Debug)]
pub enum CutlineError {
    /// A mutation would violate a composition invariant.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The referenced clip does not exist in the composition.
    #[error("Clip not found: {0}")]
    NotFound(String),

    /// Split time does not fall strictly inside the clip's span.
    #[error("Invalid split point {at:.3}s: must fall strictly inside {start:.3}s..{end:.3}s")]
    InvalidSplitPoint { at: f64, start: f64, end: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CutlineError {
    /// True for errors caused by an invariant-violating request rather than
    /// a missing clip or an environment problem.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            Self::InvalidOperation(_) | Self::InvalidSplitPoint { .. }
        )
    }
}

/// Result type alias for Cutline operations.
pub type Result<T> = std::result::Result<T, CutlineError>;
