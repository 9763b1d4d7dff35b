//! Render capability contract and progress reporting.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::error::RenderError;
use crate::snapshot::{AspectRatio, CompositionSnapshot, SnapshotClip};

/// Reference to a finished export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRef {
    /// Location of the output (path or URL).
    pub uri: String,
    /// Size in bytes, when the backend knows it.
    pub size_bytes: Option<u64>,
}

/// Progress channel handed to a render backend.
///
/// Fractions are clamped to `[0, 1]` and never go backwards; NaN reports are
/// dropped. Clones share the same high-water mark.
#[derive(Clone)]
pub struct ProgressSink {
    callback: Arc<dyn Fn(f64) + Send + Sync>,
    last: Arc<Mutex<f64>>,
}

impl ProgressSink {
    pub fn new(callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            last: Arc::new(Mutex::new(0.0)),
        }
    }

    /// Sink that discards every report.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Forward a progress fraction.
    pub fn report(&self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        let mut last = self.last.lock();
        if fraction < *last {
            return;
        }
        *last = fraction;
        (self.callback)(fraction);
    }

    /// Highest fraction reported so far.
    pub fn current(&self) -> f64 {
        *self.last.lock()
    }
}

impl fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSink")
            .field("current", &self.current())
            .finish()
    }
}

/// External capability that turns a snapshot into an output artifact.
///
/// Implementations report progress through `progress` as they go and must
/// not assume they are polled to completion: the orchestrator drops the
/// future on timeout or cancellation.
pub trait RenderBackend: Send + Sync {
    fn render(
        &self,
        snapshot: CompositionSnapshot,
        aspect: AspectRatio,
        progress: ProgressSink,
    ) -> impl Future<Output = Result<ArtifactRef, RenderError>> + Send;
}

#[derive(Serialize)]
struct Manifest<'a> {
    aspect: AspectRatio,
    width: u32,
    height: u32,
    duration: f64,
    clips: &'a [SnapshotClip],
}

/// Backend that "renders" by writing a JSON edit manifest describing the
/// snapshot. Downstream encoders consume the manifest; the engine itself
/// never touches pixels.
#[derive(Debug, Clone)]
pub struct ManifestRenderBackend {
    output_dir: PathBuf,
    output_height: u32,
    step_delay: Duration,
}

impl ManifestRenderBackend {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_height: 1080,
            step_delay: Duration::ZERO,
        }
    }

    /// Output frame height; width follows from the aspect ratio.
    pub fn with_output_height(mut self, height: u32) -> Self {
        self.output_height = height;
        self
    }

    /// Pause between clips, to simulate a slow renderer.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }
}

impl RenderBackend for ManifestRenderBackend {
    async fn render(
        &self,
        snapshot: CompositionSnapshot,
        aspect: AspectRatio,
        progress: ProgressSink,
    ) -> Result<ArtifactRef, RenderError> {
        if snapshot.is_empty() {
            return Err(RenderError::EmptyComposition);
        }
        let (width, height) = aspect.frame_size(self.output_height).ok_or_else(|| {
            RenderError::Backend(format!(
                "invalid aspect ratio {aspect} for output height {}",
                self.output_height
            ))
        })?;

        // Per-clip work takes 90% of the bar, writing the manifest the rest.
        let total = snapshot.clips().len();
        for (i, clip) in snapshot.clips().iter().enumerate() {
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            debug!(clip = %clip.id, source = %clip.source, "Clip staged");
            progress.report(0.9 * (i + 1) as f64 / total as f64);
        }

        let data = serde_json::to_vec_pretty(&Manifest {
            aspect,
            width,
            height,
            duration: snapshot.duration(),
            clips: snapshot.clips(),
        })
        .map_err(|e| RenderError::Serialization(format!("Failed to write manifest: {e}")))?;

        let path = self
            .output_dir
            .join(format!("export-{}.json", Uuid::new_v4()));
        let size = data.len() as u64;
        let write_path = path.clone();
        tokio::task::spawn_blocking(move || std::fs::write(write_path, data))
            .await
            .map_err(|e| RenderError::Backend(format!("Manifest writer panicked: {e}")))??;

        progress.report(1.0);
        Ok(ArtifactRef {
            uri: path.to_string_lossy().into_owned(),
            size_bytes: Some(size),
        })
    }
}
