//! Export orchestration: runs one render job at a time against a snapshot.

use cutline_core::EngineConfig;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::error::{ExportError, RenderError};
use crate::render::{ArtifactRef, ProgressSink, RenderBackend};
use crate::snapshot::{AspectRatio, CompositionSnapshot};

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone, Default)]
pub struct ExportCancel {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ExportCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Holds the in-flight flag for the lifetime of one export.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(Arc::clone(flag)))
            .map_err(|_| ExportError::ExportAlreadyInProgress)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sequences render jobs against a backend.
pub struct ExportOrchestrator<B> {
    backend: B,
    in_flight: Arc<AtomicBool>,
    timeout: Option<Duration>,
}

impl<B: RenderBackend> ExportOrchestrator<B> {
    /// Orchestrator with no timeout.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout: None,
        }
    }

    /// Orchestrator using the config's export timeout.
    pub fn from_config(backend: B, config: &EngineConfig) -> Self {
        Self::new(backend).with_timeout(config.export_timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True while an export is pending.
    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start an export.
    ///
    /// The single-export slot is claimed when this is called, not when the
    /// returned future is first polled, so a second call made while the
    /// first is still pending fails with
    /// [`ExportError::ExportAlreadyInProgress`]. The slot is released when
    /// the future completes or is dropped.
    pub fn export(
        &self,
        snapshot: CompositionSnapshot,
        aspect: AspectRatio,
        on_progress: impl Fn(f64) + Send + Sync + 'static,
        cancel: ExportCancel,
    ) -> impl Future<Output = Result<ArtifactRef, ExportError>> + Send + '_ {
        let guard = InFlightGuard::acquire(&self.in_flight);

        async move {
            let _guard = guard?;
            if cancel.is_cancelled() {
                return Err(ExportError::ExportCancelled);
            }

            let clips = snapshot.clips().len();
            let duration = snapshot.duration();
            info!(clips, duration, aspect = %aspect, "Export started");

            let progress = ProgressSink::new(on_progress);
            let render = self.backend.render(snapshot, aspect, progress.clone());
            let timeout = self.timeout;

            let result = tokio::select! {
                result = run_with_timeout(render, timeout) => result,
                _ = cancel.cancelled() => Err(ExportError::ExportCancelled),
            };

            match &result {
                Ok(artifact) => {
                    progress.report(1.0);
                    info!(uri = %artifact.uri, "Export finished");
                }
                Err(ExportError::ExportCancelled) => info!("Export cancelled"),
                Err(e) => warn!(error = %e, "Export failed"),
            }
            result
        }
    }
}

async fn run_with_timeout(
    render: impl Future<Output = Result<ArtifactRef, RenderError>>,
    timeout: Option<Duration>,
) -> Result<ArtifactRef, ExportError> {
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, render)
            .await
            .unwrap_or(Err(RenderError::TimedOut(limit))),
        None => render.await,
    };
    outcome.map_err(|cause| ExportError::ExportFailed { cause })
}
