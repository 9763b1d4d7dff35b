//! Integration tests for the export path: editing session to snapshot to
//! orchestrated render.

use cutline_core::{CutlineError, EngineConfig};
use cutline_editor::{DragItem, DropEvent, EditorSession, Gesture};
use cutline_export::{
    ArtifactRef, AspectRatio, CompositionSnapshot, ExportCancel, ExportError,
    ExportOrchestrator, IdentityResolver, ManifestRenderBackend, ProgressSink, RenderBackend,
    RenderError, SourceResolver,
};
use cutline_timeline::ClipKind;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

// ── Helpers ────────────────────────────────────────────────────

fn session_with_clips() -> EditorSession {
    let mut session = EditorSession::default();
    for (kind, source, x, y, duration) in [
        (ClipKind::Video, "intro.mp4", 0.0, 0.0, 4.0),
        (ClipKind::Audio, "music.wav", 0.0, 60.0, 9.0),
        (ClipKind::Image, "logo.png", 150.0, 110.0, 2.0),
    ] {
        session.dispatch(&Gesture::Drop(DropEvent {
            item: DragItem {
                kind,
                source_ref: source.into(),
                duration: Some(duration),
            },
            offset_x: x,
            offset_y: y,
        }));
    }
    session
}

fn recorder() -> (Arc<Mutex<Vec<f64>>>, impl Fn(f64) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |f| sink.lock().push(f))
}

/// Resolver mapping bare names into a media library folder.
struct LibraryResolver;

impl SourceResolver for LibraryResolver {
    fn resolve(&self, source_ref: &str) -> cutline_core::Result<String> {
        if source_ref.is_empty() {
            return Err(CutlineError::NotFound("empty media reference".into()));
        }
        Ok(format!("/media/library/{source_ref}"))
    }
}

/// Backend that never finishes on its own.
struct StalledBackend;

impl RenderBackend for StalledBackend {
    async fn render(
        &self,
        _snapshot: CompositionSnapshot,
        _aspect: AspectRatio,
        progress: ProgressSink,
    ) -> Result<ArtifactRef, RenderError> {
        progress.report(0.25);
        std::future::pending().await
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[tokio::test]
async fn session_exports_manifest_with_resolved_sources() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with_clips();
    let snapshot = CompositionSnapshot::capture(session.composition(), &LibraryResolver).unwrap();
    let orchestrator = ExportOrchestrator::from_config(
        ManifestRenderBackend::new(dir.path()),
        session.config(),
    );

    let (seen, on_progress) = recorder();
    let artifact = orchestrator
        .export(snapshot, AspectRatio::PORTRAIT, on_progress, ExportCancel::new())
        .await
        .unwrap();

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&artifact.uri).unwrap()).unwrap();
    assert_eq!(manifest["width"], 608);
    assert_eq!(manifest["height"], 1080);
    assert_eq!(manifest["duration"], 9.0);
    let clips = manifest["clips"].as_array().unwrap();
    assert_eq!(clips.len(), 3);
    assert_eq!(clips[0]["source"], "/media/library/intro.mp4");
    assert_eq!(clips[1]["kind"], "audio");
    assert_eq!(clips[2]["kind"], "image");
    assert_eq!(clips[2]["name"], "logo.png");
    assert_eq!(clips[2]["layer"], 2);
    assert_eq!(clips[2]["start"], 3.0);

    let seen = seen.lock();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&1.0));
}

#[tokio::test]
async fn edits_during_export_do_not_reach_the_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with_clips();
    let snapshot =
        CompositionSnapshot::capture(session.composition(), &IdentityResolver).unwrap();
    let orchestrator = ExportOrchestrator::new(ManifestRenderBackend::new(dir.path()));

    let export = orchestrator.export(snapshot, AspectRatio::LANDSCAPE, |_| {}, ExportCancel::new());

    // Keep editing while the export is pending.
    session.dispatch(&Gesture::Remove);
    session.dispatch(&Gesture::SetZoom { zoom: 3.0 });
    assert_eq!(session.composition().len(), 2);

    let artifact = export.await.unwrap();
    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&artifact.uri).unwrap()).unwrap();
    assert_eq!(manifest["clips"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn second_export_is_rejected_while_first_is_pending() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with_clips();
    let snapshot =
        CompositionSnapshot::capture(session.composition(), &IdentityResolver).unwrap();
    let orchestrator = ExportOrchestrator::new(ManifestRenderBackend::new(dir.path()));

    let first = orchestrator.export(
        snapshot.clone(),
        AspectRatio::LANDSCAPE,
        |_| {},
        ExportCancel::new(),
    );
    let second = orchestrator
        .export(snapshot, AspectRatio::SQUARE, |_| {}, ExportCancel::new())
        .await;

    assert!(matches!(second, Err(ExportError::ExportAlreadyInProgress)));
    assert!(first.await.is_ok());
    assert!(!orchestrator.is_exporting());
}

#[tokio::test]
async fn exporting_an_empty_timeline_fails_with_cause() {
    let dir = tempfile::tempdir().unwrap();
    let session = EditorSession::default();
    let snapshot =
        CompositionSnapshot::capture(session.composition(), &IdentityResolver).unwrap();
    let orchestrator = ExportOrchestrator::new(ManifestRenderBackend::new(dir.path()));

    let err = orchestrator
        .export(snapshot, AspectRatio::LANDSCAPE, |_| {}, ExportCancel::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::ExportFailed {
            cause: RenderError::EmptyComposition
        }
    ));
    assert!(!err.user_message().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn degenerate_aspect_fails_the_export_instead_of_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with_clips();
    let snapshot =
        CompositionSnapshot::capture(session.composition(), &IdentityResolver).unwrap();
    let orchestrator = ExportOrchestrator::new(ManifestRenderBackend::new(dir.path()));
    let aspect: AspectRatio = serde_json::from_str(r#"{"width":16,"height":0}"#).unwrap();

    let err = orchestrator
        .export(snapshot, aspect, |_| {}, ExportCancel::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::ExportFailed {
            cause: RenderError::Backend(_)
        }
    ));
    assert!(!orchestrator.is_exporting());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn oversized_timeout_is_rejected_by_config() {
    let err = EngineConfig::from_json(br#"{ "export_timeout_secs": 1e30 }"#).unwrap_err();
    assert!(matches!(err, CutlineError::Config(_)));
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_bounds_a_stalled_render() {
    let config = EngineConfig {
        export_timeout_secs: Some(5.0),
        ..EngineConfig::default()
    };
    let mut session = EditorSession::new(config);
    session.dispatch(&Gesture::Drop(DropEvent {
        item: DragItem {
            kind: ClipKind::Text,
            source_ref: "Title".into(),
            duration: None,
        },
        offset_x: 0.0,
        offset_y: 0.0,
    }));
    let snapshot =
        CompositionSnapshot::capture(session.composition(), &IdentityResolver).unwrap();
    let orchestrator = ExportOrchestrator::from_config(StalledBackend, session.config());

    let (seen, on_progress) = recorder();
    let err = orchestrator
        .export(snapshot, AspectRatio::LANDSCAPE, on_progress, ExportCancel::new())
        .await
        .unwrap_err();

    match err {
        ExportError::ExportFailed {
            cause: RenderError::TimedOut(limit),
        } => assert_eq!(limit, Duration::from_secs(5)),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(*seen.lock(), vec![0.25]);
    assert!(!orchestrator.is_exporting());
}

#[tokio::test(start_paused = true)]
async fn cancelling_a_slow_export_frees_the_slot() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with_clips();
    let snapshot =
        CompositionSnapshot::capture(session.composition(), &IdentityResolver).unwrap();
    let orchestrator = ExportOrchestrator::new(
        ManifestRenderBackend::new(dir.path()).with_step_delay(Duration::from_secs(10)),
    );

    let cancel = ExportCancel::new();
    let trigger = cancel.clone();
    let export = orchestrator.export(snapshot.clone(), AspectRatio::LANDSCAPE, |_| {}, cancel);
    let (result, ()) = tokio::join!(export, async move {
        tokio::time::sleep(Duration::from_secs(15)).await;
        trigger.cancel();
    });

    assert!(matches!(result, Err(ExportError::ExportCancelled)));
    assert!(!orchestrator.is_exporting());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    // A fresh export runs to completion afterwards.
    let artifact = orchestrator
        .export(snapshot, AspectRatio::LANDSCAPE, |_| {}, ExportCancel::new())
        .await
        .unwrap();
    assert!(artifact.size_bytes.unwrap_or(0) > 0);
}

#[test]
fn unresolvable_media_blocks_the_snapshot() {
    let mut session = EditorSession::default();
    session.dispatch(&Gesture::Drop(DropEvent {
        item: DragItem {
            kind: ClipKind::Video,
            source_ref: String::new(),
            duration: Some(2.0),
        },
        offset_x: 0.0,
        offset_y: 0.0,
    }));
    let err = CompositionSnapshot::capture(session.composition(), &LibraryResolver).unwrap_err();
    assert!(matches!(err, CutlineError::NotFound(_)));
}
