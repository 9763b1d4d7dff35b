//! Integration tests for the editing path.
//!
//! Exercises gestures flowing from cutline-editor through the composition
//! model in cutline-timeline and back out through the geometry in
//! cutline-core.

use cutline_core::{pixels_to_time, time_to_pixels, EngineConfig};
use cutline_editor::{
    DragItem, DropEvent, EditorSession, Gesture, Outcome, PointerDown, ResizeEvent,
};
use cutline_timeline::{ClipKind, ManualClock};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────

fn drop_item(kind: ClipKind, source: &str, x: f64, y: f64, duration: Option<f64>) -> Gesture {
    Gesture::Drop(DropEvent {
        item: DragItem {
            kind,
            source_ref: source.into(),
            duration,
        },
        offset_x: x,
        offset_y: y,
    })
}

fn spans(session: &EditorSession) -> Vec<(f64, f64)> {
    session
        .composition()
        .clips()
        .iter()
        .map(|clip| (clip.start(), clip.duration()))
        .collect()
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn drop_at_250px_starts_at_five_seconds() {
    let mut session = EditorSession::default();
    let outcome = session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 250.0, 0.0, Some(3.0)));
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(spans(&session), [(5.0, 3.0)]);
}

#[test]
fn resize_by_100px_adds_two_seconds() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 0.0, 0.0, Some(4.0)));
    let id = session.composition().clips()[0].id();

    session.dispatch(&Gesture::Resize(ResizeEvent {
        clip: id,
        d_width: 100.0,
    }));
    assert_eq!(session.composition().clip(id).unwrap().duration(), 6.0);
}

#[test]
fn select_then_split_at_playhead() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 0.0, 0.0, Some(10.0)));
    let original = session.composition().clips()[0].id();

    // Clear, then re-select by clicking the clip body.
    session.dispatch(&Gesture::PointerDown(PointerDown { x: 400.0, y: 200.0 }));
    assert!(session.selected_clip().is_none());
    session.dispatch(&Gesture::PointerDown(PointerDown { x: 10.0, y: 10.0 }));
    assert_eq!(session.composition().selected_id(), Some(original));

    session.dispatch(&Gesture::Seek { time: 4.0 });
    assert!(session.dispatch(&Gesture::Split).is_applied());

    assert_eq!(spans(&session), [(0.0, 4.0), (4.0, 6.0)]);
    assert!(session.composition().clip(original).is_none());
}

#[test]
fn split_with_nothing_selected_is_disabled() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 0.0, 0.0, Some(10.0)));
    session.dispatch(&Gesture::PointerDown(PointerDown { x: 900.0, y: 0.0 }));
    session.dispatch(&Gesture::Seek { time: 4.0 });

    assert!(!session.can_split());
    assert_eq!(session.dispatch(&Gesture::Split), Outcome::Disabled);
    assert_eq!(spans(&session), [(0.0, 10.0)]);
}

#[test]
fn removing_selected_clip_clears_selection() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Image, "logo.png", 0.0, 0.0, None));
    assert!(session.selected_clip().is_some());

    assert!(session.dispatch(&Gesture::Remove).is_applied());
    assert!(session.composition().is_empty());
    assert_eq!(session.composition().selected_id(), None);
    assert_eq!(session.dispatch(&Gesture::Remove), Outcome::Disabled);
}

#[test]
fn overlapping_clips_in_one_lane_are_allowed() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 0.0, 0.0, Some(6.0)));
    session.dispatch(&drop_item(ClipKind::Video, "b.mp4", 100.0, 0.0, Some(6.0)));

    let clips = session.composition().clips();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].layer(), clips[1].layer());
    assert!(clips[0].span().overlaps(clips[1].span()));
    assert_eq!(session.composition().clips_at(3.0).count(), 2);
}

#[test]
fn played_time_feeds_the_split() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Audio, "score.wav", 0.0, 0.0, Some(8.0)));
    session.dispatch(&Gesture::TogglePlay);

    let mut clock = ManualClock::new();
    clock.push_frames(60, 30.0);
    session.tick(&mut clock);
    assert!((session.cursor().current_time() - 2.0).abs() < 1e-9);

    session.dispatch(&Gesture::Split);
    let result = spans(&session);
    assert_eq!(result.len(), 2);
    assert!((result[0].1 - 2.0).abs() < 1e-9);
    assert!((result[1].0 - 2.0).abs() < 1e-9);
}

#[test]
fn zoom_changes_pixel_layout_not_time() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 100.0, 0.0, Some(2.0)));
    let id = session.composition().clips()[0].id();
    let before = session.composition().clip_rect(id).unwrap();
    let revision = session.composition().revision();

    session.dispatch(&Gesture::SetZoom { zoom: 2.0 });
    let after = session.composition().clip_rect(id).unwrap();

    assert!(session.composition().revision() > revision);
    assert_eq!(after.x, before.x * 2.0);
    assert_eq!(after.width, before.width * 2.0);
    assert_eq!(session.composition().clip(id).unwrap().start(), 2.0);
}

#[test]
fn rejected_gesture_leaves_composition_untouched() {
    let mut session = EditorSession::default();
    session.dispatch(&drop_item(ClipKind::Video, "a.mp4", 0.0, 0.0, Some(5.0)));
    let revision = session.composition().revision();

    session.dispatch(&Gesture::Seek { time: 5.0 });
    match session.dispatch(&Gesture::Split) {
        Outcome::Rejected(notice) => assert!(!notice.message.is_empty()),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(session.composition().revision(), revision);
    assert_eq!(spans(&session), [(0.0, 5.0)]);
}

#[test]
fn replayed_script_matches_direct_dispatch() {
    let script = r#"[
        { "type": "drop", "item": { "kind": "video", "source_ref": "a.mp4", "duration": 10.0 }, "offset_x": 0.0 },
        { "type": "seek", "time": 3.0 },
        { "type": "split" },
        { "type": "zoom_out" }
    ]"#;
    let gestures: Vec<Gesture> = serde_json::from_str(script).unwrap();
    let mut session = EditorSession::new(EngineConfig::default());
    let outcomes = session.dispatch_all(&gestures);

    assert!(outcomes.iter().all(Outcome::is_applied));
    assert_eq!(spans(&session), [(0.0, 3.0), (3.0, 7.0)]);
    assert!((session.composition().zoom() - 0.8).abs() < 1e-12);
}

#[test]
fn demo_script_replays_cleanly() {
    let gestures: Vec<Gesture> =
        serde_json::from_str(include_str!("../../cutline-app/scripts/demo.json")).unwrap();
    let mut session = EditorSession::default();
    let outcomes = session.dispatch_all(&gestures);

    assert!(outcomes.iter().all(Outcome::is_applied), "{outcomes:?}");
    let composition = session.composition();
    assert_eq!(composition.len(), 5);
    assert_eq!(composition.lane_count(), 3);
    assert_eq!(composition.duration(), 14.0);

    let titles: Vec<(f64, f64)> = composition
        .clips()
        .iter()
        .filter(|clip| clip.kind() == ClipKind::Text)
        .map(|clip| (clip.start(), clip.duration()))
        .collect();
    assert_eq!(titles, [(2.0, 2.0), (4.0, 1.0)]);
}

proptest! {
    #[test]
    fn add_reads_back_exact_values(start in 0.0f64..10_000.0, duration in 0.1f64..1_000.0) {
        let mut session = EditorSession::default();
        session.dispatch(&drop_item(
            ClipKind::Video,
            "a.mp4",
            time_to_pixels(start, 1.0),
            0.0,
            Some(duration),
        ));
        let clip = &session.composition().clips()[0];
        prop_assert!((clip.start() - start).abs() <= 1e-9 * start.max(1.0));
        prop_assert_eq!(clip.duration(), duration);
    }

    #[test]
    fn drop_position_round_trips(x in 0.0f64..50_000.0, zoom in 0.1f64..=5.0) {
        let mut session = EditorSession::default();
        session.dispatch(&Gesture::SetZoom { zoom });
        session.dispatch(&drop_item(ClipKind::Text, "t", x, 0.0, None));
        let id = session.composition().clips()[0].id();
        let rect = session.composition().clip_rect(id).unwrap();
        prop_assert!((rect.x - x).abs() <= 1e-6 * x.max(1.0));
        prop_assert!((pixels_to_time(rect.x, zoom) - session.composition().clips()[0].start()).abs() <= 1e-9 * x.max(1.0));
    }
}
