use std::sync::Arc;
use std::time::Duration;

use core_editor::{Editor, EditorOptions};
use core_events::{EditorEvent, MemorySource, RecordingNotifier};
use core_state::ManualClock;
use core_text::Cursor;
use pretty_assertions::assert_eq;

const WINDOW: Duration = Duration::from_millis(400);

fn rig(lines: &[&str]) -> (Editor, ManualClock, RecordingNotifier) {
    let clock = ManualClock::new();
    let notifier = RecordingNotifier::new();
    let mut ed = Editor::from_lines(lines.iter().copied(), EditorOptions::default())
        .with_clock(Arc::new(clock.clone()));
    ed.add_notifier(Arc::new(notifier.clone()));
    (ed, clock, notifier)
}

fn commits(n: &RecordingNotifier) -> usize {
    n.count(|e| matches!(e, EditorEvent::ContentCommitted { .. }))
}

#[test]
fn burst_within_window_is_one_unit() {
    let (mut ed, clock, notes) = rig(&[""]);
    for ch in ["a", "b", "c", "d"] {
        ed.insert_text(ch);
        clock.advance(Duration::from_millis(100));
        assert!(!ed.tick());
    }
    assert_eq!(ed.undo_depth(), 0);
    clock.advance(WINDOW);
    assert!(ed.tick());
    assert_eq!(ed.undo_depth(), 1);
    assert_eq!(commits(&notes), 1);
    match &notes.events()[0] {
        EditorEvent::ContentCommitted { version, rows, ops } => {
            assert_eq!(*version, 4);
            assert_eq!(rows.clone(), 0..=0);
            assert_eq!(*ops, 4);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(ed.undo());
    assert_eq!(ed.lines(), vec![""]);
}

#[test]
fn gaps_longer_than_window_split_units() {
    let (mut ed, clock, notes) = rig(&[""]);
    for ch in ["a", "b", "c"] {
        ed.insert_text(ch);
        clock.advance(WINDOW + Duration::from_millis(1));
        assert!(ed.tick());
    }
    assert_eq!(ed.undo_depth(), 3);
    assert_eq!(commits(&notes), 3);
    assert!(ed.undo());
    assert_eq!(ed.content(), "ab");
}

#[test]
fn undo_force_drains_pending_burst() {
    let (mut ed, _clock, notes) = rig(&["x"]);
    ed.move_cursor(Cursor::new(0, 1), false);
    ed.insert_text("y");
    ed.insert_text("z");
    assert!(ed.can_undo());
    assert!(ed.undo());
    assert_eq!(ed.content(), "x");
    assert_eq!(commits(&notes), 1);
    assert_eq!(ed.redo_depth(), 1);
}

#[test]
fn new_edit_clears_redo() {
    let (mut ed, _clock, _notes) = rig(&["x"]);
    ed.insert_text("a");
    ed.undo();
    assert!(ed.can_redo());
    ed.insert_text("b");
    assert!(!ed.can_redo());
    assert!(!ed.redo());
}

#[test]
fn version_moves_once_per_change_and_never_on_noops() {
    let (mut ed, _clock, _notes) = rig(&["ab"]);
    let v0 = ed.version();
    ed.insert_text("1");
    assert_eq!(ed.version(), v0 + 1);
    ed.move_cursor(Cursor::origin(), false);
    assert!(!ed.backspace());
    assert!(!ed.insert_text(""));
    assert!(!ed.delete_selection());
    assert_eq!(ed.version(), v0 + 1);
    ed.undo();
    assert_eq!(ed.version(), v0 + 2);
    assert!(!ed.undo());
    assert_eq!(ed.version(), v0 + 2);
}

#[test]
fn read_only_rejection_reported_once_per_burst() {
    let (mut ed, clock, notes) = rig(&["abc"]);
    ed.set_read_only(true);
    let rejections = |n: &RecordingNotifier| n.count(|e| matches!(e, EditorEvent::ReadOnlyRejected));
    for _ in 0..5 {
        assert!(!ed.insert_text("x"));
        clock.advance(Duration::from_millis(50));
    }
    assert!(!ed.undo());
    assert_eq!(rejections(&notes), 1);
    clock.advance(WINDOW);
    assert!(!ed.backspace());
    assert_eq!(rejections(&notes), 2);
    assert_eq!(ed.lines(), vec!["abc"]);
    ed.set_read_only(false);
    assert!(ed.insert_text("x"));
}

#[test]
fn reload_starts_fresh_history_and_version() {
    let (mut ed, _clock, notes) = rig(&["a"]);
    ed.insert_text("b");
    let before = ed.version();
    ed.reload(["one", "two"]);
    assert!(ed.version() > before);
    assert!(!ed.can_undo());
    assert!(!ed.can_redo());
    assert_eq!(ed.layout_cache().len(), 2);
    assert!(notes.events().iter().any(|e| matches!(e, EditorEvent::Reloaded { lines: 2, .. })));
    assert_eq!(commits(&notes), 1);
}

#[test]
fn open_save_and_dirty_tracking() {
    let (mut ed, _clock, notes) = rig(&[""]);
    let mut src = MemorySource::new(["fn main() {}", ""]).with_kind("rs");
    let view = src.clone();
    ed.open(&mut src).unwrap();
    assert_eq!(ed.file_kind(), "rs");
    assert!(!ed.is_dirty());
    ed.insert_text("// ");
    assert!(ed.is_dirty());
    ed.save(&mut src).unwrap();
    assert!(!ed.is_dirty());
    assert_eq!(view.snapshot(), vec!["// fn main() {}", ""]);
    assert!(notes.events().iter().any(|e| matches!(e, EditorEvent::Saved { .. })));
    assert_eq!(ed.undo_depth(), 1);
}

#[test]
fn clear_history_notifies() {
    let (mut ed, _clock, notes) = rig(&["a"]);
    ed.insert_text("b");
    ed.clear_history();
    assert!(!ed.can_undo());
    assert_eq!(notes.events(), vec![EditorEvent::HistoryCleared]);
}

#[test]
fn dispose_commits_and_stops_timer() {
    let (mut ed, clock, notes) = rig(&["a"]);
    ed.insert_text("b");
    ed.dispose();
    assert_eq!(commits(&notes), 1);
    assert_eq!(ed.undo_depth(), 1);
    clock.advance(WINDOW * 2);
    assert!(!ed.tick());
    assert!(!ed.insert_text("c"));
    assert_eq!(ed.content(), "ba");
}

#[test]
fn history_capacity_evicts_oldest() {
    let clock = ManualClock::new();
    let opts = EditorOptions {
        history_capacity: 2,
        ..EditorOptions::default()
    };
    let mut ed = Editor::from_lines([""], opts).with_clock(Arc::new(clock.clone()));
    for ch in ["a", "b", "c"] {
        ed.insert_text(ch);
        ed.focus_lost();
    }
    assert_eq!(ed.undo_depth(), 2);
    assert!(ed.undo());
    assert!(ed.undo());
    assert!(!ed.undo());
    assert_eq!(ed.content(), "a");
}
