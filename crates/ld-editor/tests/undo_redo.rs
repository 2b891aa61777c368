//! Integration tests: undo/redo through the editor (ld-editor).
//!
//! Verifies the linear history discipline across committed edits, drops,
//! imports and rehydration.

use ld_core::ElementData;
use ld_editor::{Editor, EditorConfig, EditorEvent};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn make_editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::new(EditorConfig::default()).unwrap()
}

fn drop_button(ed: &mut Editor, text: &str) {
    let last = ed.drop_zones().len() - 1;
    let payload = format!(r#"{{"tag":"gds-button","text":"{text}"}}"#);
    ed.drop(last, &payload).unwrap();
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn undo_at_start_is_a_no_op() {
    let mut ed = make_editor();
    let before = ed.export_json();
    assert!(!ed.undo());
    assert_eq!(ed.export_json(), before);
    assert_eq!(ed.history().position(), 0);
}

#[test]
fn n_undos_return_to_initial_snapshot() {
    let mut ed = make_editor();
    let initial = ed.export_json();
    for i in 0..5 {
        drop_button(&mut ed, &i.to_string());
    }
    assert_eq!(ed.history().len(), 6);
    for _ in 0..5 {
        assert!(ed.undo());
    }
    assert_eq!(ed.export_json(), initial);
    assert!(!ed.can_undo());
}

#[test]
fn redo_replays_undone_edits() {
    let mut ed = make_editor();
    drop_button(&mut ed, "a");
    drop_button(&mut ed, "b");
    let after = ed.export_json();
    ed.undo();
    ed.undo();
    assert!(ed.redo());
    assert!(ed.redo());
    assert!(!ed.redo());
    assert_eq!(ed.export_json(), after);
}

#[test]
fn new_edit_after_undo_discards_redo_branch() {
    let mut ed = make_editor();
    drop_button(&mut ed, "a");
    drop_button(&mut ed, "b");
    drop_button(&mut ed, "c");
    ed.undo();
    ed.undo();
    drop_button(&mut ed, "d");
    assert!(!ed.can_redo());
    assert_eq!((ed.history().len(), ed.history().position()), (3, 2));
    assert!(ed.export_json().contains(r#""d""#));
    assert!(!ed.export_json().contains(r#""b""#));
}

#[test]
fn rehydration_does_not_record_history() {
    let mut ed = make_editor();
    drop_button(&mut ed, "a");
    ed.undo();
    ed.redo();
    ed.undo();
    assert_eq!(ed.history().len(), 2);
}

#[test]
fn undo_rebuilds_drop_zones() {
    let mut ed = make_editor();
    drop_button(&mut ed, "a");
    drop_button(&mut ed, "b");
    assert_eq!(ed.drop_zones().len(), 3);
    ed.undo();
    assert_eq!(ed.drop_zones().len(), 2);
}

#[test]
fn history_limit_keeps_position_valid() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = EditorConfig {
        history_limit: 3,
        ..EditorConfig::default()
    };
    let mut ed = Editor::new(config).unwrap();
    for i in 0..10 {
        drop_button(&mut ed, &i.to_string());
    }
    assert_eq!((ed.history().len(), ed.history().position()), (3, 2));
    assert!(ed.undo());
    assert!(ed.undo());
    assert!(!ed.undo());
}

#[test]
fn property_edits_are_undoable() {
    let mut ed = make_editor();
    let root = ed.document().root();
    let child = ed
        .add_child(root, &ElementData::new("gds-button").with_text("Save"), None)
        .unwrap();
    ed.set_attribute(child, "rank", "secondary").unwrap();
    ed.undo();
    let child = ed.document().children(ed.document().root())[0];
    assert_eq!(ed.document().get(child).unwrap().attributes.get("rank"), None);
}

#[test]
fn history_events_report_position() {
    let mut ed = make_editor();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    ed.subscribe(move |e| {
        if let EditorEvent::HistoryChanged { position, len } = e {
            sink.borrow_mut().push((*position, *len));
        }
    });
    drop_button(&mut ed, "a");
    ed.undo();
    ed.redo();
    assert_eq!(events.borrow().clone(), vec![(1, 2), (0, 2), (1, 2)]);
}
