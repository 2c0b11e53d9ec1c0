//! Integration tests for remote updates and change listeners.
//!
//! Tests cover:
//! - Remote elements arriving between gestures
//! - Updates deferred while a gesture is open
//! - Version-based merging
//! - Collaborator cursors
//! - Listener notification counts and the conceptual mode

use crate::helpers::*;
use inkboard::app_state::Collaborator;
use inkboard::input::{Modifiers, PointerMode};
use inkboard::types::{CursorButton, ElementType};
use inkboard::{EditorMode, RemoteUpdate};
use inkboard::geometry::Point;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// ============================================================================
// Remote updates
// ============================================================================

#[test]
fn test_remote_element_applied_on_next_event() {
    let mut editor = TestEditorBuilder::new().build();
    let sender = editor.remote_sender();
    sender.send(RemoteUpdate {
        elements: vec![filled_rect("remote", 10.0, 10.0, 50.0, 50.0)],
        ..RemoteUpdate::default()
    });
    assert_eq!(sender.pending(), 1);
    assert!(editor.scene_elements().is_empty());

    hover(&mut editor, 0.0, 0.0);
    assert_eq!(sender.pending(), 0);
    live(&editor, "remote");
    // Remote changes are not local undo steps
    assert!(!editor.history().can_undo());
}

#[test]
fn test_remote_update_waits_for_gesture_end() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let sender = editor.remote_sender();

    pointer_down(&mut editor, 50.0, 50.0, Modifiers::NONE);
    sender.send(RemoteUpdate {
        elements: vec![filled_rect("remote", 300.0, 300.0, 50.0, 50.0)],
        ..RemoteUpdate::default()
    });
    pointer_move(&mut editor, 80.0, 50.0, Modifiers::NONE);
    assert!(editor.scene().get_live_element(&id("remote")).is_none());
    assert_eq!(sender.pending(), 1);

    pointer_up(&mut editor, 80.0, 50.0, Modifiers::NONE);
    live(&editor, "remote");
    assert_close(live(&editor, "a").x, 30.0);
}

#[test]
fn test_newer_remote_version_replaces_local() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let mut newer = live(&editor, "a");
    newer.mutate(|d| d.x = 500.0);
    let stale = filled_rect("a", -500.0, 0.0, 100.0, 100.0);

    let sender = editor.remote_sender();
    sender.send(RemoteUpdate {
        elements: vec![newer],
        ..RemoteUpdate::default()
    });
    hover(&mut editor, 0.0, 0.0);
    assert_close(live(&editor, "a").x, 500.0);

    sender.send(RemoteUpdate {
        elements: vec![stale],
        ..RemoteUpdate::default()
    });
    hover(&mut editor, 0.0, 0.0);
    assert_close(live(&editor, "a").x, 500.0);
}

#[test]
fn test_remote_delete_drops_local_selection() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    let mut gone = live(&editor, "a");
    gone.mutate(|d| d.is_deleted = true);

    editor.remote_sender().send(RemoteUpdate {
        elements: vec![gone],
        ..RemoteUpdate::default()
    });
    hover(&mut editor, 0.0, 0.0);

    assert!(editor.scene_elements().is_empty());
    assert!(selected(&editor).is_empty());
}

#[test]
fn test_collaborators_replaced_wholesale() {
    let mut editor = TestEditorBuilder::new().build();
    let cursor = Collaborator {
        pointer: Some(Point::new(5.0, 5.0)),
        button: CursorButton::Down,
        selected_element_ids: Vec::new(),
        username: Some("river".to_string()),
    };
    editor.remote_sender().send(RemoteUpdate {
        elements: Vec::new(),
        collaborators: Some(HashMap::from([("peer-1".to_string(), cursor.clone())])),
    });
    hover(&mut editor, 0.0, 0.0);

    assert_eq!(editor.state().collaborators.get("peer-1"), Some(&cursor));
}

// ============================================================================
// Listeners and mode
// ============================================================================

#[test]
fn test_listener_fires_once_per_event() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let calls = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&calls);
    let listener = editor.add_change_listener(move |_, _| *counter.borrow_mut() += 1);

    // down, four moves, up
    drag(&mut editor, (50.0, 50.0), (150.0, 50.0));
    assert_eq!(*calls.borrow(), 6);

    assert!(editor.remove_change_listener(listener));
    click(&mut editor, 500.0, 500.0);
    assert_eq!(*calls.borrow(), 6);
}

#[test]
fn test_listener_sees_committed_scene() {
    let mut editor = TestEditorBuilder::new().build();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor.add_change_listener(move |elements, _| sink.borrow_mut().push(elements.len()));

    editor.select_tool(ElementType::Rectangle);
    drag(&mut editor, (0.0, 0.0), (50.0, 50.0));

    assert_eq!(seen.borrow().last().copied(), Some(1));
}

#[test]
fn test_mode_tracks_gesture() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    assert_eq!(editor.mode(), EditorMode::Idle);

    pointer_down(&mut editor, 50.0, 50.0, Modifiers::NONE);
    assert_eq!(editor.mode(), EditorMode::Pointer(PointerMode::DraggingSelection));
    pointer_up(&mut editor, 50.0, 50.0, Modifiers::NONE);
    assert_eq!(editor.mode(), EditorMode::Idle);

    editor.select_tool(ElementType::Line);
    click(&mut editor, 200.0, 200.0);
    assert_eq!(editor.mode(), EditorMode::DrawingLinearMultiPoint);
}
