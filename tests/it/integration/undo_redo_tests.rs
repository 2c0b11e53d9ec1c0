//! Integration tests for undo/redo functionality.
//!
//! Tests cover:
//! - Creating an element and undoing/redoing it
//! - A whole drag collapsing into one history entry
//! - Redo being dropped by a new change
//! - Selection-only clicks leaving history alone

use crate::helpers::*;
use inkboard::input::{Key, Modifiers};
use inkboard::types::ElementType;

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_undo_redo_new_rectangle() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Rectangle);
    drag(&mut editor, (10.0, 10.0), (110.0, 60.0));

    let rect = only_of_kind(&editor, ElementType::Rectangle);
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 10.0, 100.0, 50.0));
    assert!(editor.history().can_undo());

    assert!(editor.undo());
    assert!(editor.scene_elements().is_empty());
    assert!(editor.history().can_redo());

    assert!(editor.redo());
    let restored = only_of_kind(&editor, ElementType::Rectangle);
    assert_eq!(restored.id(), rect.id());
    assert_eq!((restored.x, restored.y, restored.width, restored.height), (10.0, 10.0, 100.0, 50.0));
}

#[test]
fn test_undo_keeps_versions_increasing() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    drag(&mut editor, (50.0, 50.0), (150.0, 50.0));
    let moved_version = live(&editor, "a").version();

    assert!(editor.undo());
    let restored = live(&editor, "a");
    assert_close(restored.x, 0.0);
    assert!(restored.version() > moved_version);
}

#[test]
fn test_keyboard_undo_and_redo() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    drag(&mut editor, (50.0, 50.0), (150.0, 50.0));

    press_key(&mut editor, Key::Char('z'), Modifiers::ctrl());
    assert_close(live(&editor, "a").x, 0.0);

    press_key(&mut editor, Key::Char('z'), ctrl_shift());
    assert_close(live(&editor, "a").x, 100.0);

    press_key(&mut editor, Key::Char('z'), Modifiers::ctrl());
    press_key(&mut editor, Key::Char('y'), Modifiers::ctrl());
    assert_close(live(&editor, "a").x, 100.0);
}

// ============================================================================
// Coalescing
// ============================================================================

#[test]
fn test_drag_is_one_history_entry() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let before = editor.history().len();

    drag_with(&mut editor, (50.0, 50.0), (100.0, 50.0), 10, Modifiers::NONE);

    assert_eq!(editor.history().len(), before + 1);
    assert_close(live(&editor, "a").x, 50.0);

    assert!(editor.undo());
    assert_close(live(&editor, "a").x, 0.0);
    assert!(!editor.history().can_undo());
}

#[test]
fn test_selection_click_adds_no_entry() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let before = editor.history().len();

    click(&mut editor, 50.0, 50.0);
    assert!(editor.state().is_selected(&id("a")));
    click(&mut editor, 500.0, 500.0);
    assert!(editor.state().selected_element_ids.is_empty());

    assert_eq!(editor.history().len(), before);
}

#[test]
fn test_new_change_drops_redo() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    drag(&mut editor, (50.0, 50.0), (150.0, 50.0));
    assert!(editor.undo());
    assert!(editor.history().can_redo());

    drag(&mut editor, (50.0, 50.0), (50.0, 150.0));
    assert!(!editor.history().can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_undo_is_ignored_mid_gesture() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    drag(&mut editor, (50.0, 50.0), (150.0, 50.0));

    editor.select_tool(ElementType::Rectangle);
    pointer_down(&mut editor, 300.0, 300.0, Modifiers::NONE);
    pointer_move(&mut editor, 350.0, 350.0, Modifiers::NONE);
    assert!(!editor.undo());
    pointer_up(&mut editor, 350.0, 350.0, Modifiers::NONE);

    assert_eq!(editor.scene_elements().len(), 2);
}
