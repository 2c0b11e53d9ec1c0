//! Integration tests for clipboard, drops and document files.
//!
//! Tests cover:
//! - Copy and paste centered on the cursor
//! - Plain-text and malformed payloads
//! - Bindings among pasted copies
//! - Dropping documents and library items
//! - Save and load through a file

use crate::helpers::*;
use inkboard::document::serialize_library;
use inkboard::geometry::Point;
use inkboard::input::{DropPayload, EditorEvent, Modifiers};
use inkboard::types::ElementType;
use inkboard::Editor;
use tempfile::TempDir;

fn paste_at(editor: &mut Editor, payload: &str, x: f32, y: f32) -> inkboard::EditorResult<()> {
    editor.dispatch(EditorEvent::Paste {
        payload: payload.to_string(),
        position: Point::new(x, y),
    })
}

// ============================================================================
// Paste
// ============================================================================

#[test]
fn test_paste_centers_copy_on_cursor() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    let payload = editor.copy_selected().unwrap();
    paste_at(&mut editor, &payload, 400.0, 400.0).unwrap();

    assert_eq!(editor.scene_elements().len(), 2);
    let copy_id = selected(&editor).into_iter().next().unwrap();
    assert_ne!(copy_id, id("a"));
    let copy = editor.scene().get_live_element(&copy_id).cloned().unwrap();
    assert_close(copy.x, 350.0);
    assert_close(copy.y, 350.0);
    assert!(editor.history().can_undo());
}

#[test]
fn test_paste_plain_text_creates_text() {
    let mut editor = TestEditorBuilder::new().build();
    paste_at(&mut editor, "hello board", 100.0, 100.0).unwrap();

    let text = only_of_kind(&editor, ElementType::Text);
    assert_eq!(text.text().map(|t| t.text.as_str()), Some("hello board"));
    assert!(editor.state().is_selected(text.id()));
}

#[test]
fn test_paste_whitespace_is_ignored() {
    let mut editor = TestEditorBuilder::new().build();
    paste_at(&mut editor, "   \n", 100.0, 100.0).unwrap();
    assert!(editor.scene_elements().is_empty());
}

#[test]
fn test_malformed_payload_sets_error() {
    let mut editor = TestEditorBuilder::new().build();
    let result = paste_at(&mut editor, "{not json", 0.0, 0.0);

    assert!(result.is_err());
    assert!(editor.state().error_message.is_some());
    assert!(editor.scene_elements().is_empty());
}

#[test]
fn test_pasted_arrow_binds_to_pasted_shapes() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 300.0, 0.0, 100.0, 100.0))
        .build();
    editor.select_tool(ElementType::Arrow);
    drag(&mut editor, (50.0, 50.0), (350.0, 50.0));

    press_key(&mut editor, inkboard::input::Key::Char('a'), Modifiers::ctrl());
    let payload = editor.copy_selected().unwrap();
    paste_at(&mut editor, &payload, 200.0, 600.0).unwrap();

    let copies = selected(&editor);
    assert_eq!(copies.len(), 3);
    let arrow = editor
        .scene_elements()
        .into_iter()
        .find(|el| copies.contains(el.id()) && el.element_type() == ElementType::Arrow)
        .cloned()
        .unwrap();
    let linear = arrow.linear().unwrap();
    let start = linear.start_binding.as_ref().map(|b| b.element_id.clone()).unwrap();
    let end = linear.end_binding.as_ref().map(|b| b.element_id.clone()).unwrap();
    assert!(copies.contains(&start));
    assert!(copies.contains(&end));
    assert_bindings_consistent(&editor);
}

// ============================================================================
// Drops
// ============================================================================

#[test]
fn test_dropped_document_replaces_scene() {
    let source = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 200.0, 0.0, 50.0, 50.0))
        .build();
    let json = source.serialize().unwrap();

    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("other", 0.0, 0.0, 10.0, 10.0))
        .build();
    editor.dispatch(EditorEvent::Drop(DropPayload::Document(json))).unwrap();

    assert_eq!(editor.scene_elements().len(), 2);
    assert_close(live(&editor, "b").width, 50.0);
    assert!(editor.scene().get_live_element(&id("other")).is_none());
    assert!(!editor.state().is_loading);
}

#[test]
fn test_dropped_garbage_document_keeps_scene() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let result = editor.dispatch(EditorEvent::Drop(DropPayload::Document("[]".to_string())));

    assert!(result.is_err());
    assert!(editor.state().error_message.is_some());
    live(&editor, "a");
}

#[test]
fn test_library_drop_inserts_at_position() {
    let item = vec![filled_rect("x", 0.0, 0.0, 40.0, 20.0)];
    let json = serialize_library(&[item]).unwrap();
    let mut editor = TestEditorBuilder::new().build();
    editor
        .dispatch(EditorEvent::Drop(DropPayload::Library {
            json,
            position: Point::new(100.0, 100.0),
        }))
        .unwrap();

    let rect = only_of_kind(&editor, ElementType::Rectangle);
    assert_ne!(rect.id(), &id("x"));
    assert_close(rect.x, 80.0);
    assert_close(rect.y, 90.0);
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("board.inkboard");

    let mut source = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 200.0, 0.0, 50.0, 50.0))
        .build();
    click(&mut source, 225.0, 25.0);
    press_key(&mut source, inkboard::input::Key::Delete, Modifiers::NONE);
    source.save_to_path(&path).unwrap();

    let mut editor = Editor::new();
    editor.load_from_path(&path).unwrap();
    assert_eq!(editor.scene_elements().len(), 1);
    live(&editor, "a");
    assert!(editor.scene().get_element(&id("b")).is_none());
}

#[test]
fn test_load_missing_file_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut editor = Editor::new();
    let result = editor.load_from_path(&temp_dir.path().join("missing.inkboard"));

    assert!(result.is_err());
    assert!(!editor.state().is_loading);
    assert!(editor.state().error_message.is_some());
}
