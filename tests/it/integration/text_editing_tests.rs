//! Integration tests for double click and text editing.
//!
//! Tests cover:
//! - Double click on empty canvas opening a text element
//! - Submitting, and discarding blank text
//! - Entering a group or the point editor by double click
//! - Viewport helpers that depend on the edited element

use crate::helpers::*;
use inkboard::geometry::Point;
use inkboard::input::{EditorEvent, Key, Modifiers, PointerEvent};
use inkboard::types::ElementType;
use inkboard::{Editor, EditorMode};

fn double_click(editor: &mut Editor, x: f32, y: f32) {
    click(editor, x, y);
    editor.dispatch(EditorEvent::DoubleClick(PointerEvent::at(x, y))).unwrap();
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_double_click_opens_text_editor() {
    let mut editor = TestEditorBuilder::new().build();
    double_click(&mut editor, 300.0, 300.0);

    assert_eq!(editor.mode(), EditorMode::EditingText);
    let text = only_of_kind(&editor, ElementType::Text);
    assert_eq!(editor.state().editing_element.as_ref(), Some(text.id()));
    // The host draws the element under edit itself
    assert!(editor.renderable_elements().is_empty());
}

#[test]
fn test_submit_selects_and_records() {
    let mut editor = TestEditorBuilder::new().build();
    let id = editor.start_text_editing(Point::new(50.0, 50.0), false);
    editor.update_text("hel");
    editor.submit_text("hello");

    let text = editor.scene().get_live_element(&id).cloned().unwrap();
    assert_eq!(text.text().map(|t| t.text.as_str()), Some("hello"));
    assert!(text.width > 0.0);
    assert!(editor.state().is_selected(&id));
    assert_eq!(editor.mode(), EditorMode::Idle);
    assert!(editor.history().can_undo());
    assert_eq!(editor.renderable_elements().len(), 1);
}

#[test]
fn test_blank_new_text_leaves_no_trace() {
    let mut editor = TestEditorBuilder::new().build();
    editor.start_text_editing(Point::new(50.0, 50.0), false);
    editor.submit_text("  ");

    assert!(editor.scene_elements().is_empty());
    assert!(!editor.history().can_undo());
}

#[test]
fn test_escape_submits_open_text() {
    let mut editor = TestEditorBuilder::new().build();
    let id = editor.start_text_editing(Point::new(50.0, 50.0), false);
    editor.update_text("note");
    press_key(&mut editor, Key::Escape, Modifiers::NONE);

    assert!(editor.state().editing_element.is_none());
    assert!(editor.scene().get_live_element(&id).is_some());
}

#[test]
fn test_editing_existing_text_reuses_it() {
    let mut editor = TestEditorBuilder::new().build();
    let id = editor.start_text_editing(Point::new(50.0, 50.0), false);
    editor.submit_text("first");
    let text = editor.scene().get_live_element(&id).cloned().unwrap();

    let center = Point::new(text.x + text.width / 2.0, text.y + text.height / 2.0);
    let again = editor.start_text_editing(center, false);
    assert_eq!(again, id);
    assert_eq!(editor.scene_elements().len(), 1);
}

// ============================================================================
// Groups and linear elements
// ============================================================================

#[test]
fn test_double_click_enters_group() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 200.0, 0.0, 100.0, 100.0))
        .build();
    press_key(&mut editor, Key::Char('a'), Modifiers::ctrl());
    press_key(&mut editor, Key::Char('g'), Modifiers::ctrl());
    let group = live(&editor, "a").group_ids[0].clone();

    editor.dispatch(EditorEvent::DoubleClick(PointerEvent::at(50.0, 50.0))).unwrap();

    assert_eq!(editor.state().editing_group_id, Some(group));
    assert_eq!(selected(&editor), [id("a")].into());
}

#[test]
fn test_double_click_on_selected_arrow_edits_points() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Arrow);
    drag(&mut editor, (0.0, 0.0), (200.0, 0.0));
    let arrow = only_of_kind(&editor, ElementType::Arrow);

    editor.dispatch(EditorEvent::DoubleClick(PointerEvent::at(100.0, 0.0))).unwrap();

    let point_editor = editor.state().editing_linear_element.as_ref().map(|e| e.element_id.clone());
    assert_eq!(point_editor, Some(arrow.id().clone()));
}

#[test]
fn test_double_click_ignored_with_drawing_tool() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Rectangle);
    editor.dispatch(EditorEvent::DoubleClick(PointerEvent::at(10.0, 10.0))).unwrap();

    assert!(editor.scene_elements().is_empty());
    assert_eq!(editor.mode(), EditorMode::Idle);
}

// ============================================================================
// Viewport and reset
// ============================================================================

#[test]
fn test_scroll_bars_follow_content() {
    let mut editor = TestEditorBuilder::new().build();
    editor.set_viewport(800.0, 600.0, 0.0, 0.0);
    let empty = editor.scroll_bars();
    assert!(empty.horizontal.is_none() && empty.vertical.is_none());

    editor.select_tool(ElementType::Rectangle);
    drag(&mut editor, (100.0, 100.0), (200.0, 200.0));
    let fits = editor.scroll_bars();
    assert!(fits.horizontal.is_none() && fits.vertical.is_none());

    // Past the bottom-right corner of the viewport
    editor.select_tool(ElementType::Rectangle);
    drag(&mut editor, (700.0, 500.0), (900.0, 700.0));
    let bars = editor.scroll_bars();
    assert!(bars.horizontal.is_some());
    assert!(bars.vertical.is_some());
}

#[test]
fn test_reset_scene_starts_over() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    editor.set_viewport(800.0, 600.0, 0.0, 0.0);
    editor.toggle_zen_mode();
    editor.reset_scene();

    assert!(editor.scene_elements().is_empty());
    assert!(selected(&editor).is_empty());
    assert!(!editor.state().zen_mode_enabled);
    assert_eq!(editor.state().width, 800.0);
    assert!(!editor.history().can_undo());
}
