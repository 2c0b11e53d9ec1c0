//! Integration tests for arrow bindings.
//!
//! Tests cover:
//! - Drawing an arrow between two shapes binds both ends
//! - Moving a bound shape re-anchors the arrow
//! - Deleting a bound shape leaves no dangling references
//! - Ctrl while drawing suppresses binding
//! - Switching tools closes an open arrow and binds its end

use crate::helpers::*;
use inkboard::element::{linear_point_global, Element, ElementId};
use inkboard::input::{Key, Modifiers};
use inkboard::types::ElementType;
use inkboard::Editor;

// ============================================================================
// Fixtures
// ============================================================================

fn two_shapes() -> Editor {
    TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 300.0, 0.0, 100.0, 100.0))
        .build()
}

/// Draw an arrow from the center of `a` to the center of `b`.
fn draw_arrow(editor: &mut Editor, modifiers: Modifiers) -> Element {
    editor.select_tool(ElementType::Arrow);
    drag_with(editor, (50.0, 50.0), (350.0, 50.0), 4, modifiers);
    only_of_kind(editor, ElementType::Arrow)
}

fn start_target(arrow: &Element) -> Option<ElementId> {
    arrow
        .linear()
        .and_then(|l| l.start_binding.as_ref())
        .map(|b| b.element_id.clone())
}

fn end_target(arrow: &Element) -> Option<ElementId> {
    arrow
        .linear()
        .and_then(|l| l.end_binding.as_ref())
        .map(|b| b.element_id.clone())
}

// ============================================================================
// Binding on creation
// ============================================================================

#[test]
fn test_arrow_between_shapes_binds_both_ends() {
    let mut editor = two_shapes();
    let arrow = draw_arrow(&mut editor, Modifiers::NONE);

    assert_eq!(start_target(&arrow), Some(id("a")));
    assert_eq!(end_target(&arrow), Some(id("b")));
    assert!(live(&editor, "a").bound_elements().contains(arrow.id()));
    assert!(live(&editor, "b").bound_elements().contains(arrow.id()));
    assert_bindings_consistent(&editor);

    // The new arrow is selected and the tool falls back to selection
    assert!(editor.state().is_selected(arrow.id()));
    assert_eq!(editor.state().element_type, ElementType::Selection);
}

#[test]
fn test_ctrl_while_drawing_skips_binding() {
    let mut editor = two_shapes();
    let arrow = draw_arrow(&mut editor, Modifiers::ctrl());

    assert_eq!(start_target(&arrow), None);
    assert_eq!(end_target(&arrow), None);
    assert!(live(&editor, "a").bound_elements().is_empty());
    assert!(live(&editor, "b").bound_elements().is_empty());
}

// ============================================================================
// Propagation
// ============================================================================

#[test]
fn test_moving_bound_shape_reanchors_arrow() {
    let mut editor = two_shapes();
    let arrow = draw_arrow(&mut editor, Modifiers::NONE);

    // Grab b below the arrow's line so the press lands on the shape
    drag(&mut editor, (350.0, 80.0), (350.0, 180.0));

    let b = live(&editor, "b");
    assert_close(b.x, 300.0);
    assert_close(b.y, 100.0);

    let arrow = editor.scene().get_live_element(arrow.id()).cloned().unwrap();
    assert_eq!(end_target(&arrow), Some(id("b")));
    let count = arrow.linear().map(|l| l.points.len()).unwrap();
    let end = linear_point_global(&arrow, count - 1).unwrap();
    assert!(end.x >= 290.0 && end.x <= 410.0, "end x {}", end.x);
    assert!(end.y >= 90.0 && end.y <= 210.0, "end y {}", end.y);
    assert_bindings_consistent(&editor);
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_deleting_bound_shape_clears_references() {
    let mut editor = two_shapes();
    let arrow = draw_arrow(&mut editor, Modifiers::NONE);

    // Away from the arrow, inside a
    click(&mut editor, 20.0, 80.0);
    assert_eq!(selected(&editor), [id("a")].into());
    press_key(&mut editor, Key::Delete, Modifiers::NONE);

    assert!(editor.scene().get_live_element(&id("a")).is_none());
    let arrow_now = editor.scene().get_live_element(arrow.id()).cloned().unwrap();
    assert_eq!(start_target(&arrow_now), None);
    assert_eq!(end_target(&arrow_now), Some(id("b")));
    assert_bindings_consistent(&editor);

    // Tombstones carry no relations either
    let tombstone = editor.scene().get_element(&id("a")).cloned().unwrap();
    assert!(tombstone.is_deleted);
    assert!(tombstone.bound_elements().is_empty());
}

#[test]
fn test_undoing_delete_restores_both_sides() {
    let mut editor = two_shapes();
    let arrow = draw_arrow(&mut editor, Modifiers::NONE);

    click(&mut editor, 20.0, 80.0);
    press_key(&mut editor, Key::Delete, Modifiers::NONE);
    assert!(editor.undo());

    let a = live(&editor, "a");
    assert!(a.bound_elements().contains(arrow.id()));
    let arrow_now = editor.scene().get_live_element(arrow.id()).cloned().unwrap();
    assert_eq!(start_target(&arrow_now), Some(id("a")));
    assert_bindings_consistent(&editor);
}

// ============================================================================
// Tool changes
// ============================================================================

#[test]
fn test_switching_tool_finalizes_and_binds_open_arrow() {
    let mut editor = two_shapes();
    editor.select_tool(ElementType::Arrow);
    click(&mut editor, 50.0, 50.0);
    hover(&mut editor, 350.0, 50.0);
    click(&mut editor, 350.0, 50.0);
    hover(&mut editor, 360.0, 200.0);
    assert!(editor.state().multi_element.is_some());

    editor.select_tool(ElementType::Rectangle);
    let arrow = only_of_kind(&editor, ElementType::Arrow);
    assert!(editor.state().multi_element.is_none());
    assert_eq!(editor.state().element_type, ElementType::Rectangle);
    assert_eq!(arrow.linear().map(|l| l.points.len()), Some(2));
    assert_eq!(end_target(&arrow), Some(id("b")));
    assert!(live(&editor, "b").bound_elements().contains(arrow.id()));
    assert_bindings_consistent(&editor);
}
