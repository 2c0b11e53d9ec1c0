//! Integration tests for complete pointer gestures.
//!
//! Tests cover:
//! - Drawing shapes and discarding invisibly small ones
//! - Dragging, alt-drag duplication and marquee selection
//! - Resizing with and without the aspect lock
//! - Multi-point lines and closing a loop
//! - Panning with space held and wheel zoom

use crate::helpers::*;
use inkboard::input::{EditorEvent, Key, Modifiers, PointerEvent, WheelEvent};
use inkboard::geometry::Point;
use inkboard::types::ElementType;
use inkboard::EditorMode;
use std::time::{Duration, Instant};

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_drag_draws_rectangle() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Rectangle);
    drag(&mut editor, (10.0, 10.0), (110.0, 60.0));

    let rect = only_of_kind(&editor, ElementType::Rectangle);
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 10.0, 100.0, 50.0));
    assert_eq!(selected(&editor), [rect.id().clone()].into());
    assert_eq!(editor.state().element_type, ElementType::Selection);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_click_without_drag_leaves_nothing() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Rectangle);
    click(&mut editor, 10.0, 10.0);

    assert!(editor.scene_elements().is_empty());
    assert!(!editor.history().can_undo());
}

#[test]
fn test_tool_lock_keeps_tool() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Ellipse);
    editor.toggle_lock();
    drag(&mut editor, (0.0, 0.0), (80.0, 80.0));

    assert_eq!(editor.state().element_type, ElementType::Ellipse);
    only_of_kind(&editor, ElementType::Ellipse);
}

// ============================================================================
// Selection and dragging
// ============================================================================

#[test]
fn test_drag_moves_selected_shape() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    drag(&mut editor, (50.0, 50.0), (100.0, 50.0));

    let a = live(&editor, "a");
    assert_close(a.x, 50.0);
    assert_close(a.y, 0.0);
    assert!(editor.state().is_selected(&id("a")));
}

#[test]
fn test_filled_shape_wins_over_selected_outline() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(outlined_rect("b", 105.0, 0.0, 100.0, 100.0))
        .with_selection(&["b"])
        .build();
    // Inside b's padded box but clear of its side handle
    click(&mut editor, 98.0, 20.0);

    assert_eq!(selected(&editor), [id("a")].into());
}

#[test]
fn test_marquee_selects_intersecting() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 300.0, 300.0, 100.0, 100.0))
        .build();
    drag(&mut editor, (-10.0, -10.0), (60.0, 60.0));

    assert_eq!(selected(&editor), [id("a")].into());
    assert!(editor.state().selection_element.is_none());
    assert_close(live(&editor, "a").x, 0.0);
}

#[test]
fn test_alt_drag_leaves_copy_behind() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    drag_with(&mut editor, (50.0, 50.0), (150.0, 50.0), 4, Modifiers::alt());

    let elements = editor.scene_elements();
    assert_eq!(elements.len(), 2);
    assert_close(live(&editor, "a").x, 100.0);
    let copy = elements.iter().find(|el| el.id() != &id("a")).copied().unwrap();
    assert_close(copy.x, 0.0);
    assert_close(copy.y, 0.0);
}

// ============================================================================
// Resizing
// ============================================================================

#[test]
fn test_resize_from_corner_handle() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 50.0))
        .with_selection(&["a"])
        .build();
    drag_with(&mut editor, (108.0, 58.0), (148.0, 63.0), 4, Modifiers::NONE);

    let a = live(&editor, "a");
    assert_close(a.width, 140.0);
    assert_close(a.height, 55.0);
    assert!(!editor.state().is_resizing);
}

#[test]
fn test_shift_resize_keeps_aspect_ratio() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 50.0))
        .with_selection(&["a"])
        .build();
    drag_with(&mut editor, (108.0, 58.0), (148.0, 63.0), 4, Modifiers::shift());

    let a = live(&editor, "a");
    assert_close(a.width, 140.0);
    assert_close(a.height, 70.0);
    assert_close(a.x, 0.0);
    assert_close(a.y, 0.0);
}

// ============================================================================
// Multi-point lines
// ============================================================================

#[test]
fn test_clicking_back_on_start_closes_loop() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Line);
    click(&mut editor, 100.0, 100.0);
    for (x, y) in [(200.0, 100.0), (200.0, 200.0), (100.0, 200.0), (102.0, 101.0)] {
        hover(&mut editor, x, y);
        click(&mut editor, x, y);
    }

    let line = only_of_kind(&editor, ElementType::Line);
    let points = line.linear().map(|l| l.points.clone()).unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0], Point::ZERO);
    assert_eq!(points[4], points[0]);
    assert!(editor.state().multi_element.is_none());
    assert!(editor.state().is_selected(line.id()));
}

#[test]
fn test_escape_finalizes_open_line() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Line);
    click(&mut editor, 0.0, 0.0);
    hover(&mut editor, 100.0, 0.0);
    click(&mut editor, 100.0, 0.0);
    hover(&mut editor, 150.0, 80.0);
    press_key(&mut editor, Key::Escape, Modifiers::NONE);

    let line = only_of_kind(&editor, ElementType::Line);
    assert_eq!(line.linear().map(|l| l.points.len()), Some(2));
    assert!(editor.state().multi_element.is_none());
    assert_eq!(editor.state().element_type, ElementType::Selection);
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_space_drag_pans_canvas() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 300.0, 300.0))
        .build();
    key_down(&mut editor, Key::Space, Modifiers::NONE);
    drag_with(&mut editor, (100.0, 100.0), (150.0, 120.0), 1, Modifiers::NONE);
    key_up(&mut editor, Key::Space, Modifiers::NONE);

    assert_close(editor.state().scroll_x, 50.0);
    assert_close(editor.state().scroll_y, 20.0);
    assert_close(live(&editor, "a").x, 0.0);
    assert!(selected(&editor).is_empty());
}

#[test]
fn test_pan_scroll_floors_each_step() {
    let mut editor = TestEditorBuilder::new().build();
    key_down(&mut editor, Key::Space, Modifiers::NONE);
    // Four steps of 12.5 floor to 12 each
    drag(&mut editor, (100.0, 100.0), (150.0, 100.0));
    key_up(&mut editor, Key::Space, Modifiers::NONE);

    assert_close(editor.state().scroll_x, 48.0);
}

#[test]
fn test_pointer_down_elsewhere_keeps_space_pan() {
    let mut editor = TestEditorBuilder::new().build();
    key_down(&mut editor, Key::Space, Modifiers::NONE);
    pointer_down(&mut editor, 100.0, 100.0, Modifiers::NONE);
    pointer_move(&mut editor, 130.0, 100.0, Modifiers::NONE);

    let second = PointerEvent::at(400.0, 400.0).with_pointer_id(2);
    editor.dispatch(EditorEvent::PointerDown(second)).unwrap();
    assert_eq!(editor.mode(), EditorMode::Panning);

    pointer_move(&mut editor, 150.0, 100.0, Modifiers::NONE);
    pointer_up(&mut editor, 150.0, 100.0, Modifiers::NONE);
    key_up(&mut editor, Key::Space, Modifiers::NONE);
    assert_close(editor.state().scroll_x, 50.0);
    assert_eq!(editor.mode(), EditorMode::Idle);
}

#[test]
fn test_wheel_zoom_hides_selection_until_settled() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    let now = Instant::now();
    let wheel = EditorEvent::Wheel(WheelEvent {
        position: Point::new(50.0, 50.0),
        delta_x: 0.0,
        delta_y: -5.0,
        modifiers: Modifiers::ctrl(),
    });
    editor.dispatch_at(wheel, now).unwrap();

    assert!(editor.state().zoom.value > 1.0);
    assert!(selected(&editor).is_empty());

    editor.tick(now + Duration::from_millis(400));
    assert_eq!(selected(&editor), [id("a")].into());
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_non_finite_pointer_input_is_ignored() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    pointer_down(&mut editor, 50.0, 50.0, Modifiers::NONE);
    pointer_move(&mut editor, 80.0, 50.0, Modifiers::NONE);
    pointer_move(&mut editor, f32::NAN, f32::NAN, Modifiers::NONE);
    pointer_up(&mut editor, f32::NAN, 50.0, Modifiers::NONE);

    let a = live(&editor, "a");
    assert_close(a.x, 30.0);
    assert_close(a.y, 0.0);
    assert_eq!(editor.mode(), EditorMode::Idle);
}

#[test]
fn test_non_finite_wheel_delta_counts_as_zero() {
    let mut editor = TestEditorBuilder::new().build();
    let wheel = EditorEvent::Wheel(WheelEvent {
        position: Point::new(50.0, 50.0),
        delta_x: f32::NAN,
        delta_y: 10.0,
        modifiers: Modifiers::NONE,
    });
    editor.dispatch(wheel).unwrap();

    assert_eq!(editor.state().scroll_x, 0.0);
    assert_eq!(editor.state().scroll_y, -10.0);

    let zoom = EditorEvent::Wheel(WheelEvent {
        position: Point::new(f32::NAN, 50.0),
        delta_x: 0.0,
        delta_y: -5.0,
        modifiers: Modifiers::ctrl(),
    });
    editor.dispatch(zoom).unwrap();
    assert_eq!(editor.state().zoom.value, 1.0);
    assert!(editor.state().zoom.translation.is_finite());
}
