//! Integration tests for touch input.
//!
//! Tests cover:
//! - Two quick single-finger taps acting as a double click
//! - Slow taps and mouse clicks staying plain clicks
//! - A second finger hiding the selection until it lifts

use crate::helpers::*;
use inkboard::input::{EditorEvent, PointerEvent, PointerType};
use inkboard::types::ElementType;
use inkboard::{Editor, EditorMode};
use std::time::{Duration, Instant};

fn touch(pointer_id: u32, x: f32, y: f32) -> PointerEvent {
    PointerEvent {
        pointer_type: PointerType::Touch,
        ..PointerEvent::at(x, y).with_pointer_id(pointer_id)
    }
}

fn tap(editor: &mut Editor, x: f32, y: f32, at: Instant) {
    editor.dispatch_at(EditorEvent::PointerDown(touch(1, x, y)), at).unwrap();
    editor.dispatch_at(EditorEvent::PointerUp(touch(1, x, y)), at).unwrap();
}

#[test]
fn test_double_tap_opens_text_editor() {
    let mut editor = TestEditorBuilder::new().build();
    let t0 = Instant::now();
    tap(&mut editor, 200.0, 200.0, t0);
    tap(&mut editor, 200.0, 200.0, t0 + Duration::from_millis(150));

    assert_eq!(editor.mode(), EditorMode::EditingText);
    let text = only_of_kind(&editor, ElementType::Text);
    assert_eq!(editor.state().editing_element.as_ref(), Some(text.id()));
}

#[test]
fn test_slow_taps_stay_single() {
    let mut editor = TestEditorBuilder::new().build();
    let t0 = Instant::now();
    tap(&mut editor, 200.0, 200.0, t0);
    tap(&mut editor, 200.0, 200.0, t0 + Duration::from_millis(400));

    assert_eq!(editor.mode(), EditorMode::Idle);
    assert!(editor.scene_elements().is_empty());
}

#[test]
fn test_quick_mouse_clicks_are_not_taps() {
    let mut editor = TestEditorBuilder::new().build();
    click(&mut editor, 200.0, 200.0);
    click(&mut editor, 200.0, 200.0);

    assert!(editor.scene_elements().is_empty());
}

#[test]
fn test_second_finger_hides_selection_until_lifted() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    let t0 = Instant::now();
    editor.dispatch_at(EditorEvent::PointerDown(touch(1, 50.0, 50.0)), t0).unwrap();
    editor
        .dispatch_at(EditorEvent::PointerDown(touch(2, 300.0, 300.0)), t0 + Duration::from_millis(10))
        .unwrap();

    assert_eq!(editor.mode(), EditorMode::Pinching);
    assert!(selected(&editor).is_empty());

    editor
        .dispatch_at(EditorEvent::PointerUp(touch(2, 300.0, 300.0)), t0 + Duration::from_millis(20))
        .unwrap();
    assert_eq!(selected(&editor), [id("a")].into());

    editor
        .dispatch_at(EditorEvent::PointerUp(touch(1, 50.0, 50.0)), t0 + Duration::from_millis(30))
        .unwrap();
    assert_eq!(selected(&editor), [id("a")].into());
    assert_close(live(&editor, "a").x, 0.0);
    assert_eq!(editor.mode(), EditorMode::Idle);
}
