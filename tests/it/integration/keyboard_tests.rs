//! Integration tests for keyboard shortcuts.
//!
//! Tests cover:
//! - Arrow nudging and its single history entry
//! - Select all, grouping and ungrouping
//! - Duplicate, delete and tool shortcuts
//! - Enter and Escape on the current selection
//! - The point editor closing once its arrow leaves the selection
//! - Space release dropping the selection under a drawing tool

use crate::helpers::*;
use inkboard::app_state::AppStatePatch;
use inkboard::element::Element;
use inkboard::input::{Key, Modifiers};
use inkboard::types::ElementType;
use inkboard::{Editor, SceneUpdate};

fn pair() -> Editor {
    TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_element(filled_rect("b", 200.0, 0.0, 100.0, 100.0))
        .build()
}

// ============================================================================
// Nudging
// ============================================================================

#[test]
fn test_arrow_keys_nudge_selection() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();

    press_key(&mut editor, Key::ArrowRight, Modifiers::NONE);
    assert_close(live(&editor, "a").x, 1.0);

    press_key(&mut editor, Key::ArrowDown, Modifiers::shift());
    assert_close(live(&editor, "a").y, 5.0);
}

#[test]
fn test_held_arrow_is_one_undo_step() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    let before = editor.history().len();

    // Key repeat sends several downs before the single up
    for _ in 0..3 {
        key_down(&mut editor, Key::ArrowLeft, Modifiers::NONE);
    }
    key_up(&mut editor, Key::ArrowLeft, Modifiers::NONE);

    assert_close(live(&editor, "a").x, -3.0);
    assert_eq!(editor.history().len(), before + 1);
    assert!(editor.undo());
    assert_close(live(&editor, "a").x, 0.0);
}

#[test]
fn test_nudge_follows_grid() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    press_key(&mut editor, Key::Char('\''), Modifiers::ctrl());
    assert_eq!(editor.state().grid_size, Some(20.0));

    press_key(&mut editor, Key::ArrowRight, Modifiers::NONE);
    assert_close(live(&editor, "a").x, 20.0);
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn test_group_then_click_selects_whole_group() {
    let mut editor = pair();
    press_key(&mut editor, Key::Char('a'), Modifiers::ctrl());
    press_key(&mut editor, Key::Char('g'), Modifiers::ctrl());

    assert_eq!(editor.state().selected_group_ids.len(), 1);
    let a = live(&editor, "a");
    assert_eq!(a.group_ids.len(), 1);
    assert_eq!(a.group_ids, live(&editor, "b").group_ids);

    click(&mut editor, 500.0, 500.0);
    assert!(selected(&editor).is_empty());
    click(&mut editor, 50.0, 50.0);
    assert_eq!(selected(&editor), [id("a"), id("b")].into());
}

#[test]
fn test_ungroup_clears_membership() {
    let mut editor = pair();
    press_key(&mut editor, Key::Char('a'), Modifiers::ctrl());
    press_key(&mut editor, Key::Char('g'), Modifiers::ctrl());
    press_key(&mut editor, Key::Char('g'), ctrl_shift());

    assert!(editor.state().selected_group_ids.is_empty());
    assert!(live(&editor, "a").group_ids.is_empty());
    assert!(live(&editor, "b").group_ids.is_empty());
    assert_eq!(selected(&editor), [id("a"), id("b")].into());
}

// ============================================================================
// Editing shortcuts
// ============================================================================

#[test]
fn test_duplicate_offsets_copy() {
    let mut editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .with_selection(&["a"])
        .build();
    press_key(&mut editor, Key::Char('d'), Modifiers::ctrl());

    assert_eq!(editor.scene_elements().len(), 2);
    let copy_id = selected(&editor).into_iter().next().unwrap();
    assert_ne!(copy_id, id("a"));
    let copy = editor.scene().get_live_element(&copy_id).cloned().unwrap();
    assert_close(copy.x, 10.0);
    assert_close(copy.y, 10.0);
}

#[test]
fn test_delete_tombstones_selection() {
    let mut editor = pair();
    click(&mut editor, 50.0, 50.0);
    press_key(&mut editor, Key::Backspace, Modifiers::NONE);

    assert!(editor.scene().get_live_element(&id("a")).is_none());
    assert!(editor.scene().get_element(&id("a")).is_some_and(|el| el.is_deleted));
    assert_eq!(editor.scene_elements().len(), 1);
    assert!(selected(&editor).is_empty());
}

#[test]
fn test_letter_shortcuts_pick_tools() {
    let mut editor = TestEditorBuilder::new().build();
    press_key(&mut editor, Key::Char('r'), Modifiers::NONE);
    assert_eq!(editor.state().element_type, ElementType::Rectangle);
    press_key(&mut editor, Key::Char('5'), Modifiers::NONE);
    assert_eq!(editor.state().element_type, ElementType::Arrow);
    press_key(&mut editor, Key::Char('q'), Modifiers::NONE);
    assert!(editor.state().element_locked);
}

#[test]
fn test_alt_z_toggles_zen_mode() {
    let mut editor = TestEditorBuilder::new().build();
    press_key(&mut editor, Key::Char('z'), Modifiers::alt());
    assert!(editor.state().zen_mode_enabled);
    press_key(&mut editor, Key::Char('z'), Modifiers::alt());
    assert!(!editor.state().zen_mode_enabled);
}

// ============================================================================
// Enter and Escape
// ============================================================================

#[test]
fn test_enter_opens_point_editor_on_arrow() {
    let mut editor = TestEditorBuilder::new().build();
    editor.select_tool(ElementType::Arrow);
    drag(&mut editor, (0.0, 0.0), (200.0, 0.0));
    let arrow = only_of_kind(&editor, ElementType::Arrow);

    press_key(&mut editor, Key::Enter, Modifiers::NONE);
    let point_editor = editor.state().editing_linear_element.as_ref().map(|e| e.element_id.clone());
    assert_eq!(point_editor, Some(arrow.id().clone()));

    press_key(&mut editor, Key::Escape, Modifiers::NONE);
    assert!(editor.state().editing_linear_element.is_none());
    assert!(editor.state().is_selected(arrow.id()));
}

#[test]
fn test_escape_clears_selection_and_tool() {
    let mut editor = pair();
    click(&mut editor, 50.0, 50.0);
    editor.select_tool(ElementType::Diamond);
    press_key(&mut editor, Key::Escape, Modifiers::NONE);

    assert!(selected(&editor).is_empty());
    assert_eq!(editor.state().element_type, ElementType::Selection);
}

fn arrow_in_point_editor(editor: &mut Editor) -> Element {
    editor.select_tool(ElementType::Arrow);
    drag(editor, (0.0, 300.0), (200.0, 300.0));
    press_key(editor, Key::Enter, Modifiers::NONE);
    only_of_kind(editor, ElementType::Arrow)
}

#[test]
fn test_select_all_closes_point_editor() {
    let mut editor = pair();
    let arrow = arrow_in_point_editor(&mut editor);
    assert!(editor.state().editing_linear_element.is_some());

    press_key(&mut editor, Key::Char('a'), Modifiers::ctrl());
    assert!(editor.state().editing_linear_element.is_none());
    assert_eq!(selected(&editor), [id("a"), id("b"), arrow.id().clone()].into());
}

#[test]
fn test_switching_tool_closes_point_editor() {
    let mut editor = pair();
    arrow_in_point_editor(&mut editor);

    editor.select_tool(ElementType::Rectangle);
    assert!(editor.state().editing_linear_element.is_none());
    assert!(selected(&editor).is_empty());
}

// ============================================================================
// Space
// ============================================================================

fn select_with_tool(editor: &mut Editor, tool: ElementType, ids: &[&str]) {
    editor.update_scene(SceneUpdate {
        app_state: Some(AppStatePatch {
            element_type: Some(tool),
            selected_element_ids: Some(ids.iter().map(|s| id(s)).collect()),
            ..AppStatePatch::default()
        }),
        ..SceneUpdate::default()
    });
}

#[test]
fn test_space_release_with_drawing_tool_clears_selection() {
    let mut editor = pair();
    select_with_tool(&mut editor, ElementType::Rectangle, &["a"]);
    assert_eq!(selected(&editor), [id("a")].into());

    key_down(&mut editor, Key::Space, Modifiers::NONE);
    key_up(&mut editor, Key::Space, Modifiers::NONE);
    assert!(selected(&editor).is_empty());
    assert_eq!(editor.state().element_type, ElementType::Rectangle);
}

#[test]
fn test_space_release_with_selection_tool_keeps_selection() {
    let mut editor = pair();
    click(&mut editor, 50.0, 50.0);

    key_down(&mut editor, Key::Space, Modifiers::NONE);
    key_up(&mut editor, Key::Space, Modifiers::NONE);
    assert_eq!(selected(&editor), [id("a")].into());
}
