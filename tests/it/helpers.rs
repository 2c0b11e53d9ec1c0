//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestEditorBuilder` - Builder pattern for creating editors with a prepared scene
//! - Element fixtures like `filled_rect()` and `outlined_rect()`
//! - Event drivers like `click()`, `drag()` and `press_key()`
//! - Invariant assertions shared across workflows

#![allow(dead_code)]

use inkboard::app_state::AppStatePatch;
use inkboard::binding::binding_violations;
use inkboard::element::{new_element, Element, ElementId, ElementStyle};
use inkboard::input::{EditorEvent, Key, KeyEvent, Modifiers, PointerEvent};
use inkboard::settings::Settings;
use inkboard::types::ElementType;
use inkboard::{Editor, SceneUpdate};
use std::collections::HashSet;

// ============================================================================
// Fixtures
// ============================================================================

pub fn id(s: &str) -> ElementId {
    ElementId::from(s)
}

fn shape(kind: ElementType, name: &str, x: f32, y: f32, w: f32, h: f32, background: &str) -> Element {
    let style = ElementStyle {
        background_color: background.to_string(),
        ..ElementStyle::default()
    };
    let mut el = new_element(kind, x, y, style);
    el.mutate(|d| {
        d.width = w;
        d.height = h;
    });
    Element::with_id(id(name), el.data().clone())
}

/// Rectangle hit anywhere inside.
pub fn filled_rect(name: &str, x: f32, y: f32, w: f32, h: f32) -> Element {
    shape(ElementType::Rectangle, name, x, y, w, h, "#fab005")
}

/// Rectangle hit only near its outline.
pub fn outlined_rect(name: &str, x: f32, y: f32, w: f32, h: f32) -> Element {
    shape(ElementType::Rectangle, name, x, y, w, h, "transparent")
}

// ============================================================================
// TestEditorBuilder - Builder pattern for creating test editors
// ============================================================================

/// Builder for creating test editors with elements and configuration.
///
/// The built scene is the history baseline, so a test's first undo step is
/// its own first gesture.
///
/// # Example
/// ```ignore
/// let editor = TestEditorBuilder::new()
///     .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
///     .with_selection(&["a"])
///     .build();
/// ```
pub struct TestEditorBuilder {
    elements: Vec<Element>,
    selection: Vec<ElementId>,
    settings: Settings,
    zoom: Option<f32>,
}

impl Default for TestEditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEditorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            selection: Vec::new(),
            settings: Settings::default(),
            zoom: None,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_selection(mut self, ids: &[&str]) -> Self {
        self.selection = ids.iter().map(|s| id(s)).collect();
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the zoom level.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Build the editor.
    pub fn build(self) -> Editor {
        let mut editor = Editor::with_settings(self.settings);
        let selected: HashSet<ElementId> = self.selection.into_iter().collect();
        editor.update_scene(SceneUpdate {
            elements: Some(self.elements),
            app_state: Some(AppStatePatch {
                selected_element_ids: Some(selected),
                zoom: self.zoom,
                ..AppStatePatch::default()
            }),
            ..SceneUpdate::default()
        });
        editor.history_clear();
        editor
    }
}

// ============================================================================
// Event drivers
// ============================================================================

pub fn pointer_down(editor: &mut Editor, x: f32, y: f32, modifiers: Modifiers) {
    let event = PointerEvent::at(x, y).with_modifiers(modifiers);
    editor.dispatch(EditorEvent::PointerDown(event)).unwrap();
}

pub fn pointer_move(editor: &mut Editor, x: f32, y: f32, modifiers: Modifiers) {
    let event = PointerEvent::at(x, y).with_modifiers(modifiers);
    editor.dispatch(EditorEvent::PointerMove(event)).unwrap();
}

pub fn pointer_up(editor: &mut Editor, x: f32, y: f32, modifiers: Modifiers) {
    let event = PointerEvent::at(x, y).with_modifiers(modifiers);
    editor.dispatch(EditorEvent::PointerUp(event)).unwrap();
}

/// Press and release in place.
pub fn click(editor: &mut Editor, x: f32, y: f32) {
    pointer_down(editor, x, y, Modifiers::NONE);
    pointer_up(editor, x, y, Modifiers::NONE);
}

/// Press at `from`, move to `to` in `steps` equal steps, release at `to`.
pub fn drag_with(editor: &mut Editor, from: (f32, f32), to: (f32, f32), steps: usize, modifiers: Modifiers) {
    pointer_down(editor, from.0, from.1, modifiers);
    let steps = steps.max(1);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        pointer_move(editor, x, y, modifiers);
    }
    pointer_up(editor, to.0, to.1, modifiers);
}

pub fn drag(editor: &mut Editor, from: (f32, f32), to: (f32, f32)) {
    drag_with(editor, from, to, 4, Modifiers::NONE);
}

/// Hover without any button held.
pub fn hover(editor: &mut Editor, x: f32, y: f32) {
    pointer_move(editor, x, y, Modifiers::NONE);
}

pub fn key_down(editor: &mut Editor, key: Key, modifiers: Modifiers) {
    editor.dispatch(EditorEvent::KeyDown(KeyEvent::new(key, modifiers))).unwrap();
}

pub fn key_up(editor: &mut Editor, key: Key, modifiers: Modifiers) {
    editor.dispatch(EditorEvent::KeyUp(KeyEvent::new(key, modifiers))).unwrap();
}

pub fn press_key(editor: &mut Editor, key: Key, modifiers: Modifiers) {
    key_down(editor, key, modifiers);
    key_up(editor, key, modifiers);
}

pub fn ctrl_shift() -> Modifiers {
    Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    }
}

// ============================================================================
// Lookups and assertions
// ============================================================================

/// Live element by id. Panics when missing or deleted.
pub fn live(editor: &Editor, name: &str) -> Element {
    editor
        .scene()
        .get_live_element(&id(name))
        .cloned()
        .unwrap_or_else(|| panic!("element `{name}` is not live"))
}

/// The single live element of `kind`. Panics unless exactly one exists.
pub fn only_of_kind(editor: &Editor, kind: ElementType) -> Element {
    let matching: Vec<Element> = editor
        .scene_elements()
        .into_iter()
        .filter(|el| el.element_type() == kind)
        .cloned()
        .collect();
    assert_eq!(matching.len(), 1, "expected exactly one {kind:?}");
    matching[0].clone()
}

pub fn selected(editor: &Editor) -> HashSet<ElementId> {
    editor.state().selected_element_ids.clone()
}

pub fn assert_bindings_consistent(editor: &Editor) {
    let violations = binding_violations(editor.scene_elements_including_deleted());
    assert!(violations.is_empty(), "binding violations: {violations:?}");
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
