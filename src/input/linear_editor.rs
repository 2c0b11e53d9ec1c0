//! Point editor for lines and arrows.
//!
//! Entered with Enter or a double click on a single selected connector.
//! A press on a point grabs it; alt+hover previews a new trailing point and
//! alt+click commits it. Dragging an endpoint re-binds that end on release.

use crate::app::Editor;
use crate::app_state::LinearElementEditor;
use crate::binding::{
    bind_linear_element, get_hovered_element_for_binding, maybe_suggest_binding_at_cursor,
    maybe_suggest_binding_for_linear_element_at_cursor, unbind_linear_element,
};
use crate::constants::POINT_HIT_RADIUS;
use crate::element::{
    linear_point_global, move_linear_point, normalize_linear_points, point_from_absolute, Element,
    ElementData, ElementId,
};
use crate::geometry::{grid_point, is_path_a_loop, Point};
use crate::input::{Modifiers, PointerDownState};
use crate::types::LinearEnd;

/// Index of the point under `p`, topmost (last) first.
pub fn point_index_under_cursor(element: &Element, zoom: f32, p: Point) -> Option<usize> {
    let count = element.linear()?.points.len();
    (0..count).rev().find(|&i| {
        linear_point_global(element, i)
            .is_some_and(|global| global.distance(p) * zoom < POINT_HIT_RADIUS + 1.0)
    })
}

/// Scene point snapped to the grid, in the element's point space.
pub fn create_point_at(element: &Element, scene_point: Point, grid_size: Option<f32>) -> Point {
    let snapped = grid_point(scene_point.x, scene_point.y, grid_size);
    point_from_absolute(element, snapped)
}

pub(crate) fn append_linear_point(data: &mut ElementData, point: Point) {
    if let Some(linear) = data.linear_mut() {
        linear.points.push(point);
    }
    normalize_linear_points(data);
}

pub(crate) fn remove_linear_point(data: &mut ElementData, index: usize) {
    if let Some(linear) = data.linear_mut() {
        if index < linear.points.len() {
            linear.points.remove(index);
        }
    }
    normalize_linear_points(data);
}

fn end_for_index(index: usize, len: usize) -> Option<LinearEnd> {
    if index == 0 {
        Some(LinearEnd::Start)
    } else if index + 1 == len {
        Some(LinearEnd::End)
    } else {
        None
    }
}

/// What a press inside the point editor did.
#[derive(Debug, Default)]
pub(crate) struct LinearEditorPress {
    pub did_add_point: bool,
    /// Set when a point was grabbed, so the press keeps the element selected
    pub hit_element: Option<ElementId>,
}

impl Editor {
    pub(crate) fn enter_linear_editor(&mut self, id: ElementId) {
        if self
            .state
            .editing_linear_element
            .as_ref()
            .is_some_and(|e| e.element_id == id)
        {
            return;
        }
        tracing::debug!(element = %id, "point editor entered");
        self.history.resume_recording();
        self.state.editing_linear_element = Some(LinearElementEditor::new(id));
    }

    fn editing_linear(&self) -> Option<(LinearElementEditor, Element)> {
        let editor = self.state.editing_linear_element.clone()?;
        let element = self.scene.get_live_element(&editor.element_id)?.clone();
        Some((editor, element))
    }

    pub(crate) fn linear_editor_pointer_down(&mut self, session: &PointerDownState) -> LinearEditorPress {
        let Some((editor, element)) = self.editing_linear() else {
            self.state.editing_linear_element = None;
            return LinearEditorPress::default();
        };
        let id = editor.element_id.clone();

        if session.modifiers.alt {
            if editor.last_uncommitted_point.is_none() {
                let point = create_point_at(&element, session.origin, self.state.grid_size);
                self.scene.mutate_element(&id, |d| append_linear_point(d, point));
            }
            self.history.resume_recording();
            let len = self
                .scene
                .get_live_element(&id)
                .and_then(|el| el.linear())
                .map_or(0, |l| l.points.len());
            let end_binding = get_hovered_element_for_binding(session.origin, self.scene.elements_including_deleted())
                .map(|el| el.id().clone());
            if let Some(ed) = self.state.editing_linear_element.as_mut() {
                ed.active_point_index = len.checked_sub(1);
                ed.last_uncommitted_point = None;
                ed.end_binding_element = end_binding;
            }
            return LinearEditorPress {
                did_add_point: true,
                hit_element: Some(id),
            };
        }

        let clicked = point_index_under_cursor(&element, self.state.zoom.value, session.origin);
        let offset = clicked
            .and_then(|i| linear_point_global(&element, i))
            .map_or(Point::ZERO, |p| session.origin - p);
        if let Some(ed) = self.state.editing_linear_element.as_mut() {
            ed.active_point_index = clicked;
            ed.pointer_offset = offset;
        }
        LinearEditorPress {
            did_add_point: false,
            hit_element: clicked.map(|_| id),
        }
    }

    /// Move the grabbed point. Returns false when no point is grabbed.
    pub(crate) fn linear_editor_drag(&mut self, pointer: Point) -> bool {
        let Some((editor, element)) = self.editing_linear() else {
            return false;
        };
        let Some(index) = editor.active_point_index else {
            return false;
        };
        let id = editor.element_id;
        let target = create_point_at(&element, pointer - editor.pointer_offset, self.state.grid_size);
        self.scene.mutate_element(&id, |d| move_linear_point(d, index, target));
        if let Some(ed) = self.state.editing_linear_element.as_mut() {
            ed.is_dragging = true;
        }

        let len = element.linear().map_or(0, |l| l.points.len());
        if let (true, Some(end)) = (element.is_binding_element(), end_for_index(index, len)) {
            let elements = self.scene.elements_including_deleted();
            self.state.suggested_bindings = self
                .scene
                .get_live_element(&id)
                .and_then(|el| maybe_suggest_binding_for_linear_element_at_cursor(el, end, pointer, elements))
                .into_iter()
                .collect();
        }
        true
    }

    /// Release a grabbed point: close a loop and re-bind a dragged endpoint.
    pub(crate) fn linear_editor_pointer_up(&mut self) {
        let Some((editor, element)) = self.editing_linear() else {
            return;
        };
        let id = editor.element_id.clone();
        let points = element.linear().map(|l| l.points.clone()).unwrap_or_default();
        let len = points.len();

        if let (true, Some(index)) = (editor.is_dragging, editor.active_point_index) {
            if let Some(end) = end_for_index(index, len) {
                if is_path_a_loop(&points, self.state.zoom.value) {
                    let target = if index == 0 { points[len - 1] } else { points[0] };
                    self.scene.mutate_element(&id, |d| move_linear_point(d, index, target));
                }
                if element.is_binding_element() {
                    let hovered = if self.state.is_binding_enabled {
                        let elements = self.scene.elements_including_deleted();
                        self.scene.get_live_element(&id).and_then(|el| {
                            let p = linear_point_global(el, index)?;
                            maybe_suggest_binding_for_linear_element_at_cursor(el, end, p, elements)
                        })
                    } else {
                        None
                    };
                    match &hovered {
                        Some(target) => bind_linear_element(&mut self.scene, &id, target, end),
                        None => {
                            unbind_linear_element(&mut self.scene, &id, end);
                        }
                    }
                    if end == LinearEnd::End {
                        if let Some(ed) = self.state.editing_linear_element.as_mut() {
                            ed.end_binding_element = hovered;
                        }
                    }
                }
                self.history.resume_recording();
            }
        }
        if let Some(ed) = self.state.editing_linear_element.as_mut() {
            ed.is_dragging = false;
            ed.pointer_offset = Point::ZERO;
        }
        self.state.suggested_bindings.clear();
    }

    /// Alt-hover previews a trailing point; releasing alt drops the preview.
    pub(crate) fn linear_editor_hover(&mut self, pointer: Point, modifiers: Modifiers) {
        let Some((editor, element)) = self.editing_linear() else {
            return;
        };
        let id = editor.element_id.clone();
        let points = element.linear().map(|l| l.points.clone()).unwrap_or_default();

        if !modifiers.alt {
            if editor.last_uncommitted_point.is_some() && points.len() > 2 {
                let last = points.len() - 1;
                self.scene.mutate_element(&id, |d| remove_linear_point(d, last));
            }
            if let Some(ed) = self.state.editing_linear_element.as_mut() {
                ed.last_uncommitted_point = None;
            }
            self.state.suggested_bindings.clear();
            return;
        }

        let point = create_point_at(&element, pointer, self.state.grid_size);
        let has_preview = editor.last_uncommitted_point.is_some()
            && editor.last_uncommitted_point == points.last().copied();
        self.scene.mutate_element(&id, |d| {
            if has_preview {
                let last = d.linear().map_or(0, |l| l.points.len().saturating_sub(1));
                move_linear_point(d, last, point);
            } else {
                append_linear_point(d, point);
            }
        });
        let preview = self
            .scene
            .get_live_element(&id)
            .and_then(|el| el.linear())
            .and_then(|l| l.points.last().copied());
        if let Some(ed) = self.state.editing_linear_element.as_mut() {
            ed.last_uncommitted_point = preview;
        }
        self.state.suggested_bindings =
            maybe_suggest_binding_at_cursor(pointer, self.scene.elements_including_deleted());
    }

    /// Delete the grabbed point. Endpoints release their binding first.
    /// Returns false when the element has too few points left.
    pub(crate) fn linear_editor_delete_point(&mut self) -> bool {
        let Some((editor, element)) = self.editing_linear() else {
            return false;
        };
        let Some(index) = editor.active_point_index else {
            return false;
        };
        let len = element.linear().map_or(0, |l| l.points.len());
        if len <= 2 {
            return false;
        }
        let id = editor.element_id;
        if let Some(end) = end_for_index(index, len) {
            unbind_linear_element(&mut self.scene, &id, end);
        }
        self.scene.mutate_element(&id, |d| remove_linear_point(d, index));
        if let Some(ed) = self.state.editing_linear_element.as_mut() {
            ed.active_point_index = Some(index.saturating_sub(1));
        }
        self.history.resume_recording();
        true
    }
}
