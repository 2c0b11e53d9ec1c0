//! Pointer up - gesture finalization, plus cancel, blur and double click.
//!
//! A release commits whatever the session built: a new element is kept or
//! discarded, a click refines the selection, and a drag or transform
//! re-binds connectors. History is armed here, never during moves, so one
//! gesture is one undo step.

use crate::app::Editor;
use crate::binding::{bind_or_unbind_selected_elements, maybe_bind_linear_element, unbind_linear_elements};
use crate::element::{
    is_hitting_bounding_box_without_hitting_element, is_invisibly_small, normalize_dimensions, normalized_dimensions,
    Element, ElementId,
};
use crate::geometry::Point;
use crate::groups::{
    get_elements_in_group, get_selected_group_for_element, get_selected_group_id_for_element,
    select_groups_for_selected_elements,
};
use crate::input::{viewport_to_scene, Modifiers, PointerDownState, PointerEvent, PointerMode};
use crate::perf::profile_scope;
use crate::types::{CursorButton, ElementType};
use std::collections::HashSet;

impl Editor {
    pub(crate) fn handle_pointer_up(&mut self, event: &PointerEvent) {
        profile_scope!("handle_pointer_up");
        let was_pinching = self.pinch.is_pinching();
        self.pinch.pointer_up(event.pointer_id);
        if was_pinching {
            if !self.pinch.is_pinching() {
                tracing::debug!("pinch ended");
                self.restore_stashed_selection();
            }
            return;
        }

        match self.interaction.pointer_id() {
            Some(owner) if owner == event.pointer_id => {}
            Some(_) => return,
            None => {
                self.state.cursor_button = CursorButton::Up;
                return;
            }
        }
        let pointer = viewport_to_scene(event.position, &self.state);
        self.finish_pointer_gesture(pointer, event.modifiers);
        self.drain_remote_updates();
    }

    /// Cancellation finishes the gesture exactly like a release.
    pub(crate) fn handle_pointer_cancel(&mut self, event: &PointerEvent) {
        self.handle_pointer_up(event);
    }

    /// Focus loss: end every gesture and forget held keys.
    pub(crate) fn handle_blur(&mut self) {
        self.abort_gesture();
        self.pinch.clear();
        self.keys.holding_space = false;
        self.state.is_binding_enabled = self.settings.data.binding_enabled;
    }

    /// End the open gesture as if released at its last known position.
    pub(crate) fn abort_gesture(&mut self) {
        let last = self.interaction.session().map(|s| (s.last_coords, s.modifiers));
        match last {
            Some((coords, modifiers)) => self.finish_pointer_gesture(coords, modifiers),
            None => self.interaction.abort(),
        }
    }

    pub(crate) fn finish_pointer_gesture(&mut self, pointer: Point, modifiers: Modifiers) {
        let Some((mode, session)) = self.interaction.finish() else {
            self.state.cursor_button = CursorButton::Up;
            return;
        };
        tracing::debug!(?mode, x = pointer.x, y = pointer.y, "pointer up");

        let was_resizing = self.state.is_resizing;
        let was_rotating = self.state.is_rotating;
        let resizing = self.state.resizing_element.take();
        let dragging = self.state.dragging_element.clone();
        let multi = self.state.multi_element.clone();
        let tool = self.state.element_type;
        let locked = self.state.element_locked;

        self.state.is_resizing = false;
        self.state.is_rotating = false;
        self.state.selection_element = None;
        self.state.cursor_button = CursorButton::Up;
        if multi.is_none() && self.editing_text_id().is_none() {
            self.state.editing_element = None;
        }

        if let Some(editor) = &self.state.editing_linear_element {
            let on_editor = session.hit.element.as_ref() == Some(&editor.element_id);
            let box_selected = mode == PointerMode::DragSelecting && session.last_coords != session.origin;
            if !on_editor && !box_selected {
                self.finalize();
            } else {
                self.linear_editor_pointer_up();
            }
        }

        let dragging_info = dragging.as_ref().and_then(|id| {
            self.scene
                .get_live_element(id)
                .map(|el| (el.id().clone(), el.element_type(), el.linear().map(|l| l.points.len())))
        });

        if let Some((id, kind, points)) = dragging_info {
            if kind == ElementType::Draw {
                self.finalize();
                return;
            }
            if let Some(len) = points {
                self.finish_linear_drag(&id, kind, len, &session, pointer, multi.is_some());
                return;
            }
            if tool != ElementType::Selection
                && self.scene.get_live_element(&id).is_some_and(|el| is_invisibly_small(el))
            {
                self.delete_elements(&HashSet::from([id]));
                self.state.dragging_element = None;
                self.state.editing_element = None;
                return;
            }
            let needs_normalizing = self
                .scene
                .get_live_element(&id)
                .is_some_and(|el| normalized_dimensions(el) != (el.x, el.y, el.width, el.height));
            if needs_normalizing {
                self.scene.mutate_element(&id, normalize_dimensions);
            }
        }

        if let Some(id) = &resizing {
            self.history.resume_recording();
            if self.scene.get_live_element(id).is_some_and(|el| is_invisibly_small(el)) {
                self.delete_elements(&HashSet::from([id.clone()]));
            }
        }

        let hit: Option<Element> = session
            .hit
            .element
            .as_ref()
            .and_then(|id| self.scene.get_live_element(id))
            .cloned();
        if let Some(hit) = &hit {
            if !session.drag.has_occurred && !session.hit.was_added_to_selection {
                self.click_selection(hit, modifiers);
            }
        }

        let zoom = self.state.zoom.value;
        let box_only = hit
            .as_ref()
            .is_some_and(|el| is_hitting_bounding_box_without_hitting_element(el, session.origin, zoom));
        if self.state.editing_linear_element.is_none()
            && !session.drag.has_occurred
            && !was_resizing
            && (box_only || (hit.is_none() && session.hit.has_hit_common_bounding_box))
        {
            self.state.clear_selection();
            self.state.editing_group_id = None;
            self.state.dragging_element = None;
            return;
        }

        if !locked {
            if let Some(id) = &dragging {
                if self.scene.get_live_element(id).is_some() {
                    self.state.selected_element_ids.insert(id.clone());
                }
            }
        }
        if tool != ElementType::Selection || !self.state.selected_element_ids.is_empty() {
            self.history.resume_recording();
        }
        if session.drag.has_occurred || was_resizing || was_rotating {
            let selected = self.selected_ids();
            if self.state.is_binding_enabled {
                bind_or_unbind_selected_elements(&mut self.scene, &selected);
            } else {
                unbind_linear_elements(&mut self.scene, &selected);
            }
        }
        self.state.suggested_bindings.clear();
        self.state.dragging_element = None;
        self.reset_tool_unless_locked();
    }

    /// Release while drawing a line or arrow. A click starts multi-point
    /// mode; a drag binds, selects and ends the element.
    fn finish_linear_drag(
        &mut self,
        id: &ElementId,
        kind: ElementType,
        len: usize,
        session: &PointerDownState,
        pointer: Point,
        in_multi: bool,
    ) {
        if len >= 2 {
            self.history.resume_recording();
        }
        if in_multi {
            return;
        }
        if !session.drag.has_occurred {
            let Some(origin) = self.scene.get_live_element(id).map(|el| Point::new(el.x, el.y)) else {
                return;
            };
            let local = pointer - origin;
            self.scene.mutate_element(id, |d| super::linear_editor::append_linear_point(d, local));
            self.state.multi_element = Some(id.clone());
            self.state.editing_element = Some(id.clone());
            return;
        }

        if self.state.is_binding_enabled && kind.is_binding() {
            maybe_bind_linear_element(&mut self.scene, id, self.state.start_bound_element.as_ref(), pointer);
        }
        self.state.suggested_bindings.clear();
        self.state.start_bound_element = None;
        self.state.dragging_element = None;
        self.state.editing_element = None;
        if !self.state.element_locked {
            self.state.element_type = ElementType::Selection;
            self.state.selected_element_ids.insert(id.clone());
        }
    }

    /// Click without drag: shift toggles membership, a plain click selects only the hit.
    fn click_selection(&mut self, hit: &Element, modifiers: Modifiers) {
        if !modifiers.shift {
            self.state.select_only(hit.id().clone());
            select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
            return;
        }
        if !self.state.is_selected(hit.id()) {
            self.state.selected_element_ids.insert(hit.id().clone());
            return;
        }
        if let Some(group) = get_selected_group_for_element(&self.state, hit).cloned() {
            let members: Vec<ElementId> = get_elements_in_group(self.scene.elements_including_deleted(), &group)
                .map(|el| el.id().clone())
                .collect();
            self.state.selected_group_ids.remove(&group);
            for id in members {
                self.state.selected_element_ids.remove(&id);
            }
        } else {
            self.state.selected_element_ids.remove(hit.id());
        }
    }

    pub(crate) fn handle_double_click(&mut self, event: &PointerEvent) {
        profile_scope!("handle_double_click");
        if self.state.multi_element.is_some() || self.state.element_type != ElementType::Selection {
            return;
        }
        let pointer = viewport_to_scene(event.position, &self.state);

        let selected = self.selected_ids();
        if let [only] = selected.as_slice() {
            let is_connector = self
                .scene
                .get_live_element(only)
                .is_some_and(|el| el.is_binding_element());
            if is_connector {
                self.enter_linear_editor(only.clone());
                return;
            }
        }

        if !self.state.selected_group_ids.is_empty() {
            if let Some(hit_id) = self.element_at(pointer) {
                let group = self.scene.get_live_element(&hit_id).and_then(|hit| {
                    get_selected_group_id_for_element(hit, &self.state.selected_group_ids).cloned()
                });
                if let Some(group) = group {
                    self.state.editing_group_id = Some(group);
                    self.state.select_only(hit_id);
                    select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
                    return;
                }
            }
        }

        if !event.modifiers.ctrl_or_cmd() {
            self.open_text_editor(pointer, !event.modifiers.alt);
        }
    }
}
