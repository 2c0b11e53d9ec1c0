//! Pointer down - session setup, selection and element creation.
//!
//! ## Ordering
//!
//! A stale session is aborted and an open text edit is committed first.
//! Panning and pinching are decided before any scene hit test, so a second
//! finger never reaches selection logic.

use crate::app::Editor;
use crate::binding::{get_hovered_element_for_binding, should_enable_binding_for_pointer_event};
use crate::constants::{COMMON_BOUNDS_HIT_THRESHOLD, LINE_CONFIRM_THRESHOLD};
use crate::element::{common_bounds, new_element, new_linear_element, Element};
use crate::geometry::{grid_point, is_path_a_loop, Point};
use crate::groups::{edit_group_for_selected_element, is_element_in_group, select_groups_for_selected_elements};
use crate::input::{
    get_scroll_bars, is_over_scroll_bars, viewport_to_scene, Button, PointerDownState, PointerEvent, PointerMode,
    PointerType,
};
use crate::perf::profile_scope;
use crate::transform::{get_transform_handle_at, get_transform_handle_from_coords, resize_arrow_direction, resize_offset};
use crate::types::{CursorButton, ElementType};

impl Editor {
    pub(crate) fn handle_pointer_down(&mut self, event: &PointerEvent) {
        profile_scope!("handle_pointer_down");
        // Another pointer cannot interrupt a pan; the owner pressing again means its release was lost
        if self.interaction.is_panning() && self.interaction.pointer_id() != Some(event.pointer_id) {
            return;
        }
        self.keys.last_viewport_cursor = event.position;

        if self.interaction.is_active() {
            tracing::debug!("aborting stale gesture");
            self.abort_gesture();
        }
        let was_editing_text = self.editing_text_id().is_some();
        if was_editing_text {
            self.close_text_editor(false);
        }
        if event.pointer_type == PointerType::Touch && event.button == Button::Main && self.register_touch_tap(event) {
            return;
        }

        let pans = event.button == Button::Middle || (event.button == Button::Main && self.keys.holding_space);
        if pans && self.pinch.is_empty() {
            tracing::debug!(pointer = event.pointer_id, "pan started");
            self.interaction.start_panning(event.pointer_id, event.position);
            return;
        }
        if event.button != Button::Main {
            return;
        }

        self.pinch
            .pointer_down(event.pointer_id, event.position, self.state.zoom.value);
        if self.pinch.len() >= 2 {
            self.begin_pinch();
            return;
        }

        let origin = viewport_to_scene(event.position, &self.state);
        let mut session = PointerDownState::new(event.pointer_id, origin, self.state.grid_size, event.modifiers);
        session.original_elements = self
            .scene
            .elements_including_deleted()
            .iter()
            .map(|el| (el.id().clone(), el.clone()))
            .collect();

        let selected = self.selected_ids();
        let common = common_bounds(session.originals_of(&selected));
        if let Some(common) = common {
            session.resize.center = common.center();
            session.hit.has_hit_common_bounding_box = selected.len() >= 2
                && common
                    .inflate(COMMON_BOUNDS_HIT_THRESHOLD / self.state.zoom.value)
                    .contains(origin);
        }

        let local = Point::new(
            event.position.x - self.state.offset_left,
            event.position.y - self.state.offset_top,
        );
        let bars = get_scroll_bars(self.scene.elements(), &self.state);
        session.scrollbars = is_over_scroll_bars(&bars, local.x, local.y);
        if session.scrollbars.is_over_either() && self.state.multi_element.is_none() {
            tracing::debug!(hit = ?session.scrollbars, "scrollbar grabbed");
            self.interaction
                .start_scroll_bar_drag(event.pointer_id, session.scrollbars, event.position);
            return;
        }

        let tool = self.state.element_type;
        if tool != ElementType::Selection {
            self.state.clear_selection();
        }
        self.state.is_binding_enabled =
            self.settings.data.binding_enabled && should_enable_binding_for_pointer_event(&event.modifiers);
        self.state.cursor_button = CursorButton::Down;

        if tool == ElementType::Selection && self.handle_selection_on_pointer_down(&mut session) {
            self.interaction
                .start_pointer(PointerMode::EditingLinearPoints, session);
            return;
        }

        match tool {
            ElementType::Text => {
                if !was_editing_text {
                    self.open_text_editor(session.origin, !event.modifiers.alt);
                }
                self.reset_tool_unless_locked();
                return;
            }
            ElementType::Arrow | ElementType::Line | ElementType::Draw => {
                self.linear_on_pointer_down(&session, tool);
            }
            ElementType::Selection => {
                self.state.selection_element = Some(new_element(
                    ElementType::Selection,
                    origin.x,
                    origin.y,
                    self.state.current_item.clone(),
                ));
            }
            shape => {
                let element = new_element(
                    shape,
                    session.origin_in_grid.x,
                    session.origin_in_grid.y,
                    self.state.current_item.clone(),
                );
                let id = element.id().clone();
                self.insert_element(element);
                self.state.multi_element = None;
                self.state.dragging_element = Some(id.clone());
                self.state.editing_element = Some(id);
            }
        }

        let mode = self.classify_press(&session, tool);
        tracing::debug!(?mode, x = origin.x, y = origin.y, "pointer down");
        self.interaction.start_pointer(mode, session);
    }

    fn classify_press(&self, session: &PointerDownState, tool: ElementType) -> PointerMode {
        if session.resize.handle_type.is_some() {
            return PointerMode::Transforming;
        }
        let grabbed_point = self
            .state
            .editing_linear_element
            .as_ref()
            .is_some_and(|e| e.active_point_index.is_some());
        if grabbed_point {
            return PointerMode::EditingLinearPoints;
        }
        match tool {
            ElementType::Selection if session.hit.element.is_some() || session.hit.has_hit_common_bounding_box => {
                PointerMode::DraggingSelection
            }
            ElementType::Selection => PointerMode::DragSelecting,
            ElementType::Draw => PointerMode::DrawingFreehand,
            ElementType::Arrow | ElementType::Line => PointerMode::DrawingLinear,
            _ => PointerMode::DrawingGeneric,
        }
    }

    /// A second single-finger tap inside the tap window acts as a double click.
    /// Returns true when it did.
    fn register_touch_tap(&mut self, event: &PointerEvent) -> bool {
        if !self.system.tap_twice.is_pending() {
            self.system.tap_twice.schedule(self.system.now);
            return false;
        }
        if !self.pinch.is_empty() {
            return false;
        }
        self.system.tap_twice.cancel();
        tracing::debug!(x = event.position.x, y = event.position.y, "double tap");
        self.handle_double_click(event);
        true
    }

    /// Second finger down: stop the single-pointer gesture and stash the selection.
    fn begin_pinch(&mut self) {
        self.interaction.abort();
        self.state.selection_element = None;
        if !self.state.selected_element_ids.is_empty() {
            self.state.previous_selected_element_ids = std::mem::take(&mut self.state.selected_element_ids);
            self.state.selected_group_ids.clear();
        }
        tracing::debug!(pointers = self.pinch.len(), "pinch started");
    }

    /// Returns true when the press added a point in the point editor.
    fn handle_selection_on_pointer_down(&mut self, session: &mut PointerDownState) -> bool {
        let zoom = self.state.zoom.value;
        let selected = self.selected_ids();

        if self.state.editing_linear_element.is_none() && !selected.is_empty() {
            let handle = {
                let originals = session.originals_of(&selected);
                match originals.as_slice() {
                    [single] => get_transform_handle_at(single, session.origin, zoom),
                    many => common_bounds(many.iter().copied())
                        .and_then(|bounds| get_transform_handle_from_coords(bounds, session.origin, zoom)),
                }
            };
            if let Some(handle) = handle {
                let (offset, direction) = {
                    let originals = session.originals_of(&selected);
                    let offset = resize_offset(handle, &originals, session.origin);
                    let direction = match originals.as_slice() {
                        [single] if single.linear().is_some_and(|l| l.points.len() == 2) => {
                            Some(resize_arrow_direction(handle, single))
                        }
                        _ => None,
                    };
                    (offset, direction)
                };
                session.resize.handle_type = Some(handle);
                session.resize.is_resizing = true;
                session.resize.offset = offset;
                if let Some(direction) = direction {
                    session.resize.arrow_direction = direction;
                }
                if let [single] = selected.as_slice() {
                    self.state.resizing_element = Some(single.clone());
                }
                tracing::debug!(?handle, "transform handle grabbed");
                return false;
            }
        }

        if self.state.editing_linear_element.is_some() {
            let press = self.linear_editor_pointer_down(session);
            if press.did_add_point {
                session.hit.element = press.hit_element;
                return true;
            }
            session.hit.element = press.hit_element;
        }

        let all_hit = self.hit_elements_at(session.origin);
        if session.hit.element.is_none() {
            session.hit.element = self.pick_hit_element(&all_hit, session.origin);
        }
        session.hit.all_hit_elements = all_hit;

        let some_hit_selected = session
            .hit
            .all_hit_elements
            .iter()
            .any(|id| self.state.is_selected(id));
        let hit: Option<Element> = session
            .hit
            .element
            .as_ref()
            .and_then(|id| self.scene.get_live_element(id))
            .cloned();

        if (hit.is_none() || !some_hit_selected)
            && !session.modifiers.shift
            && !session.hit.has_hit_common_bounding_box
        {
            self.clear_selection_keeping_group(hit.as_ref());
        }

        if let Some(editor) = &self.state.editing_linear_element {
            let id = editor.element_id.clone();
            self.state.select_only(id);
        } else if let Some(hit) = hit {
            if session.modifiers.ctrl_or_cmd() {
                // Drill into the innermost group on the next level
                if !self.state.is_selected(hit.id()) {
                    session.hit.was_added_to_selection = true;
                }
                edit_group_for_selected_element(&mut self.state, &hit);
            } else if !self.state.is_selected(hit.id()) {
                let outside_group = self
                    .state
                    .editing_group_id
                    .as_ref()
                    .is_some_and(|group| !is_element_in_group(&hit, group));
                if outside_group {
                    self.state.clear_selection();
                    self.state.editing_group_id = None;
                }
                if !some_hit_selected && !session.hit.has_hit_common_bounding_box {
                    self.state.selected_element_ids.insert(hit.id().clone());
                    select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
                    session.hit.was_added_to_selection = true;
                }
            }
        }
        self.state.previous_selected_element_ids = self.state.selected_element_ids.clone();
        false
    }

    /// Clear the selection, staying in the editing group when the press is inside it.
    fn clear_selection_keeping_group(&mut self, hit: Option<&Element>) {
        let keep_group = match (&self.state.editing_group_id, hit) {
            (Some(group), Some(hit)) => is_element_in_group(hit, group),
            _ => false,
        };
        self.state.clear_selection();
        if !keep_group {
            self.state.editing_group_id = None;
        }
    }

    fn linear_on_pointer_down(&mut self, session: &PointerDownState, tool: ElementType) {
        if let Some(multi_id) = self.state.multi_element.clone() {
            let Some((kind, position, points, committed)) = self.scene.get_live_element(&multi_id).and_then(|el| {
                let linear = el.linear()?;
                Some((
                    el.element_type(),
                    Point::new(el.x, el.y),
                    linear.points.clone(),
                    linear.last_committed_point,
                ))
            }) else {
                self.state.multi_element = None;
                return;
            };

            if kind == ElementType::Line && is_path_a_loop(&points, self.state.zoom.value) {
                self.scene.mutate_element(&multi_id, |d| {
                    if let Some(linear) = d.linear_mut() {
                        linear.last_committed_point = linear.points.last().copied();
                    }
                });
                self.finalize();
                return;
            }

            let local = session.origin - position;
            let confirms = points.len() > 1
                && committed.is_some_and(|c| local.distance(c) < LINE_CONFIRM_THRESHOLD);
            if confirms {
                self.finalize();
                return;
            }

            self.state.selected_element_ids.insert(multi_id.clone());
            self.scene.mutate_element(&multi_id, |d| {
                if let Some(linear) = d.linear_mut() {
                    linear.last_committed_point = linear.points.last().copied();
                }
            });
            return;
        }

        // Freehand strokes ignore the grid
        let grid = if tool == ElementType::Draw {
            None
        } else {
            self.state.grid_size
        };
        let at = grid_point(session.origin.x, session.origin.y, grid);
        let (start_arrowhead, end_arrowhead) = if tool == ElementType::Arrow {
            (self.state.current_item_start_arrowhead, self.state.current_item_end_arrowhead)
        } else {
            (None, None)
        };
        let mut element = new_linear_element(
            tool,
            at.x,
            at.y,
            self.state.current_item.clone(),
            start_arrowhead,
            end_arrowhead,
        );
        element.mutate(|d| {
            if let Some(linear) = d.linear_mut() {
                linear.points = vec![Point::ZERO];
            }
        });
        let id = element.id().clone();
        let start_bound = if tool.is_binding() && self.state.is_binding_enabled {
            get_hovered_element_for_binding(session.origin, self.scene.elements_including_deleted())
                .map(|el| el.id().clone())
        } else {
            None
        };
        self.insert_element(element);
        self.state.start_bound_element = start_bound;
        self.state.suggested_bindings.clear();
        self.state.dragging_element = Some(id.clone());
        self.state.editing_element = Some(id);
    }
}
