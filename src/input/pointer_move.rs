//! Pointer move - pinch, pan, session drags and hover.
//!
//! ## Performance Notes
//!
//! Moves are the hottest path. Selection drags read positions from the
//! session snapshot, so cost does not grow with the number of moves, and
//! marquee selection queries the R-tree rather than scanning the scene.

use crate::app::Editor;
use crate::binding::{maybe_suggest_binding_at_cursor, maybe_suggest_binding_for_all, update_bound_elements, fix_bindings_after_duplication, DuplicationMode};
use crate::constants::{DRAGGING_THRESHOLD, FREEDRAW_SIMPLIFY_TOLERANCE, LINE_CONFIRM_THRESHOLD};
use crate::element::{duplicate_element, normalize_linear_points, ElementId};
use crate::geometry::{grid_point, simplify_points, Bounds, Point};
use crate::groups::select_groups_for_selected_elements;
use crate::input::{
    get_new_zoom, normalize_scroll, normalize_zoom, viewport_to_scene, InteractionState, Modifiers, PinchStep,
    PointerDownState, PointerEvent, PointerMode,
};
use crate::perf::profile_scope;
use crate::transform::{drag_new_element, drag_offset, drag_selected_elements, perfect_element_size, transform_elements, AxisLock, TransformHandleType};
use crate::types::ElementType;
use std::collections::{HashMap, HashSet};

impl Editor {
    pub(crate) fn handle_pointer_move(&mut self, event: &PointerEvent) {
        profile_scope!("handle_pointer_move");
        self.keys.last_viewport_cursor = event.position;

        if let Some(step) = self.pinch.pointer_move(event.pointer_id, event.position) {
            self.apply_pinch_step(step);
            return;
        }
        if self.pinch.is_pinching() {
            return;
        }

        let zoom = self.state.zoom.value;
        match &mut self.interaction {
            InteractionState::Panning {
                pointer_id,
                last_position,
            } if *pointer_id == event.pointer_id => {
                let delta = event.position - *last_position;
                *last_position = event.position;
                self.state.scroll_x = normalize_scroll(self.state.scroll_x + delta.x / zoom);
                self.state.scroll_y = normalize_scroll(self.state.scroll_y + delta.y / zoom);
                return;
            }
            InteractionState::DraggingScrollBar {
                pointer_id,
                hit,
                last_position,
            } if *pointer_id == event.pointer_id => {
                let delta = event.position - *last_position;
                *last_position = event.position;
                if hit.horizontal {
                    self.state.scroll_x = normalize_scroll(self.state.scroll_x - delta.x / zoom);
                }
                if hit.vertical {
                    self.state.scroll_y = normalize_scroll(self.state.scroll_y - delta.y / zoom);
                }
                return;
            }
            InteractionState::Pointer { session, .. } if session.pointer_id == event.pointer_id => {}
            InteractionState::Idle => {
                self.handle_hover(event);
                return;
            }
            _ => return,
        }

        let Some((mode, mut session)) = self.interaction.finish() else {
            return;
        };
        self.drag_session(mode, &mut session, event);
        self.interaction.start_pointer(mode, session);
    }

    fn apply_pinch_step(&mut self, step: PinchStep) {
        let zoom = self.state.zoom;
        self.state.scroll_x = normalize_scroll(self.state.scroll_x + step.pan.x / zoom.value);
        self.state.scroll_y = normalize_scroll(self.state.scroll_y + step.pan.y / zoom.value);
        let offset = Point::new(self.state.offset_left, self.state.offset_top);
        self.state.zoom = get_new_zoom(normalize_zoom(step.scale), self.state.zoom, offset, step.center);
        self.state.should_cache_ignore_zoom = true;
        self.system.cache_ignore_zoom.schedule(self.system.now);
    }

    fn drag_session(&mut self, mode: PointerMode, session: &mut PointerDownState, event: &PointerEvent) {
        let pointer = viewport_to_scene(event.position, &self.state);
        let modifiers = event.modifiers;

        if session.drag.offset.is_none() {
            let selected = self.selected_ids();
            session.drag.offset = Some(drag_offset(&session.originals_of(&selected), session.origin));
        }

        let is_connector_tool = matches!(self.state.element_type, ElementType::Arrow | ElementType::Line);
        if is_connector_tool && !session.drag.has_occurred && pointer.distance(session.origin) < DRAGGING_THRESHOLD {
            return;
        }
        session.last_coords = pointer;

        match mode {
            PointerMode::Transforming => self.drag_transform(session, modifiers),
            PointerMode::EditingLinearPoints => {
                self.linear_editor_drag(pointer);
            }
            PointerMode::DraggingSelection => self.drag_selection(session, modifiers),
            PointerMode::DrawingFreehand => self.drag_freehand(session),
            PointerMode::DrawingLinear => self.drag_linear(session, modifiers),
            PointerMode::DrawingGeneric => self.drag_new_generic(session, modifiers),
            PointerMode::DragSelecting => self.drag_marquee(session, modifiers),
        }
    }

    pub(crate) fn drag_transform(&mut self, session: &PointerDownState, modifiers: Modifiers) {
        let handle = session.resize.handle_type;
        self.state.is_rotating = handle == Some(TransformHandleType::Rotation);
        self.state.is_resizing = handle.is_some() && !self.state.is_rotating;
        let target = grid_point(
            session.last_coords.x - session.resize.offset.x,
            session.last_coords.y - session.resize.offset.y,
            self.state.grid_size,
        );
        let selected = self.selected_ids();
        if transform_elements(&mut self.scene, session, &selected, &modifiers, target) {
            self.suggest_bindings_for_selection(&selected);
        }
    }

    fn drag_selection(&mut self, session: &mut PointerDownState, modifiers: Modifiers) {
        let hit_selected = session
            .hit
            .all_hit_elements
            .iter()
            .any(|id| self.state.is_selected(id));
        if !hit_selected && !session.hit.has_hit_common_bounding_box {
            return;
        }
        let selected = self.selected_ids();
        if selected.is_empty() {
            return;
        }
        session.drag.has_occurred = true;

        let offset = session.drag.offset.unwrap_or(Point::ZERO);
        let pointer = session.last_coords;
        let target = grid_point(pointer.x - offset.x, pointer.y - offset.y, self.state.grid_size);
        session.drag.axis_lock = AxisLock::resolve(session.drag.axis_lock, modifiers.shift, pointer - session.origin);

        let moves = drag_selected_elements(&session.originals_of(&selected), target, session.drag.axis_lock);
        for (id, position) in moves {
            self.scene.mutate_element(&id, |d| {
                d.x = position.x;
                d.y = position.y;
            });
        }
        let moved: HashSet<ElementId> = selected.iter().cloned().collect();
        for id in &selected {
            update_bound_elements(&mut self.scene, id, &moved);
        }
        self.suggest_bindings_for_selection(&selected);

        if modifiers.alt && !session.hit.has_been_duplicated {
            session.hit.has_been_duplicated = true;
            self.duplicate_for_alt_drag(session, target);
        }
    }

    /// Leave copies at the press position; the originals keep moving on top.
    fn duplicate_for_alt_drag(&mut self, session: &PointerDownState, target: Point) {
        let offset = session.drag.offset.unwrap_or(Point::ZERO);
        let origin_target = grid_point(
            session.origin.x - offset.x,
            session.origin.y - offset.y,
            self.state.grid_size,
        );
        let shift = origin_target - target;
        let editing_group = self.state.editing_group_id.clone();

        let mut group_map = HashMap::new();
        let mut old_to_new = HashMap::new();
        let mut old_ids = Vec::new();
        let mut next = Vec::with_capacity(self.scene.len() * 2);
        let mut moving = Vec::new();
        for el in self.scene.elements_including_deleted() {
            if !el.is_deleted && self.state.is_selected(el.id()) {
                let copy = duplicate_element(editing_group.as_ref(), &mut group_map, el, shift);
                old_to_new.insert(el.id().clone(), copy.id().clone());
                old_ids.push(el.id().clone());
                next.push(copy);
                moving.push(el.clone());
            } else {
                next.push(el.clone());
            }
        }
        next.extend(moving);
        fix_bindings_after_duplication(&mut next, &old_ids, &old_to_new, DuplicationMode::DuplicatesServeAsOld);
        self.scene.replace_all_elements(next);
        tracing::debug!(count = old_ids.len(), "alt-drag duplicated selection");
    }

    fn drag_freehand(&mut self, session: &mut PointerDownState) {
        let Some(id) = self.state.dragging_element.clone() else {
            return;
        };
        let Some(origin) = self.scene.get_live_element(&id).map(|el| Point::new(el.x, el.y)) else {
            return;
        };
        session.drag.has_occurred = true;
        let local = session.last_coords - origin;
        let tolerance = FREEDRAW_SIMPLIFY_TOLERANCE / self.state.zoom.value;
        self.scene.mutate_element(&id, |d| {
            if let Some(linear) = d.linear_mut() {
                linear.points.push(local);
                linear.points = simplify_points(&linear.points, tolerance);
            }
            normalize_linear_points(d);
        });
    }

    fn drag_linear(&mut self, session: &mut PointerDownState, modifiers: Modifiers) {
        let Some(id) = self.state.dragging_element.clone() else {
            return;
        };
        let Some((kind, origin, len)) = self.scene.get_live_element(&id).and_then(|el| {
            Some((el.element_type(), Point::new(el.x, el.y), el.linear()?.points.len()))
        }) else {
            return;
        };
        session.drag.has_occurred = true;

        let pointer = session.last_coords;
        let snapped = grid_point(pointer.x, pointer.y, self.state.grid_size);
        let (mut dx, mut dy) = (snapped.x - origin.x, snapped.y - origin.y);
        if modifiers.shift && len == 2 {
            (dx, dy) = perfect_element_size(kind, dx, dy);
        }
        let point = Point::new(dx, dy);
        self.scene.mutate_element(&id, |d| {
            if let Some(linear) = d.linear_mut() {
                if linear.points.len() == 1 {
                    linear.points.push(point);
                } else if let Some(last) = linear.points.last_mut() {
                    *last = point;
                }
            }
            normalize_linear_points(d);
        });
        self.suggest_binding_for_drawn_end(&id, pointer);
    }

    pub(crate) fn drag_new_generic(&mut self, session: &PointerDownState, modifiers: Modifiers) {
        let Some(id) = self.state.dragging_element.clone() else {
            return;
        };
        let Some(kind) = self.scene.get_live_element(&id).map(|el| el.element_type()) else {
            return;
        };
        let pointer = grid_point(session.last_coords.x, session.last_coords.y, self.state.grid_size);
        let origin = session.origin_in_grid;
        let (x, y, width, height) =
            drag_new_element(kind, origin, pointer, modifiers.shift, modifiers.alt).unwrap_or((origin.x, origin.y, 0.0, 0.0));
        self.scene.mutate_element(&id, |d| {
            d.x = x;
            d.y = y;
            d.width = width;
            d.height = height;
        });
        if self.state.is_binding_enabled {
            let elements = self.scene.elements_including_deleted();
            self.state.suggested_bindings = self
                .scene
                .get_live_element(&id)
                .map(|el| maybe_suggest_binding_for_all(&[el], elements))
                .unwrap_or_default();
        }
    }

    fn drag_marquee(&mut self, session: &PointerDownState, modifiers: Modifiers) {
        let (x, y, width, height) =
            drag_new_element(ElementType::Selection, session.origin, session.last_coords, false, false)
                .unwrap_or((session.origin.x, session.origin.y, 0.0, 0.0));
        let Some(marquee) = self.state.selection_element.as_mut() else {
            return;
        };
        marquee.mutate(|d| {
            d.x = x;
            d.y = y;
            d.width = width;
            d.height = height;
        });
        // The point editor keeps its element selected under a marquee
        if self.state.editing_linear_element.is_some() {
            return;
        }

        if !modifiers.shift {
            self.state.clear_selection();
            self.state.editing_group_id = None;
        }
        let area = Bounds::new(x, y, x + width, y + height);
        let within = self.hit_tester.elements_in(
            self.scene.elements_including_deleted(),
            self.scene.revision(),
            area,
        );
        self.state.selected_element_ids.extend(within);
        select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
    }

    fn handle_hover(&mut self, event: &PointerEvent) {
        let pointer = viewport_to_scene(event.position, &self.state);

        if self.state.editing_linear_element.is_some() {
            self.linear_editor_hover(pointer, event.modifiers);
            return;
        }
        if let Some(multi_id) = self.state.multi_element.clone() {
            let snapped = grid_point(pointer.x, pointer.y, self.state.grid_size);
            self.update_multi_point_preview(&multi_id, snapped);
        }
        if self.state.element_type.is_binding() && self.state.is_binding_enabled {
            match self.state.dragging_element.clone() {
                Some(id) => self.suggest_binding_for_drawn_end(&id, pointer),
                None => {
                    self.state.suggested_bindings =
                        maybe_suggest_binding_at_cursor(pointer, self.scene.elements_including_deleted());
                }
            }
        }
    }

    /// Move, add or retract the rubber-band point of a multi-point line.
    fn update_multi_point_preview(&mut self, id: &ElementId, pointer: Point) {
        let Some((origin, points, committed)) = self.scene.get_live_element(id).and_then(|el| {
            let linear = el.linear()?;
            Some((Point::new(el.x, el.y), linear.points.clone(), linear.last_committed_point))
        }) else {
            return;
        };
        let Some(&last) = points.last() else {
            return;
        };
        let local = pointer - origin;
        let near_committed = committed.is_some_and(|c| local.distance(c) < LINE_CONFIRM_THRESHOLD);

        self.scene.mutate_element(id, |d| {
            let Some(linear) = d.linear_mut() else { return };
            if Some(last) == committed {
                if !near_committed {
                    linear.points.push(local);
                }
            } else if points.len() > 2 && near_committed {
                linear.points.pop();
            } else if let Some(end) = linear.points.last_mut() {
                *end = local;
            }
            normalize_linear_points(d);
        });
    }
}
