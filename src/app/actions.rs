//! Editor actions - finalize, history steps, duplicate, group and delete.
//!
//! Each action leaves the scene and app state consistent and arms history
//! itself when it should produce an undo step.

use super::Editor;
use crate::binding::{
    bind_or_unbind_selected_elements, fix_bindings_after_deletion, fix_bindings_after_duplication,
    maybe_bind_linear_element, DuplicationMode,
};
use crate::constants::GRID_SIZE;
use crate::element::{duplicate_element, is_invisibly_small, linear_point_global, normalize_linear_points, Element, ElementId, GroupId};
use crate::geometry::{is_path_a_loop, Point};
use crate::groups::{
    add_to_group, get_elements_in_group, get_selected_group_ids, remove_from_selected_groups, select_group,
    select_groups_for_selected_elements,
};
use crate::perf::profile_scope;
use crate::types::ElementType;
use std::collections::{HashMap, HashSet};

impl Editor {
    /// End the point editor or the multi-point element being drawn.
    pub(crate) fn finalize(&mut self) {
        profile_scope!("finalize");
        if self.state.editing_linear_element.is_some() {
            if let Some(id) = self.close_point_editor() {
                self.state.select_only(id);
            }
            return;
        }

        let tool = self.state.element_type;
        let locked = self.state.element_locked;
        let freehand = self
            .state
            .editing_element
            .clone()
            .filter(|id| self.scene.get_live_element(id).is_some_and(|el| el.is_freedraw()));
        let target = self.state.multi_element.clone().or(freehand);

        if let Some(id) = &target {
            self.finalize_linear_element(id, tool, locked);
        }

        self.state.element_type = if (locked || tool == ElementType::Draw) && target.is_some() {
            tool
        } else {
            ElementType::Selection
        };
        self.state.dragging_element = None;
        self.state.multi_element = None;
        self.state.editing_element = None;
        self.state.start_bound_element = None;
        self.state.suggested_bindings.clear();
        self.history.resume_recording();
    }

    /// Close the point editor, binding its ends. Returns the element when it is still live.
    pub(crate) fn close_point_editor(&mut self) -> Option<ElementId> {
        let editor = self.state.editing_linear_element.take()?;
        let id = editor.element_id;
        let live = self.scene.get_live_element(&id).is_some();
        if live && self.state.is_binding_enabled {
            bind_or_unbind_selected_elements(&mut self.scene, std::slice::from_ref(&id));
        }
        self.history.resume_recording();
        tracing::debug!(element = %id, "point editor closed");
        live.then_some(id)
    }

    /// The point editor only lives while its element is selected.
    pub(crate) fn close_point_editor_if_deselected(&mut self) {
        let deselected = self
            .state
            .editing_linear_element
            .as_ref()
            .is_some_and(|editor| !self.state.is_selected(&editor.element_id));
        if deselected {
            self.close_point_editor();
        }
    }

    fn finalize_linear_element(&mut self, id: &ElementId, tool: ElementType, locked: bool) {
        let Some(element) = self.scene.get_live_element(id).cloned() else {
            return;
        };
        let is_freehand = element.is_freedraw();
        if !is_freehand {
            let drop_rubber_band = element.linear().is_some_and(|l| {
                l.last_committed_point.is_none() || l.points.last().copied() != l.last_committed_point
            });
            if drop_rubber_band {
                self.scene.mutate_element(id, |d| {
                    if let Some(linear) = d.linear_mut() {
                        linear.points.pop();
                    }
                    normalize_linear_points(d);
                });
            }
        }

        if self.scene.get_live_element(id).is_some_and(|el| is_invisibly_small(el)) {
            self.delete_elements(&HashSet::from([id.clone()]));
            tracing::debug!(element = %id, "discarded invisible linear element");
            return;
        }

        let Some((points, kind)) = self
            .scene
            .get_live_element(id)
            .and_then(|el| Some((el.linear()?.points.clone(), el.element_type())))
        else {
            return;
        };
        let is_loop = is_path_a_loop(&points, self.state.zoom.value);
        if is_loop && matches!(kind, ElementType::Line | ElementType::Draw) {
            let first = points[0];
            self.scene.mutate_element(id, |d| {
                if let Some(last) = d.linear_mut().and_then(|l| l.points.last_mut()) {
                    *last = first;
                }
                normalize_linear_points(d);
            });
        }
        if kind.is_binding() && !is_loop && points.len() > 1 && self.state.is_binding_enabled {
            let end = self
                .scene
                .get_live_element(id)
                .and_then(|el| linear_point_global(el, points.len() - 1));
            if let Some(end) = end {
                maybe_bind_linear_element(&mut self.scene, id, self.state.start_bound_element.as_ref(), end);
            }
        }
        if !locked && tool != ElementType::Draw {
            self.state.selected_element_ids.insert(id.clone());
        }
    }

    /// Step back (or forward) one entry. Ignored while a gesture holds an element.
    pub(crate) fn apply_history_step(&mut self, redo: bool) -> bool {
        let busy = self.state.multi_element.is_some()
            || self.state.resizing_element.is_some()
            || self.state.editing_element.is_some()
            || self.state.dragging_element.is_some();
        if busy {
            return false;
        }
        let entry = if redo { self.history.redo() } else { self.history.undo() };
        let Some(entry) = entry else {
            return false;
        };

        let (mut next, deleted) = {
            let live: HashMap<&ElementId, &Element> = self
                .scene
                .elements_including_deleted()
                .iter()
                .map(|el| (el.id(), el))
                .collect();
            let mut next: Vec<Element> = entry
                .elements
                .iter()
                .map(|snapshot| match live.get(snapshot.id()) {
                    Some(current) => {
                        let mut restored = (*current).clone();
                        restored.revert_to(snapshot);
                        restored
                    }
                    None => snapshot.clone(),
                })
                .collect();
            let in_snapshot: HashSet<&ElementId> = entry.elements.iter().map(|el| el.id()).collect();
            let mut deleted = HashSet::new();
            for current in self.scene.elements_including_deleted() {
                if in_snapshot.contains(current.id()) {
                    continue;
                }
                let mut gone = current.clone();
                if !gone.is_deleted {
                    gone.mutate(|d| d.is_deleted = true);
                }
                deleted.insert(gone.id().clone());
                next.push(gone);
            }
            (next, deleted)
        };

        fix_bindings_after_deletion(&mut next, &deleted);
        self.scene.replace_all_elements(next);
        self.state.apply_history_subset(&entry.app_state);
        let scene = &self.scene;
        self.state.retain_selection(|id| scene.get_live_element(id).is_some());
        self.history
            .set_current_state(&self.state, self.scene.elements_including_deleted());
        tracing::debug!(redo, depth = self.history.len(), "history step applied");
        true
    }

    pub(crate) fn duplicate_selected(&mut self) {
        profile_scope!("duplicate_selected");
        let offset = Point::new(GRID_SIZE / 2.0, GRID_SIZE / 2.0);
        let editing_group = self.state.editing_group_id.clone();
        let mut group_map = HashMap::new();
        let mut old_to_new = HashMap::new();
        let mut old_ids = Vec::new();
        let mut new_ids = Vec::new();
        let mut next = Vec::with_capacity(self.scene.len());

        for el in self.scene.elements_including_deleted() {
            next.push(el.clone());
            if !el.is_deleted && self.state.is_selected(el.id()) {
                let copy = duplicate_element(editing_group.as_ref(), &mut group_map, el, offset);
                old_to_new.insert(el.id().clone(), copy.id().clone());
                old_ids.push(el.id().clone());
                new_ids.push(copy.id().clone());
                next.push(copy);
            }
        }
        if new_ids.is_empty() {
            return;
        }
        fix_bindings_after_duplication(&mut next, &old_ids, &old_to_new, DuplicationMode::Default);
        self.scene.replace_all_elements(next);
        self.state.clear_selection();
        self.state.selected_element_ids.extend(new_ids);
        select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
        self.history.resume_recording();
    }

    pub(crate) fn select_all(&mut self) {
        self.close_point_editor();
        self.state.editing_group_id = None;
        self.state.selected_element_ids = self
            .scene
            .elements()
            .into_iter()
            .map(|el| el.id().clone())
            .collect();
        select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
    }

    /// Wrap the selection in a new group and gather its members at the topmost member's slot.
    pub(crate) fn group_selected(&mut self) {
        profile_scope!("group_selected");
        let selected = self.selected_ids();
        if selected.len() < 2 {
            return;
        }
        let existing = get_selected_group_ids(&self.state);
        if let [only] = existing.as_slice() {
            let members: HashSet<ElementId> = get_elements_in_group(self.scene.elements_including_deleted(), only)
                .map(|el| el.id().clone())
                .collect();
            if selected.iter().all(|id| members.contains(id)) && members.len() == selected.len() {
                return;
            }
        }

        let group = GroupId::new();
        let editing_group = self.state.editing_group_id.clone();
        let chosen: HashSet<&ElementId> = selected.iter().collect();
        let mut updated = self.scene.elements_including_deleted().to_vec();
        for el in updated.iter_mut() {
            if chosen.contains(el.id()) {
                el.mutate(|d| d.group_ids = add_to_group(&d.group_ids, group.clone(), editing_group.as_ref()));
            }
        }
        let in_group = |el: &Element| !el.is_deleted && el.group_ids.contains(&group);
        let Some(last) = updated.iter().rposition(in_group) else {
            return;
        };
        let mut ordered = Vec::with_capacity(updated.len());
        ordered.extend(updated[..last].iter().filter(|el| !in_group(*el)).cloned());
        ordered.extend(updated[..=last].iter().filter(|el| in_group(*el)).cloned());
        ordered.extend(updated[last + 1..].iter().cloned());

        self.scene.replace_all_elements(ordered);
        self.state.selected_group_ids.clear();
        select_group(&group, &mut self.state, self.scene.elements_including_deleted());
        self.history.resume_recording();
        tracing::debug!(group = %group, members = selected.len(), "grouped selection");
    }

    pub(crate) fn ungroup_selected(&mut self) {
        if self.state.selected_group_ids.is_empty() {
            return;
        }
        let groups = self.state.selected_group_ids.clone();
        let mut next = self.scene.elements_including_deleted().to_vec();
        for el in next.iter_mut() {
            let kept = remove_from_selected_groups(&el.group_ids, &groups);
            if kept.len() != el.group_ids.len() {
                el.mutate(|d| d.group_ids = kept);
            }
        }
        self.scene.replace_all_elements(next);
        self.state.selected_group_ids.clear();
        select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
        self.history.resume_recording();
    }

    /// Delete the grabbed point in the point editor, otherwise the selection.
    pub(crate) fn delete_selected(&mut self) {
        profile_scope!("delete_selected");
        if self.state.editing_linear_element.is_some() {
            if self.linear_editor_delete_point() {
                return;
            }
            if let Some(editor) = self.state.editing_linear_element.take() {
                self.delete_elements(&HashSet::from([editor.element_id]));
            }
        } else {
            let selected: HashSet<ElementId> = self.selected_ids().into_iter().collect();
            if selected.is_empty() {
                return;
            }
            self.delete_elements(&selected);
        }

        self.state.clear_selection();
        let group_is_empty = self
            .state
            .editing_group_id
            .as_ref()
            .is_some_and(|g| get_elements_in_group(self.scene.elements_including_deleted(), g).next().is_none());
        if group_is_empty {
            self.state.editing_group_id = None;
        }
        self.state.element_type = ElementType::Selection;
        self.state.multi_element = None;
        self.history.resume_recording();
    }
}
