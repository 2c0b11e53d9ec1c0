//! Imperative API for hosts, plus the lookups the event handlers share.

use super::Editor;
use crate::app_state::{AppState, AppStatePatch, Collaborator};
use crate::binding::{fix_bindings_after_deletion, maybe_suggest_binding_for_all};
use crate::element::{is_hitting_bounding_box_without_hitting_element, Element, ElementId};
use crate::geometry::Point;
use crate::history::History;
use crate::input::{get_scroll_bars, InteractionState, ScrollBars};
use crate::perf::PerfMonitor;
use crate::scene::Scene;
use crate::types::{ElementType, LinearEnd};
use std::collections::{HashMap, HashSet};

/// Host-driven scene replacement.
#[derive(Debug, Clone, Default)]
pub struct SceneUpdate {
    pub elements: Option<Vec<Element>>,
    pub app_state: Option<AppStatePatch>,
    pub collaborators: Option<HashMap<String, Collaborator>>,
    /// Arm history so the update becomes an undoable entry
    pub commit_to_history: bool,
}

// =============================================================================
// Accessors
// =============================================================================

impl Editor {
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.system.perf
    }

    /// Live elements in z-order.
    pub fn scene_elements(&self) -> Vec<&Element> {
        self.scene.elements()
    }

    pub fn scene_elements_including_deleted(&self) -> &[Element] {
        self.scene.elements_including_deleted()
    }

    /// Live elements a renderer should draw; the text under edit is left to the host's editor.
    pub fn renderable_elements(&self) -> Vec<&Element> {
        let editing = self.editing_text_id();
        self.scene
            .elements()
            .into_iter()
            .filter(|el| Some(el.id()) != editing.as_ref())
            .collect()
    }

    pub fn scroll_bars(&self) -> ScrollBars {
        get_scroll_bars(self.scene.elements(), &self.state)
    }

    /// Topmost element under a scene point, after the bounding-box tie-break.
    pub fn element_at(&mut self, scene_point: Point) -> Option<ElementId> {
        let hits = self.hit_elements_at(scene_point);
        self.pick_hit_element(&hits, scene_point)
    }
}

// =============================================================================
// Commands
// =============================================================================

impl Editor {
    pub fn update_scene(&mut self, update: SceneUpdate) {
        self.batch(|editor| {
            if let Some(patch) = &update.app_state {
                patch.apply(&mut editor.state);
            }
            if let Some(elements) = update.elements {
                editor.scene.replace_all_elements(elements);
                let scene = &editor.scene;
                editor.state.retain_selection(|id| scene.get_live_element(id).is_some());
            }
            if let Some(collaborators) = update.collaborators {
                editor.state.collaborators = collaborators;
            }
            if update.commit_to_history {
                editor.history.resume_recording();
            }
        });
    }

    /// Empty scene, default app state and a fresh history.
    pub fn reset_scene(&mut self) {
        self.batch(|editor| {
            editor.abort_gesture();
            editor.pinch.clear();
            editor.scene.replace_all_elements(Vec::new());
            let previous = std::mem::take(&mut editor.state);
            editor.state.width = previous.width;
            editor.state.height = previous.height;
            editor.state.offset_left = previous.offset_left;
            editor.state.offset_top = previous.offset_top;
            editor.state.collaborators = previous.collaborators;
            editor.apply_settings();
            editor.history.clear();
            editor.history.resume_recording();
            tracing::info!("scene reset");
        });
    }

    /// Drop every history entry; the current scene becomes the new baseline.
    pub fn history_clear(&mut self) {
        self.batch(|editor| {
            editor.history.clear();
            editor.history.resume_recording();
        });
    }

    pub fn undo(&mut self) -> bool {
        self.batch(|editor| editor.apply_history_step(false))
    }

    pub fn redo(&mut self) -> bool {
        self.batch(|editor| editor.apply_history_step(true))
    }

    /// Canvas size and its offset inside the host window, in viewport pixels.
    pub fn set_viewport(&mut self, width: f32, height: f32, offset_left: f32, offset_top: f32) {
        self.batch(|editor| {
            editor.state.width = width;
            editor.state.height = height;
            editor.state.offset_left = offset_left;
            editor.state.offset_top = offset_top;
        });
    }

    pub fn select_tool(&mut self, element_type: ElementType) {
        self.batch(|editor| editor.set_tool(element_type));
    }

    pub fn toggle_lock(&mut self) {
        self.batch(|editor| editor.toggle_tool_lock());
    }

    pub fn toggle_grid_mode(&mut self) {
        self.batch(|editor| editor.toggle_grid());
    }

    pub fn toggle_zen_mode(&mut self) {
        self.batch(|editor| editor.state.zen_mode_enabled = !editor.state.zen_mode_enabled);
    }

    pub fn toggle_stats(&mut self) {
        self.batch(|editor| editor.state.show_stats = !editor.state.show_stats);
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

impl Editor {
    pub(crate) fn set_tool(&mut self, element_type: ElementType) {
        if element_type != self.state.element_type && self.state.multi_element.is_some() {
            self.finalize();
        }
        if !element_type.is_linear() {
            self.state.suggested_bindings.clear();
        }
        if element_type != ElementType::Selection {
            self.state.clear_selection();
            self.state.editing_group_id = None;
        }
        self.state.element_type = element_type;
        tracing::debug!(tool = ?element_type, "tool selected");
    }

    pub(crate) fn toggle_tool_lock(&mut self) {
        if self.state.element_locked {
            self.state.element_type = ElementType::Selection;
        }
        self.state.element_locked = !self.state.element_locked;
    }

    pub(crate) fn toggle_grid(&mut self) {
        self.state.grid_size = match self.state.grid_size {
            Some(_) => None,
            None => Some(self.settings.data.grid_size),
        };
    }

    pub(crate) fn reset_tool_unless_locked(&mut self) {
        if !self.state.element_locked {
            self.state.element_type = ElementType::Selection;
        }
    }

    /// Selected live ids, bottom to top.
    pub(crate) fn selected_ids(&self) -> Vec<ElementId> {
        self.scene
            .elements_including_deleted()
            .iter()
            .filter(|el| !el.is_deleted && self.state.is_selected(el.id()))
            .map(|el| el.id().clone())
            .collect()
    }

    pub(crate) fn hit_elements_at(&mut self, p: Point) -> Vec<ElementId> {
        let state = &self.state;
        self.hit_tester.elements_at(
            self.scene.elements_including_deleted(),
            self.scene.revision(),
            p,
            state.zoom.value,
            |id| state.is_selected(id),
        )
    }

    /// The topmost hit, unless it was only hit on its padded box while
    /// something below was hit on its outline.
    pub(crate) fn pick_hit_element(&self, hits: &[ElementId], p: Point) -> Option<ElementId> {
        let top = hits.last()?;
        if hits.len() > 1 {
            let box_only = self
                .scene
                .get_live_element(top)
                .is_some_and(|el| is_hitting_bounding_box_without_hitting_element(el, p, self.state.zoom.value));
            if box_only {
                return hits.get(hits.len() - 2).cloned();
            }
        }
        Some(top.clone())
    }

    /// Live text element currently open in the text editor.
    pub(crate) fn editing_text_id(&self) -> Option<ElementId> {
        self.state
            .editing_element
            .as_ref()
            .filter(|id| self.scene.get_live_element(id).is_some_and(|el| el.is_text()))
            .cloned()
    }

    /// Put a new element on top of the z-order.
    pub(crate) fn insert_element(&mut self, element: Element) {
        let mut next = self.scene.elements_including_deleted().to_vec();
        next.push(element);
        self.scene.replace_all_elements(next);
    }

    /// Tombstone `ids` and strip every binding that pointed at them.
    pub(crate) fn delete_elements(&mut self, ids: &HashSet<ElementId>) {
        if ids.is_empty() {
            return;
        }
        let mut next = self.scene.elements_including_deleted().to_vec();
        for el in next.iter_mut() {
            if ids.contains(el.id()) && !el.is_deleted {
                el.mutate(|d| d.is_deleted = true);
            }
        }
        fix_bindings_after_deletion(&mut next, ids);
        self.scene.replace_all_elements(next);
        self.state.selected_element_ids.retain(|id| !ids.contains(id));
        tracing::debug!(count = ids.len(), "elements deleted");
    }

    pub(crate) fn suggest_bindings_for_selection(&mut self, selected: &[ElementId]) {
        if !self.state.is_binding_enabled {
            self.state.suggested_bindings.clear();
            return;
        }
        let moved: Vec<&Element> = selected
            .iter()
            .filter_map(|id| self.scene.get_live_element(id))
            .collect();
        self.state.suggested_bindings =
            maybe_suggest_binding_for_all(&moved, self.scene.elements_including_deleted());
    }

    /// Bind suggestion for the moving end of a connector being drawn.
    pub(crate) fn suggest_binding_for_drawn_end(&mut self, linear_id: &ElementId, pointer: Point) {
        let elements = self.scene.elements_including_deleted();
        let start_bound = self.state.start_bound_element.as_ref();
        let suggestion = self.scene.get_live_element(linear_id).and_then(|linear| {
            if !linear.is_binding_element() {
                return None;
            }
            let hovered = crate::binding::get_hovered_element_for_binding(pointer, elements)?;
            let already_bound = crate::binding::is_linear_element_simple_and_already_bound(
                linear,
                start_bound.or(linear.linear()?.binding(LinearEnd::Start).map(|b| &b.element_id)),
                hovered.id(),
            );
            (!already_bound).then(|| hovered.id().clone())
        });
        self.state.suggested_bindings = suggestion.into_iter().collect();
    }
}
