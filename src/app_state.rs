//! Editor UI state that lives next to the scene.
//!
//! `AppState` is plain data. Input handlers mutate it directly; the subset
//! that matters for undo is captured as [`HistoryAppState`].

use crate::constants::GRID_SIZE;
use crate::element::{Element, ElementId, ElementStyle, GroupId};
use crate::geometry::Point;
use crate::types::{Arrowhead, CursorButton, ElementType, FontFamily, TextAlign};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Zoom factor plus the viewport translation that keeps the zoom anchor fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pub value: f32,
    pub translation: Point,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            value: 1.0,
            translation: Point::ZERO,
        }
    }
}

/// Point editor session on a single linear element.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearElementEditor {
    pub element_id: ElementId,
    pub active_point_index: Option<usize>,
    pub last_uncommitted_point: Option<Point>,
    pub is_dragging: bool,
    /// Scene offset between the pointer and the grabbed point
    pub pointer_offset: Point,
    pub end_binding_element: Option<ElementId>,
}

impl LinearElementEditor {
    pub fn new(element_id: ElementId) -> Self {
        Self {
            element_id,
            active_point_index: None,
            last_uncommitted_point: None,
            is_dragging: false,
            pointer_offset: Point::ZERO,
            end_binding_element: None,
        }
    }
}

/// A remote participant's pointer, relayed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub pointer: Option<Point>,
    #[serde(default)]
    pub button: CursorButton,
    #[serde(default)]
    pub selected_element_ids: Vec<ElementId>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    // Tool
    pub element_type: ElementType,
    pub element_locked: bool,

    // Selection
    pub selected_element_ids: HashSet<ElementId>,
    pub previous_selected_element_ids: HashSet<ElementId>,
    pub selected_group_ids: HashSet<GroupId>,
    pub editing_group_id: Option<GroupId>,

    // Elements in flight
    pub dragging_element: Option<ElementId>,
    pub resizing_element: Option<ElementId>,
    pub editing_element: Option<ElementId>,
    pub editing_linear_element: Option<LinearElementEditor>,
    pub multi_element: Option<ElementId>,
    pub selection_element: Option<Element>,
    pub start_bound_element: Option<ElementId>,
    pub suggested_bindings: Vec<ElementId>,

    // Viewport
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub zoom: Zoom,
    pub width: f32,
    pub height: f32,
    pub offset_left: f32,
    pub offset_top: f32,

    pub grid_size: Option<f32>,
    pub is_binding_enabled: bool,
    pub is_resizing: bool,
    pub is_rotating: bool,
    pub should_cache_ignore_zoom: bool,
    pub cursor_button: CursorButton,
    pub error_message: Option<String>,
    pub is_loading: bool,
    pub zen_mode_enabled: bool,
    pub show_stats: bool,
    pub collaborators: HashMap<String, Collaborator>,

    // Style for the next created element
    pub current_item: ElementStyle,
    pub current_item_font_size: f32,
    pub current_item_font_family: FontFamily,
    pub current_item_text_align: TextAlign,
    pub current_item_start_arrowhead: Option<Arrowhead>,
    pub current_item_end_arrowhead: Option<Arrowhead>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            element_type: ElementType::Selection,
            element_locked: false,
            selected_element_ids: HashSet::new(),
            previous_selected_element_ids: HashSet::new(),
            selected_group_ids: HashSet::new(),
            editing_group_id: None,
            dragging_element: None,
            resizing_element: None,
            editing_element: None,
            editing_linear_element: None,
            multi_element: None,
            selection_element: None,
            start_bound_element: None,
            suggested_bindings: Vec::new(),
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: Zoom::default(),
            width: 1024.0,
            height: 768.0,
            offset_left: 0.0,
            offset_top: 0.0,
            grid_size: None,
            is_binding_enabled: true,
            is_resizing: false,
            is_rotating: false,
            should_cache_ignore_zoom: false,
            cursor_button: CursorButton::Up,
            error_message: None,
            is_loading: false,
            zen_mode_enabled: false,
            show_stats: false,
            collaborators: HashMap::new(),
            current_item: ElementStyle::default(),
            current_item_font_size: crate::constants::DEFAULT_FONT_SIZE,
            current_item_font_family: FontFamily::default(),
            current_item_text_align: TextAlign::default(),
            current_item_start_arrowhead: None,
            current_item_end_arrowhead: Some(Arrowhead::Arrow),
        }
    }
}

impl AppState {
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected_element_ids.contains(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_element_ids.clear();
        self.selected_group_ids.clear();
    }

    pub fn select_only(&mut self, id: ElementId) {
        self.selected_element_ids.clear();
        self.selected_group_ids.clear();
        self.selected_element_ids.insert(id);
    }

    pub fn toggle_grid(&mut self) {
        self.grid_size = match self.grid_size {
            Some(_) => None,
            None => Some(GRID_SIZE),
        };
    }

    /// Drop selection entries that no longer name a live element.
    pub fn retain_selection(&mut self, live: impl Fn(&ElementId) -> bool) {
        self.selected_element_ids.retain(|id| live(id));
    }

    /// History-relevant subset.
    pub fn history_subset(&self) -> HistoryAppState {
        HistoryAppState {
            selected_element_ids: self.selected_element_ids.iter().cloned().collect(),
            selected_group_ids: self.selected_group_ids.iter().cloned().collect(),
            editing_group_id: self.editing_group_id.clone(),
            element_type: self.element_type,
            editing_linear_element_id: self
                .editing_linear_element
                .as_ref()
                .map(|e| e.element_id.clone()),
        }
    }

    /// Restore the subset captured by [`AppState::history_subset`].
    pub fn apply_history_subset(&mut self, subset: &HistoryAppState) {
        self.selected_element_ids = subset.selected_element_ids.iter().cloned().collect();
        self.selected_group_ids = subset.selected_group_ids.iter().cloned().collect();
        self.editing_group_id = subset.editing_group_id.clone();
        self.element_type = subset.element_type;
        self.editing_linear_element = subset
            .editing_linear_element_id
            .clone()
            .map(LinearElementEditor::new);
    }
}

/// App state fields captured in history entries. Kept sorted so entries compare deterministically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAppState {
    pub selected_element_ids: std::collections::BTreeSet<ElementId>,
    pub selected_group_ids: std::collections::BTreeSet<GroupId>,
    pub editing_group_id: Option<GroupId>,
    pub element_type: ElementType,
    pub editing_linear_element_id: Option<ElementId>,
}

/// Partial app state update accepted by `Editor::update_scene`.
#[derive(Debug, Clone, Default)]
pub struct AppStatePatch {
    pub selected_element_ids: Option<HashSet<ElementId>>,
    pub element_type: Option<ElementType>,
    pub scroll: Option<(f32, f32)>,
    pub zoom: Option<f32>,
    pub grid_size: Option<Option<f32>>,
    pub element_locked: Option<bool>,
    pub zen_mode_enabled: Option<bool>,
}

impl AppStatePatch {
    pub fn apply(&self, state: &mut AppState) {
        if let Some(ids) = &self.selected_element_ids {
            state.selected_element_ids = ids.clone();
        }
        if let Some(tool) = self.element_type {
            state.element_type = tool;
        }
        if let Some((x, y)) = self.scroll {
            state.scroll_x = x;
            state.scroll_y = y;
        }
        if let Some(z) = self.zoom {
            state.zoom.value = crate::input::normalize_zoom(z);
        }
        if let Some(grid) = self.grid_size {
            state.grid_size = grid;
        }
        if let Some(locked) = self.element_locked {
            state.element_locked = locked;
        }
        if let Some(zen) = self.zen_mode_enabled {
            state.zen_mode_enabled = zen;
        }
    }
}
