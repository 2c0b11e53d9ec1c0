//! Clipboard, drops and document loading.

use super::Editor;
use crate::binding::{fix_bindings_after_duplication, DuplicationMode};
use crate::document::{
    load_from_path, parse_clipboard, parse_document, parse_library, save_to_path, serialize_clipboard,
    serialize_document, ClipboardContent, Document,
};
use crate::element::{common_bounds, duplicate_element, new_text_element, Element, TextData};
use crate::error::EditorResult;
use crate::geometry::{grid_point, Point};
use crate::groups::select_groups_for_selected_elements;
use crate::input::{viewport_to_scene, DropPayload};
use std::collections::HashMap;
use std::path::Path;

impl Editor {
    /// Clipboard payload for the current selection.
    pub fn copy_selected(&self) -> EditorResult<String> {
        let elements: Vec<&Element> = self
            .scene
            .elements()
            .into_iter()
            .filter(|el| self.state.is_selected(el.id()))
            .collect();
        serialize_clipboard(elements)
    }

    /// Paste at the last known pointer position.
    pub fn paste(&mut self, payload: &str) -> EditorResult<()> {
        self.batch(|editor| editor.paste_text(payload))
    }

    /// Serialized document of the live scene.
    pub fn serialize(&self) -> EditorResult<String> {
        serialize_document(self.scene.elements_including_deleted(), &self.state)
    }

    pub fn save_to_path(&self, path: &Path) -> EditorResult<()> {
        save_to_path(path, self.scene.elements_including_deleted(), &self.state)
    }

    pub fn load_from_path(&mut self, path: &Path) -> EditorResult<()> {
        self.begin_loading();
        let document = load_from_path(path);
        self.finish_loading(document)
    }

    /// Mark a load in progress; the host reads `is_loading` to show a spinner.
    pub fn begin_loading(&mut self) {
        self.batch(|editor| editor.state.is_loading = true);
    }

    /// Apply a loaded document, or record its failure in `error_message`.
    pub fn finish_loading(&mut self, result: EditorResult<Document>) -> EditorResult<()> {
        self.batch(|editor| editor.complete_loading(result))
    }

    pub(crate) fn paste_text(&mut self, payload: &str) -> EditorResult<()> {
        let cursor = viewport_to_scene(self.keys.last_viewport_cursor, &self.state);
        match parse_clipboard(payload) {
            Ok(ClipboardContent::Elements(elements)) => {
                self.insert_elements_at(elements, cursor);
                Ok(())
            }
            Ok(ClipboardContent::Text(text)) => {
                if !text.trim().is_empty() {
                    self.insert_text_at(&text, cursor);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Paste rejected: {}", e);
                self.state.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub(crate) fn drop_payload(&mut self, payload: DropPayload) -> EditorResult<()> {
        match payload {
            DropPayload::Document(json) => {
                self.state.is_loading = true;
                self.complete_loading(parse_document(&json))
            }
            DropPayload::Library { json, position } => match parse_library(&json) {
                Ok(elements) => {
                    self.keys.last_viewport_cursor = position;
                    let at = viewport_to_scene(position, &self.state);
                    self.insert_elements_at(elements, at);
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!("Library drop rejected: {}", e);
                    self.state.error_message = Some(e.to_string());
                    Err(e)
                }
            },
        }
    }

    fn complete_loading(&mut self, result: EditorResult<Document>) -> EditorResult<()> {
        self.state.is_loading = false;
        match result {
            Ok(document) => {
                self.abort_gesture();
                self.state.clear_selection();
                self.state.editing_group_id = None;
                self.state.editing_linear_element = None;
                self.state.multi_element = None;
                self.state.editing_element = None;
                self.state.error_message = None;
                document.app_state.apply(&mut self.state);
                let count = document.elements.len();
                self.scene.replace_all_elements(document.elements);
                self.history.resume_recording();
                tracing::info!(elements = count, "document loaded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Document load failed: {}", e);
                self.state.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Insert copies of `elements` centered on `at`, selected.
    fn insert_elements_at(&mut self, elements: Vec<Element>, at: Point) {
        let Some(bounds) = common_bounds(&elements) else {
            return;
        };
        let snapped = grid_point(
            at.x - bounds.width() / 2.0,
            at.y - bounds.height() / 2.0,
            self.state.grid_size,
        );
        let offset = Point::new(snapped.x - bounds.min_x, snapped.y - bounds.min_y);
        let editing_group = self.state.editing_group_id.clone();
        let mut group_map = HashMap::new();
        let mut old_to_new = HashMap::new();
        let old_ids: Vec<_> = elements.iter().map(|el| el.id().clone()).collect();
        let copies: Vec<Element> = elements
            .iter()
            .map(|el| {
                let copy = duplicate_element(editing_group.as_ref(), &mut group_map, el, offset);
                old_to_new.insert(el.id().clone(), copy.id().clone());
                copy
            })
            .collect();
        let new_ids: Vec<_> = copies.iter().map(|el| el.id().clone()).collect();

        let mut next = self.scene.elements_including_deleted().to_vec();
        let first_copy = next.len();
        next.extend(copies);
        fix_bindings_after_duplication(&mut next[first_copy..], &old_ids, &old_to_new, DuplicationMode::Default);
        self.scene.replace_all_elements(next);

        self.state.clear_selection();
        self.state.selected_element_ids.extend(new_ids);
        select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
        self.history.resume_recording();
        tracing::debug!(count = old_ids.len(), "pasted elements");
    }

    fn insert_text_at(&mut self, text: &str, at: Point) {
        let data = TextData {
            text: text.to_string(),
            font_size: self.state.current_item_font_size,
            font_family: self.state.current_item_font_family,
            text_align: self.state.current_item_text_align,
            ..TextData::default()
        };
        let element = new_text_element(at.x, at.y, self.state.current_item.clone(), data, self.measurer.as_ref());
        let id = element.id().clone();
        self.insert_element(element);
        self.state.select_only(id);
        self.history.resume_recording();
    }
}
