//! Text editing - open, update and close the text element under edit.
//!
//! The host renders its own text field over the element; the editor keeps
//! the element's geometry in step with the measured text and decides what
//! happens on submit.

use super::Editor;
use crate::binding::update_bound_elements;
use crate::constants::TEXT_TO_CENTER_SNAP_THRESHOLD;
use crate::element::{element_center, element_containing_position, new_text_element, ElementId, TextData};
use crate::geometry::Point;
use crate::types::{TextAlign, VerticalAlign};
use std::collections::HashSet;

impl Editor {
    /// Open the text editor at a scene point. Returns the edited element.
    pub fn start_text_editing(&mut self, scene_point: Point, insert_at_parent_center: bool) -> ElementId {
        self.batch(|editor| editor.open_text_editor(scene_point, insert_at_parent_center))
    }

    /// Replace the text of the element under edit.
    pub fn update_text(&mut self, text: &str) {
        self.batch(|editor| editor.set_editing_text(text));
    }

    /// Submit the edit. Empty text deletes the element.
    pub fn submit_text(&mut self, text: &str) {
        self.batch(|editor| {
            editor.set_editing_text(text);
            editor.close_text_editor(true);
        });
    }

    /// Reuse the text under `scene_point`, or create one, snapping to the
    /// center of a nearby container when asked.
    pub(crate) fn open_text_editor(&mut self, scene_point: Point, insert_at_parent_center: bool) -> ElementId {
        let existing = self
            .element_at(scene_point)
            .filter(|id| self.scene.get_live_element(id).is_some_and(|el| el.is_text()));

        let id = match existing {
            Some(id) => {
                self.text_edit_is_new = false;
                id
            }
            None => {
                let parent_center = if insert_at_parent_center {
                    element_containing_position(self.scene.elements_including_deleted(), scene_point)
                        .map(|parent| element_center(parent))
                        .filter(|center| center.distance(scene_point) < TEXT_TO_CENTER_SNAP_THRESHOLD)
                } else {
                    None
                };
                let snapped = parent_center.is_some();
                let at = parent_center.unwrap_or(scene_point);
                let data = TextData {
                    font_size: self.state.current_item_font_size,
                    font_family: self.state.current_item_font_family,
                    text_align: if snapped {
                        TextAlign::Center
                    } else {
                        self.state.current_item_text_align
                    },
                    vertical_align: if snapped { VerticalAlign::Middle } else { VerticalAlign::Top },
                    ..TextData::default()
                };
                let mut element = new_text_element(at.x, at.y, self.state.current_item.clone(), data, self.measurer.as_ref());
                element.mutate(|d| {
                    let (align, valign, baseline) = match d.text() {
                        Some(t) => (t.text_align, t.vertical_align, t.baseline),
                        None => return,
                    };
                    d.x -= match align {
                        TextAlign::Left => 0.0,
                        TextAlign::Center => d.width / 2.0,
                        TextAlign::Right => d.width,
                    };
                    if valign == VerticalAlign::Middle {
                        d.y -= d.height / 2.0;
                    }
                    if !snapped {
                        d.y -= baseline / 2.0;
                    }
                });
                let id = element.id().clone();
                self.insert_element(element);
                self.text_edit_is_new = true;
                id
            }
        };

        self.state.editing_element = Some(id.clone());
        self.state.clear_selection();
        self.state.editing_group_id = None;
        tracing::debug!(element = %id, new = self.text_edit_is_new, "text editing started");
        id
    }

    /// Re-measure with the new text, keeping the alignment anchor in place.
    pub(crate) fn set_editing_text(&mut self, text: &str) {
        let Some(id) = self.editing_text_id() else {
            return;
        };
        let Some((font_size, font_family)) = self
            .scene
            .get_live_element(&id)
            .and_then(|el| el.text())
            .map(|t| (t.font_size, t.font_family))
        else {
            return;
        };
        let metrics = self.measurer.measure(text, font_size, font_family);
        self.scene.mutate_element(&id, |d| {
            let (align, valign) = match d.text() {
                Some(t) => (t.text_align, t.vertical_align),
                None => return,
            };
            match align {
                TextAlign::Left => {}
                TextAlign::Center => d.x += (d.width - metrics.width) / 2.0,
                TextAlign::Right => d.x += d.width - metrics.width,
            }
            if valign == VerticalAlign::Middle {
                d.y += (d.height - metrics.height) / 2.0;
            }
            d.width = metrics.width;
            d.height = metrics.height;
            if let Some(t) = d.text_mut() {
                t.text = text.to_string();
                t.baseline = metrics.baseline;
            }
        });
        update_bound_elements(&mut self.scene, &id, &HashSet::new());
    }

    /// Leave text editing. Blank text is deleted; otherwise the element is
    /// optionally selected.
    pub(crate) fn close_text_editor(&mut self, select: bool) {
        let Some(id) = self.editing_text_id() else {
            return;
        };
        let is_blank = self
            .scene
            .get_live_element(&id)
            .and_then(|el| el.text())
            .is_some_and(|t| t.text.trim().is_empty());

        if is_blank {
            self.delete_elements(&HashSet::from([id.clone()]));
        } else if select {
            self.state.selected_element_ids.insert(id.clone());
        }
        // A blank element that never existed before leaves no trace in history
        if !(is_blank && self.text_edit_is_new) {
            self.history.resume_recording();
        }
        self.state.editing_element = None;
        self.state.dragging_element = None;
        self.text_edit_is_new = false;
        tracing::debug!(element = %id, deleted = is_blank, "text editing finished");
    }
}
