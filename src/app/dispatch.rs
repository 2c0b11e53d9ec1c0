//! Event dispatch - one entry point per platform event.
//!
//! Every handler runs to completion inside [`Editor::batch`]: scene
//! notifications are held, history records at most one entry, and change
//! listeners fire once when the batch closes.

use super::state::{Editor, EditorMode, ListenerId};
use crate::app_state::AppState;
use crate::element::Element;
use crate::error::EditorResult;
use crate::groups::select_groups_for_selected_elements;
use crate::input::EditorEvent;
use crate::perf::profile_scope;
use std::time::Instant;

impl Editor {
    pub fn dispatch(&mut self, event: EditorEvent) -> EditorResult<()> {
        self.dispatch_at(event, Instant::now())
    }

    /// Dispatch with an explicit clock, so deadlines are deterministic in tests.
    pub fn dispatch_at(&mut self, event: EditorEvent, now: Instant) -> EditorResult<()> {
        profile_scope!("dispatch");
        let Some(event) = event.sanitized(self.keys.last_viewport_cursor) else {
            tracing::trace!("dropped event with non-finite coordinates");
            return Ok(());
        };
        self.system.perf.begin_event(event.kind());
        self.tick(now);
        let result = self.batch(|editor| {
            editor.drain_remote_updates();
            editor.handle_event(event)
        });
        if let Err(e) = &result {
            tracing::warn!("Event rejected: {}", e);
        }
        self.system.perf.end_event();
        result
    }

    fn handle_event(&mut self, event: EditorEvent) -> EditorResult<()> {
        match event {
            EditorEvent::PointerDown(e) => self.handle_pointer_down(&e),
            EditorEvent::PointerMove(e) => self.handle_pointer_move(&e),
            EditorEvent::PointerUp(e) => self.handle_pointer_up(&e),
            EditorEvent::PointerCancel(e) => self.handle_pointer_cancel(&e),
            EditorEvent::DoubleClick(e) => self.handle_double_click(&e),
            EditorEvent::Wheel(e) => self.handle_wheel(&e),
            EditorEvent::KeyDown(e) => self.handle_key_down(&e),
            EditorEvent::KeyUp(e) => self.handle_key_up(&e),
            EditorEvent::Blur => self.handle_blur(),
            EditorEvent::Paste { payload, position } => {
                self.keys.last_viewport_cursor = position;
                return self.paste_text(&payload);
            }
            EditorEvent::Drop(payload) => return self.drop_payload(payload),
        }
        Ok(())
    }

    /// Run `f` as one logical change: held notifications, one history
    /// record, one listener round.
    pub(crate) fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scene.hold_notifications();
        let result = f(self);
        self.close_point_editor_if_deselected();
        self.history
            .record(&self.state, self.scene.elements_including_deleted());
        self.scene.release_notifications();
        self.fire_listeners();
        result
    }

    fn fire_listeners(&mut self) {
        let elements = self.scene.elements_including_deleted();
        for (_, listener) in self.listeners.iter_mut() {
            listener(elements, &self.state);
        }
    }

    /// Fire expired deadlines and poll the settings watcher.
    pub fn tick(&mut self, now: Instant) {
        self.system.now = now;
        if self.system.cache_ignore_zoom.poll(now) {
            self.state.should_cache_ignore_zoom = false;
            self.restore_stashed_selection();
        }
        // An expired tap window simply closes
        self.system.tap_twice.poll(now);
        self.check_settings_reload();
    }

    /// Put back a selection stashed by a zoom gesture, if nothing was selected since.
    pub(crate) fn restore_stashed_selection(&mut self) {
        if !self.state.selected_element_ids.is_empty() || self.state.previous_selected_element_ids.is_empty() {
            return;
        }
        let scene = &self.scene;
        let mut restored = std::mem::take(&mut self.state.previous_selected_element_ids);
        restored.retain(|id| scene.get_live_element(id).is_some());
        self.state.selected_element_ids = restored;
        select_groups_for_selected_elements(&mut self.state, self.scene.elements_including_deleted());
    }

    pub fn add_change_listener(&mut self, listener: impl FnMut(&[Element], &AppState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        before != self.listeners.len()
    }

    /// Conceptual mode. Orthogonal layers win over an idle gesture state.
    pub fn mode(&self) -> EditorMode {
        if self.pinch.is_pinching() {
            return EditorMode::Pinching;
        }
        if self.interaction.is_panning() {
            return EditorMode::Panning;
        }
        if self.interaction.is_dragging_scroll_bar() {
            return EditorMode::DraggingScrollBar;
        }
        if let Some(mode) = self.interaction.mode() {
            return EditorMode::Pointer(mode);
        }
        let editing_text = self
            .state
            .editing_element
            .as_ref()
            .and_then(|id| self.scene.get_live_element(id))
            .is_some_and(|el| el.is_text());
        if editing_text {
            return EditorMode::EditingText;
        }
        if self.state.multi_element.is_some() {
            return EditorMode::DrawingLinearMultiPoint;
        }
        EditorMode::Idle
    }
}
