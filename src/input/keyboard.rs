//! Keyboard - shortcuts, arrow nudging and live modifier changes.
//!
//! Modifier changes during a gesture re-run the current resize or shape
//! drag so shift and alt take effect without another pointer move.

use crate::app::Editor;
use crate::binding::{bind_or_unbind_selected_elements, unbind_linear_elements, update_bound_elements};
use crate::constants::{ELEMENT_SHIFT_TRANSLATE_AMOUNT, ELEMENT_TRANSLATE_AMOUNT};
use crate::element::ElementId;
use crate::geometry::Point;
use crate::input::{Key, KeyEvent, Modifiers, PointerMode};
use crate::perf::profile_scope;
use crate::types::ElementType;
use std::collections::HashSet;

impl Editor {
    pub(crate) fn handle_key_down(&mut self, event: &KeyEvent) {
        profile_scope!("handle_key_down");
        let modifiers = event.modifiers;
        let command = modifiers.ctrl_or_cmd();
        if command {
            self.state.is_binding_enabled = false;
        }

        if self.interaction.session().is_some() {
            self.reapply_modifiers(modifiers);
            return;
        }

        // The host's text field owns the keyboard while a text element is open
        if self.editing_text_id().is_some() {
            let submits = event.key == Key::Escape || (event.key == Key::Enter && command);
            if submits {
                self.close_text_editor(true);
            }
            return;
        }

        match event.key {
            Key::Char('z') if modifiers.alt && !command => {
                self.state.zen_mode_enabled = !self.state.zen_mode_enabled;
            }
            Key::Char('\'') if command => self.toggle_grid(),
            Key::Char('z') if command && modifiers.shift => {
                self.apply_history_step(true);
            }
            Key::Char('z') if command => {
                self.apply_history_step(false);
            }
            Key::Char('y') if command => {
                self.apply_history_step(true);
            }
            Key::Char('d') if command => self.duplicate_selected(),
            Key::Char('a') if command => self.select_all(),
            Key::Char('g') if command && modifiers.shift => self.ungroup_selected(),
            Key::Char('g') if command => self.group_selected(),
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown => {
                self.nudge_selection(event.key, modifiers.shift);
            }
            Key::Enter => self.handle_enter(),
            Key::Escape => self.handle_escape(),
            Key::Space => {
                if self.pinch.is_empty() {
                    self.keys.holding_space = true;
                }
            }
            Key::Char(c) if !command && !modifiers.alt && self.state.dragging_element.is_none() => {
                if let Some(tool) = ElementType::from_shortcut(c) {
                    self.set_tool(tool);
                } else if c == 'q' {
                    self.toggle_tool_lock();
                }
            }
            _ => {}
        }
    }

    pub(crate) fn handle_key_up(&mut self, event: &KeyEvent) {
        profile_scope!("handle_key_up");
        if event.key == Key::Space {
            self.keys.holding_space = false;
            if self.state.element_type != ElementType::Selection {
                self.state.clear_selection();
                self.state.editing_group_id = None;
            }
        }
        if !event.modifiers.ctrl_or_cmd() && self.settings.data.binding_enabled {
            self.state.is_binding_enabled = true;
        }

        if self.interaction.session().is_some() {
            self.reapply_modifiers(event.modifiers);
            return;
        }

        if event.key.is_arrow() && self.keys.nudged {
            self.keys.nudged = false;
            let selected = self.selected_ids();
            if self.state.is_binding_enabled {
                bind_or_unbind_selected_elements(&mut self.scene, &selected);
            } else {
                unbind_linear_elements(&mut self.scene, &selected);
            }
            self.state.suggested_bindings.clear();
            self.history.resume_recording();
        }
    }

    fn reapply_modifiers(&mut self, modifiers: Modifiers) {
        let Some((mode, session)) = self.interaction.finish() else {
            return;
        };
        match mode {
            PointerMode::Transforming if self.state.is_resizing || self.state.is_rotating => {
                self.drag_transform(&session, modifiers);
            }
            PointerMode::DrawingGeneric if session.last_coords != session.origin => {
                self.drag_new_generic(&session, modifiers);
            }
            _ => {}
        }
        self.interaction.start_pointer(mode, session);
    }

    fn nudge_selection(&mut self, key: Key, shift: bool) {
        let step = match (self.state.grid_size, shift) {
            (Some(_), true) => ELEMENT_TRANSLATE_AMOUNT,
            (Some(grid), false) => grid,
            (None, true) => ELEMENT_SHIFT_TRANSLATE_AMOUNT,
            (None, false) => ELEMENT_TRANSLATE_AMOUNT,
        };
        let offset = match key {
            Key::ArrowLeft => Point::new(-step, 0.0),
            Key::ArrowRight => Point::new(step, 0.0),
            Key::ArrowUp => Point::new(0.0, -step),
            Key::ArrowDown => Point::new(0.0, step),
            _ => return,
        };
        let selected = self.selected_ids();
        if selected.is_empty() {
            return;
        }
        for id in &selected {
            self.scene.mutate_element(id, |d| {
                d.x += offset.x;
                d.y += offset.y;
            });
        }
        let moved: HashSet<ElementId> = selected.iter().cloned().collect();
        for id in &selected {
            update_bound_elements(&mut self.scene, id, &moved);
        }
        self.suggest_bindings_for_selection(&selected);
        self.keys.nudged = true;
    }

    fn handle_enter(&mut self) {
        if self.state.multi_element.is_some() {
            self.finalize();
            return;
        }
        let selected = self.selected_ids();
        let [only] = selected.as_slice() else {
            return;
        };
        let Some((is_connector, is_linear, center)) = self.scene.get_live_element(only).map(|el| {
            (
                el.is_binding_element(),
                el.is_linear(),
                Point::new(el.x + el.width / 2.0, el.y + el.height / 2.0),
            )
        }) else {
            return;
        };
        if is_connector {
            self.enter_linear_editor(only.clone());
        } else if !is_linear {
            self.open_text_editor(center, true);
        }
    }

    fn handle_escape(&mut self) {
        if self.state.multi_element.is_some() || self.state.editing_linear_element.is_some() {
            self.finalize();
            return;
        }
        self.state.clear_selection();
        self.state.editing_group_id = None;
        self.state.element_type = ElementType::Selection;
    }
}
