//! Wheel - scrolling, and zooming when ctrl/cmd is held.

use crate::app::Editor;
use crate::input::{get_new_zoom, normalize_scroll, normalize_zoom, WheelEvent};
use crate::geometry::Point;
use crate::perf::profile_scope;

impl Editor {
    pub(crate) fn handle_wheel(&mut self, event: &WheelEvent) {
        profile_scope!("handle_wheel");
        if self.interaction.is_panning() {
            return;
        }
        let zoom = self.state.zoom.value;

        if event.is_zoom_intent() {
            let max_step = self.settings.data.wheel_zoom_max_step;
            let delta = event.delta_y.signum() * event.delta_y.abs().min(max_step);
            let offset = Point::new(self.state.offset_left, self.state.offset_top);
            self.state.zoom = get_new_zoom(normalize_zoom(zoom - delta / 100.0), self.state.zoom, offset, event.position);

            // Selection is hidden while zooming and comes back once the wheel settles
            if !self.state.selected_element_ids.is_empty() {
                self.state.previous_selected_element_ids = std::mem::take(&mut self.state.selected_element_ids);
                self.state.selected_group_ids.clear();
            }
            self.state.should_cache_ignore_zoom = true;
            self.system.cache_ignore_zoom.schedule(self.system.now);
            tracing::trace!(zoom = self.state.zoom.value, "wheel zoom");
            return;
        }

        if event.modifiers.shift {
            let delta = if event.delta_y != 0.0 { event.delta_y } else { event.delta_x };
            self.state.scroll_x = normalize_scroll(self.state.scroll_x - delta / zoom);
            return;
        }
        self.state.scroll_x = normalize_scroll(self.state.scroll_x - event.delta_x / zoom);
        self.state.scroll_y = normalize_scroll(self.state.scroll_y - event.delta_y / zoom);
    }
}
