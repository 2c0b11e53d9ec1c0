//! Scrollbar geometry derived from the scene and the viewport.

use crate::app_state::AppState;
use crate::constants::{SCROLLBAR_MARGIN, SCROLLBAR_WIDTH};
use crate::element::{common_bounds, Element};
use crate::geometry::Bounds;
use crate::input::ScrollbarHit;

/// Thumb rectangles in viewport pixels. `None` when the axis shows everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollBars {
    pub horizontal: Option<Bounds>,
    pub vertical: Option<Bounds>,
}

pub fn get_scroll_bars<'a, I>(elements: I, state: &AppState) -> ScrollBars
where
    I: IntoIterator<Item = &'a Element>,
{
    let Some(content) = common_bounds(elements) else {
        return ScrollBars::default();
    };
    let zoom = state.zoom.value.max(f32::EPSILON);
    let (vw, vh) = (state.width, state.height);
    let (vw_zoomed, vh_zoomed) = (vw / zoom, vh / zoom);

    let view_min_x = -state.scroll_x + (vw - vw_zoomed) / 2.0;
    let view_min_y = -state.scroll_y + (vh - vh_zoomed) / 2.0;
    let view = Bounds::new(view_min_x, view_min_y, view_min_x + vw_zoomed, view_min_y + vh_zoomed);
    let scene = content.union(&view);

    let horizontal = (view.min_x != scene.min_x || view.max_x != scene.max_x).then(|| {
        let span = scene.width().max(f32::EPSILON);
        let x = SCROLLBAR_MARGIN + (view.min_x - scene.min_x) / span * vw;
        let y = vh - SCROLLBAR_WIDTH - SCROLLBAR_MARGIN;
        let width = view.width() / span * vw - SCROLLBAR_MARGIN * 2.0;
        Bounds::new(x, y, x + width, y + SCROLLBAR_WIDTH)
    });
    let vertical = (view.min_y != scene.min_y || view.max_y != scene.max_y).then(|| {
        let span = scene.height().max(f32::EPSILON);
        let x = vw - SCROLLBAR_WIDTH - SCROLLBAR_MARGIN;
        let y = SCROLLBAR_MARGIN + (view.min_y - scene.min_y) / span * vh;
        let height = view.height() / span * vh - SCROLLBAR_MARGIN * 2.0;
        Bounds::new(x, y, x + SCROLLBAR_WIDTH, y + height)
    });
    ScrollBars { horizontal, vertical }
}

/// Which thumbs contain the viewport point `(x, y)`.
pub fn is_over_scroll_bars(bars: &ScrollBars, x: f32, y: f32) -> ScrollbarHit {
    let over = |b: &Option<Bounds>| b.is_some_and(|b| b.contains(crate::geometry::Point::new(x, y)));
    ScrollbarHit {
        horizontal: over(&bars.horizontal),
        vertical: over(&bars.vertical),
    }
}
