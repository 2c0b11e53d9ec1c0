//! Binding resolver - arrows and lines anchored to shapes.
//!
//! The relation is stored on both sides: a linear element's
//! `start_binding`/`end_binding` names its target, and the target lists the
//! linear element in `bound_elements`. Every function that changes one side
//! changes the other in the same call.
//!
//! ## Anchoring model
//!
//! A binding stores a `focus` in `[-1, 1]` and a `gap`. Looking from the
//! endpoint's neighbouring point A towards the target center, `focus`
//! selects an aim point P on the axis through the center perpendicular to
//! that line of sight (`0` is the center, `±1` the outline). The bound
//! endpoint is where the ray A→P enters the outline inflated by `gap`.
//!
//! ```text
//!          n
//!          ^   . P (focus ~ 0.5)
//!   A ---------*-----------   C
//!              +-----------+
//! ```

use crate::app_state::AppState;
use crate::constants::{BINDING_GAP, BINDING_HIT_GAP};
use crate::element::{
    element_abs_coords, linear_point_global, move_linear_point, point_from_absolute, Element,
    ElementData, ElementId, ElementKind, PointBinding,
};
use crate::geometry::{is_point_in_polygon, ray_box_entry, Point};
use crate::input::Modifiers;
use crate::perf::profile_scope;
use crate::scene::Scene;
use crate::types::LinearEnd;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Predicates
// ============================================================================

/// Binding is on unless ctrl/cmd is held.
pub fn should_enable_binding_for_pointer_event(modifiers: &Modifiers) -> bool {
    !modifiers.ctrl_or_cmd()
}

pub fn is_binding_enabled(state: &AppState) -> bool {
    state.is_binding_enabled
}

/// A line with at most two points already bound to `target` at its other end
/// would bind both ends to the same shape.
pub fn is_linear_element_simple_and_already_bound(
    linear: &ElementData,
    already_bound_to: Option<&ElementId>,
    target: &ElementId,
) -> bool {
    already_bound_to == Some(target) && linear.linear().is_some_and(|l| l.points.len() < 3)
}

fn cross(a: Point, b: Point) -> f32 {
    a.x * b.y - a.y * b.x
}

fn to_local(target: &ElementData, p: Point) -> Point {
    p.rotate_around(element_abs_coords(target).center(), -target.angle)
}

fn to_global(target: &ElementData, p: Point) -> Point {
    p.rotate_around(element_abs_coords(target).center(), target.angle)
}

/// Whether `p` is within `gap` of the target's box, rotation aware.
fn is_inside_with_gap(target: &ElementData, p: Point, gap: f32) -> bool {
    element_abs_coords(target).inflate(gap).contains(to_local(target, p))
}

/// Topmost bindable element near `point`.
pub fn get_hovered_element_for_binding(point: Point, elements: &[Element]) -> Option<&Element> {
    profile_scope!("get_hovered_element_for_binding");
    elements
        .iter()
        .rev()
        .find(|el| el.is_bindable() && is_inside_with_gap(el, point, BINDING_HIT_GAP))
}

// ============================================================================
// Suggestions
// ============================================================================

pub fn maybe_suggest_binding_at_cursor(point: Point, elements: &[Element]) -> Vec<ElementId> {
    get_hovered_element_for_binding(point, elements)
        .map(|el| vec![el.id().clone()])
        .unwrap_or_default()
}

/// Target the pointer would bind `end` of `linear` to, excluding the shape
/// a simple line is already bound to at its other end.
pub fn maybe_suggest_binding_for_linear_element_at_cursor(
    linear: &Element,
    end: LinearEnd,
    point: Point,
    elements: &[Element],
) -> Option<ElementId> {
    let hovered = get_hovered_element_for_binding(point, elements)?;
    let opposite = linear
        .linear()
        .and_then(|l| l.binding(end.opposite()))
        .map(|b| &b.element_id);
    if is_linear_element_simple_and_already_bound(linear, opposite, hovered.id()) {
        return None;
    }
    Some(hovered.id().clone())
}

fn endpoint_global(linear: &ElementData, end: LinearEnd) -> Option<Point> {
    let len = linear.linear()?.points.len();
    let index = match end {
        LinearEnd::Start => 0,
        LinearEnd::End => len.checked_sub(1)?,
    };
    linear_point_global(linear, index)
}

fn eligible_target_for_end<'a>(linear: &Element, end: LinearEnd, elements: &'a [Element]) -> Option<&'a Element> {
    let p = endpoint_global(linear, end)?;
    get_hovered_element_for_binding(p, elements)
}

/// Can `target` newly bind `end` of `linear`?
fn is_eligible_for_new_binding_by_bindable(linear: &Element, end: LinearEnd, target: &Element) -> bool {
    let Some(data) = linear.linear() else { return false };
    if data.binding(end).is_some() {
        return false;
    }
    let other = data.binding(end.opposite()).map(|b| &b.element_id);
    if is_linear_element_simple_and_already_bound(linear, other, target.id()) {
        return false;
    }
    endpoint_global(linear, end).is_some_and(|p| is_inside_with_gap(target, p, BINDING_HIT_GAP))
}

/// Unbound linear ends that hover `target`, with which ends can bind.
fn eligible_linears_for_bindable(target: &Element, elements: &[Element]) -> Vec<(ElementId, bool, bool)> {
    elements
        .iter()
        .filter(|el| !el.is_deleted && el.is_binding_element())
        .filter_map(|el| {
            let start = is_eligible_for_new_binding_by_bindable(el, LinearEnd::Start, target);
            let end = is_eligible_for_new_binding_by_bindable(el, LinearEnd::End, target);
            (start || end).then(|| (el.id().clone(), start, end))
        })
        .collect()
}

/// Highlight candidates for every selected element.
pub fn maybe_suggest_binding_for_all(selected: &[&Element], elements: &[Element]) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::new();
    for el in selected {
        if el.is_binding_element() {
            for end in [LinearEnd::Start, LinearEnd::End] {
                if let Some(target) = eligible_target_for_end(el, end, elements) {
                    out.push(target.id().clone());
                }
            }
        } else if el.is_bindable() {
            out.extend(
                eligible_linears_for_bindable(el, elements)
                    .into_iter()
                    .map(|(id, _, _)| id),
            );
        }
    }
    let mut seen = HashSet::new();
    out.retain(|id| seen.insert(id.clone()));
    out
}

// ============================================================================
// Focus geometry
// ============================================================================

/// Support distance of the target's outline along unit direction `n` (local frame).
fn half_extent_along(target: &ElementData, n: Point) -> f32 {
    let abs = element_abs_coords(target);
    let (a, b) = (abs.width() / 2.0, abs.height() / 2.0);
    match target.kind {
        ElementKind::Ellipse(_) => ((a * n.x).powi(2) + (b * n.y).powi(2)).sqrt(),
        ElementKind::Diamond(_) => (a * n.x.abs()).max(b * n.y.abs()),
        _ => a * n.x.abs() + b * n.y.abs(),
    }
}

/// Axis perpendicular to the line of sight from `adjacent` to the center.
fn focus_axis(center: Point, adjacent: Point) -> Option<Point> {
    let d = (center - adjacent).normalized();
    (d != Point::ZERO).then(|| Point::new(-d.y, d.x))
}

/// Focus of the line `adjacent`→`edge` relative to `target`, in `[-1, 1]`.
pub fn determine_focus_distance(target: &ElementData, adjacent: Point, edge: Point) -> f32 {
    let center = element_abs_coords(target).center();
    let (a, e) = (to_local(target, adjacent), to_local(target, edge));
    let Some(n) = focus_axis(center, a) else { return 0.0 };
    let v = e - a;
    let denom = cross(n, v);
    if denom.abs() <= f32::EPSILON {
        return 0.0;
    }
    let t = cross(a - center, v) / denom;
    let extent = half_extent_along(target, n);
    if extent <= f32::EPSILON {
        return 0.0;
    }
    (t / extent).clamp(-1.0, 1.0)
}

/// Scene-space aim point for `focus` as seen from `adjacent`.
pub fn determine_focus_point(target: &ElementData, focus: f32, adjacent: Point) -> Point {
    let center = element_abs_coords(target).center();
    let a = to_local(target, adjacent);
    let local = match focus_axis(center, a) {
        Some(n) if focus != 0.0 => center + n * (focus * half_extent_along(target, n)),
        _ => center,
    };
    to_global(target, local)
}

fn ray_segment_t(origin: Point, dir: Point, q: Point, w: Point) -> Option<f32> {
    let denom = cross(dir, w);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let qa = q - origin;
    let t = cross(qa, w) / denom;
    let u = cross(qa, dir) / denom;
    (t > 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
}

/// Where the ray `from`→`to` enters the target outline inflated by `gap`.
/// `None` when `from` is already inside or the ray misses.
pub fn intersect_element_with_line(target: &ElementData, from: Point, to: Point, gap: f32) -> Option<Point> {
    let abs = element_abs_coords(target);
    let (a, p) = (to_local(target, from), to_local(target, to));
    let dir = p - a;
    let hit = match target.kind {
        ElementKind::Ellipse(_) => {
            let c = abs.center();
            let (rx, ry) = (abs.width() / 2.0 + gap, abs.height() / 2.0 + gap);
            let o = a - c;
            let qa = (dir.x / rx).powi(2) + (dir.y / ry).powi(2);
            let qb = 2.0 * (o.x * dir.x / (rx * rx) + o.y * dir.y / (ry * ry));
            let qc = (o.x / rx).powi(2) + (o.y / ry).powi(2) - 1.0;
            let disc = qb * qb - 4.0 * qa * qc;
            if qc <= 0.0 || qa <= f32::EPSILON || disc < 0.0 {
                return None;
            }
            let t = (-qb - disc.sqrt()) / (2.0 * qa);
            (t > 0.0).then(|| a + dir * t)?
        }
        ElementKind::Diamond(_) => {
            let c = abs.center();
            let (hw, hh) = (abs.width() / 2.0, abs.height() / 2.0);
            let edge = hw.hypot(hh);
            let grow_x = if hh > f32::EPSILON { gap * edge / hh } else { gap };
            let grow_y = if hw > f32::EPSILON { gap * edge / hw } else { gap };
            let polygon = [
                Point::new(c.x, abs.min_y - grow_y),
                Point::new(abs.max_x + grow_x, c.y),
                Point::new(c.x, abs.max_y + grow_y),
                Point::new(abs.min_x - grow_x, c.y),
            ];
            if is_point_in_polygon(a, &polygon) {
                return None;
            }
            let t = (0..4)
                .filter_map(|i| {
                    let q = polygon[i];
                    ray_segment_t(a, dir, q, polygon[(i + 1) % 4] - q)
                })
                .fold(f32::INFINITY, f32::min);
            if !t.is_finite() {
                return None;
            }
            a + dir * t
        }
        _ => ray_box_entry(a, p, &abs.inflate(gap))?,
    };
    Some(to_global(target, hit))
}

// ============================================================================
// Commit
// ============================================================================

fn endpoint_indices(len: usize, end: LinearEnd) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    Some(match end {
        LinearEnd::Start => (0, 1),
        LinearEnd::End => (len - 1, len - 2),
    })
}

fn calculate_focus(linear: &ElementData, target: &ElementData, end: LinearEnd) -> f32 {
    let Some(len) = linear.linear().map(|l| l.points.len()) else {
        return 0.0;
    };
    let Some((edge, adjacent)) = endpoint_indices(len, end) else {
        return 0.0;
    };
    match (linear_point_global(linear, adjacent), linear_point_global(linear, edge)) {
        (Some(a), Some(e)) => determine_focus_distance(target, a, e),
        _ => 0.0,
    }
}

/// Drop `linear_id` from `target_id`'s back references unless some end still binds there.
fn release_target_if_unreferenced(scene: &mut Scene, linear_id: &ElementId, target_id: &ElementId) {
    let still_bound = scene
        .get_element(linear_id)
        .and_then(|el| el.linear())
        .is_some_and(|l| {
            [&l.start_binding, &l.end_binding]
                .into_iter()
                .flatten()
                .any(|b| &b.element_id == target_id)
        });
    if still_bound {
        return;
    }
    let listed = scene
        .get_element(target_id)
        .is_some_and(|t| t.bound_elements().contains(linear_id));
    if listed {
        scene.mutate_element(target_id, |d| {
            if let Some(bound) = d.bound_elements_mut() {
                bound.retain(|id| id != linear_id);
            }
        });
    }
}

/// Bind `end` of `linear_id` to `target_id`, updating both sides and releasing the previous target.
pub fn bind_linear_element(scene: &mut Scene, linear_id: &ElementId, target_id: &ElementId, end: LinearEnd) {
    let (Some(linear), Some(target)) = (scene.get_live_element(linear_id), scene.get_live_element(target_id)) else {
        return;
    };
    if !linear.is_binding_element() || !target.is_bindable() {
        return;
    }
    let focus = calculate_focus(linear, target, end);
    let previous = linear
        .linear()
        .and_then(|l| l.binding(end))
        .map(|b| b.element_id.clone());

    scene.mutate_element(linear_id, |d| {
        if let Some(l) = d.linear_mut() {
            *l.binding_mut(end) = Some(PointBinding {
                element_id: target_id.clone(),
                focus,
                gap: BINDING_GAP,
            });
        }
    });
    let listed = scene
        .get_element(target_id)
        .is_some_and(|t| t.bound_elements().contains(linear_id));
    if !listed {
        scene.mutate_element(target_id, |d| {
            if let Some(bound) = d.bound_elements_mut() {
                bound.push(linear_id.clone());
            }
        });
    }
    if let Some(prev) = previous.filter(|p| p != target_id) {
        release_target_if_unreferenced(scene, linear_id, &prev);
    }
    tracing::debug!(linear = %linear_id, target = %target_id, ?end, focus, "bound linear element");
}

/// Clear `end` of `linear_id`. Returns the former target.
pub fn unbind_linear_element(scene: &mut Scene, linear_id: &ElementId, end: LinearEnd) -> Option<ElementId> {
    let previous = scene
        .get_element(linear_id)?
        .linear()?
        .binding(end)?
        .element_id
        .clone();
    scene.mutate_element(linear_id, |d| {
        if let Some(l) = d.linear_mut() {
            *l.binding_mut(end) = None;
        }
    });
    release_target_if_unreferenced(scene, linear_id, &previous);
    Some(previous)
}

/// Pointer-up commit for a freshly drawn connector.
pub fn maybe_bind_linear_element(
    scene: &mut Scene,
    linear_id: &ElementId,
    start_bound_element: Option<&ElementId>,
    pointer: Point,
) {
    if let Some(start) = start_bound_element {
        bind_linear_element(scene, linear_id, start, LinearEnd::Start);
    }
    let hovered = get_hovered_element_for_binding(pointer, scene.elements_including_deleted())
        .map(|el| el.id().clone());
    let Some(hovered) = hovered else { return };
    let simple_and_bound = scene
        .get_element(linear_id)
        .is_some_and(|l| is_linear_element_simple_and_already_bound(l, start_bound_element, &hovered));
    if !simple_and_bound {
        bind_linear_element(scene, linear_id, &hovered, LinearEnd::End);
    }
}

/// Edge decision for [`bind_or_unbind_linear_element`].
#[derive(Debug, Clone, PartialEq)]
enum EdgeTarget {
    Keep,
    Unbind,
    Bind(ElementId),
}

fn bind_or_unbind_linear_element(scene: &mut Scene, linear_id: &ElementId, start: EdgeTarget, end: EdgeTarget) {
    for (end_kind, this, other) in [
        (LinearEnd::Start, &start, &end),
        (LinearEnd::End, &end, &start),
    ] {
        match this {
            EdgeTarget::Keep => {}
            EdgeTarget::Unbind => {
                unbind_linear_element(scene, linear_id, end_kind);
            }
            EdgeTarget::Bind(target) => {
                let allowed = match other {
                    EdgeTarget::Unbind => true,
                    EdgeTarget::Keep => {
                        let other_bound = scene
                            .get_element(linear_id)
                            .and_then(|el| el.linear())
                            .and_then(|l| l.binding(end_kind.opposite()))
                            .map(|b| b.element_id.clone());
                        !scene.get_element(linear_id).is_some_and(|el| {
                            is_linear_element_simple_and_already_bound(el, other_bound.as_ref(), target)
                        })
                    }
                    EdgeTarget::Bind(other_target) => end_kind == LinearEnd::Start || other_target != target,
                };
                if allowed {
                    bind_linear_element(scene, linear_id, target, end_kind);
                } else {
                    unbind_linear_element(scene, linear_id, end_kind);
                }
            }
        }
    }
}

fn hover_target(scene: &Scene, linear_id: &ElementId, end: LinearEnd) -> EdgeTarget {
    let elements = scene.elements_including_deleted();
    scene
        .get_element(linear_id)
        .and_then(|el| eligible_target_for_end(el, end, elements))
        .map(|t| EdgeTarget::Bind(t.id().clone()))
        .unwrap_or(EdgeTarget::Unbind)
}

/// After a drag or transform: selected connectors bind or unbind each end by
/// hover; selected shapes pick up free connector ends that hover them.
pub fn bind_or_unbind_selected_elements(scene: &mut Scene, selected: &[ElementId]) {
    profile_scope!("bind_or_unbind_selected_elements");
    for id in selected {
        let Some(el) = scene.get_live_element(id) else { continue };
        if el.is_binding_element() {
            let start = hover_target(scene, id, LinearEnd::Start);
            let end = hover_target(scene, id, LinearEnd::End);
            bind_or_unbind_linear_element(scene, id, start, end);
        } else if el.is_bindable() {
            let candidates = eligible_linears_for_bindable(el, scene.elements_including_deleted());
            for (linear_id, start, end) in candidates {
                let edge = |ok: bool| if ok { EdgeTarget::Bind(id.clone()) } else { EdgeTarget::Keep };
                bind_or_unbind_linear_element(scene, &linear_id, edge(start), edge(end));
            }
        }
    }
    debug_assert!(binding_violations(scene.elements_including_deleted()).is_empty());
}

/// Unbind both ends of every selected connector.
pub fn unbind_linear_elements(scene: &mut Scene, selected: &[ElementId]) {
    for id in selected {
        if scene.get_live_element(id).is_some_and(|el| el.is_binding_element()) {
            bind_or_unbind_linear_element(scene, id, EdgeTarget::Unbind, EdgeTarget::Unbind);
        }
    }
}

// ============================================================================
// Propagation
// ============================================================================

fn bound_point_update(linear: &ElementData, end: LinearEnd, binding: &PointBinding, target: &ElementData) -> Option<(usize, Point)> {
    let len = linear.linear()?.points.len();
    let (edge, adjacent_index) = endpoint_indices(len, end)?;
    let adjacent = linear_point_global(linear, adjacent_index)?;
    let focus_point = determine_focus_point(target, binding.focus, adjacent);
    let new_edge = if binding.gap == 0.0 {
        focus_point
    } else {
        intersect_element_with_line(target, adjacent, focus_point, binding.gap).unwrap_or(focus_point)
    };
    Some((edge, point_from_absolute(linear, new_edge)))
}

/// Re-anchor every connector bound to `changed_id`. Connectors in
/// `simultaneously_updated` are moving with the shape and stay as they are.
pub fn update_bound_elements(scene: &mut Scene, changed_id: &ElementId, simultaneously_updated: &HashSet<ElementId>) {
    profile_scope!("update_bound_elements");
    let Some(changed) = scene.get_live_element(changed_id) else { return };
    let bound: Vec<ElementId> = changed.bound_elements().to_vec();

    for linear_id in bound {
        if simultaneously_updated.contains(&linear_id) {
            continue;
        }
        for end in [LinearEnd::Start, LinearEnd::End] {
            let update = (|| {
                let linear = scene.get_live_element(&linear_id)?;
                let data = linear.linear()?;
                let binding = data.binding(end)?;
                if &binding.element_id != changed_id && data.points.len() > 2 {
                    return None;
                }
                let target = scene.get_live_element(&binding.element_id)?;
                bound_point_update(linear, end, binding, target)
            })();
            if let Some((index, point)) = update {
                scene.mutate_element(&linear_id, |d| move_linear_point(d, index, point));
            }
        }
    }
}

// ============================================================================
// Fix-ups
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicationMode {
    /// Paste and ctrl+D: duplicates only keep relations inside the copied set
    Default,
    /// Alt-drag: duplicates stay put and take over outside relations from the originals
    DuplicatesServeAsOld,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Original,
    Duplicate,
    Outside,
}

/// Rewrite binding references after duplicating `old_ids` into `old_to_new`.
pub fn fix_bindings_after_duplication(
    elements: &mut [Element],
    old_ids: &[ElementId],
    old_to_new: &HashMap<ElementId, ElementId>,
    mode: DuplicationMode,
) {
    let old: HashSet<&ElementId> = old_ids.iter().collect();
    let new: HashSet<&ElementId> = old_to_new.values().collect();

    let remap = |role: Role, r: &ElementId| -> Option<ElementId> {
        match (mode, role) {
            (DuplicationMode::Default, Role::Duplicate) => old_to_new.get(r).cloned(),
            (DuplicationMode::Default, _) => Some(r.clone()),
            (DuplicationMode::DuplicatesServeAsOld, Role::Original) => old.contains(r).then(|| r.clone()),
            (DuplicationMode::DuplicatesServeAsOld, _) => {
                Some(old_to_new.get(r).cloned().unwrap_or_else(|| r.clone()))
            }
        }
    };

    for el in elements.iter_mut() {
        let role = if new.contains(el.id()) {
            Role::Duplicate
        } else if old.contains(el.id()) {
            Role::Original
        } else {
            Role::Outside
        };
        if mode == DuplicationMode::Default && role != Role::Duplicate {
            continue;
        }

        let next_bindings = el.linear().map(|l| {
            [&l.start_binding, &l.end_binding].map(|b| {
                b.as_ref().and_then(|b| {
                    remap(role, &b.element_id).map(|element_id| PointBinding { element_id, ..b.clone() })
                })
            })
        });
        let next_bound: Vec<ElementId> = el
            .bound_elements()
            .iter()
            .filter_map(|id| remap(role, id))
            .collect();

        let bindings_changed = match (&next_bindings, el.linear()) {
            (Some([s, e]), Some(l)) => *s != l.start_binding || *e != l.end_binding,
            _ => false,
        };
        let bound_changed = next_bound.as_slice() != el.bound_elements();
        if !bindings_changed && !bound_changed {
            continue;
        }
        el.mutate(|d| {
            if let (Some(l), Some([s, e])) = (d.linear_mut(), next_bindings) {
                l.start_binding = s;
                l.end_binding = e;
            }
            if let Some(bound) = d.bound_elements_mut() {
                *bound = next_bound;
            }
        });
    }
}

/// Remove every relation that touches a deleted element, on both sides,
/// including the tombstones' own fields.
pub fn fix_bindings_after_deletion(elements: &mut [Element], deleted_ids: &HashSet<ElementId>) {
    for el in elements.iter_mut() {
        let is_gone = deleted_ids.contains(el.id()) || el.is_deleted;
        let drop_ref = |id: &ElementId| is_gone || deleted_ids.contains(id);

        let bindings_hit = el.linear().is_some_and(|l| {
            [&l.start_binding, &l.end_binding]
                .into_iter()
                .flatten()
                .any(|b| drop_ref(&b.element_id))
        });
        let bound_hit = el.bound_elements().iter().any(drop_ref);
        if !bindings_hit && !bound_hit {
            continue;
        }
        el.mutate(|d| {
            if let Some(l) = d.linear_mut() {
                for slot in [&mut l.start_binding, &mut l.end_binding] {
                    if slot.as_ref().is_some_and(|b| drop_ref(&b.element_id)) {
                        *slot = None;
                    }
                }
            }
            if let Some(bound) = d.bound_elements_mut() {
                bound.retain(|id| !drop_ref(id));
            }
        });
    }
}

// ============================================================================
// Integrity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingViolation {
    /// A connector names a target that is missing, deleted or not bindable
    DanglingBinding { linear: ElementId, target: ElementId },
    /// A connector names a target that doesn't list it back
    MissingBackReference { linear: ElementId, target: ElementId },
    /// A shape lists a connector that is missing or deleted
    DanglingBoundElement { shape: ElementId, linear: ElementId },
    /// A shape lists a connector that isn't bound to it
    MissingBinding { shape: ElementId, linear: ElementId },
}

/// Asymmetric or dangling binding references among live elements.
pub fn binding_violations(elements: &[Element]) -> Vec<BindingViolation> {
    let by_id: HashMap<&ElementId, &Element> = elements.iter().map(|el| (el.id(), el)).collect();
    let live = |id: &ElementId| by_id.get(id).copied().filter(|el| !el.is_deleted);
    let mut out = Vec::new();

    for el in elements.iter().filter(|el| !el.is_deleted) {
        if let Some(l) = el.linear() {
            for b in [&l.start_binding, &l.end_binding].into_iter().flatten() {
                match live(&b.element_id) {
                    Some(t) if t.is_bindable() => {
                        if !t.bound_elements().contains(el.id()) {
                            out.push(BindingViolation::MissingBackReference {
                                linear: el.id().clone(),
                                target: b.element_id.clone(),
                            });
                        }
                    }
                    _ => out.push(BindingViolation::DanglingBinding {
                        linear: el.id().clone(),
                        target: b.element_id.clone(),
                    }),
                }
            }
        }
        for linear_id in el.bound_elements() {
            match live(linear_id).and_then(|l| l.linear()) {
                Some(l) => {
                    let points_back = [&l.start_binding, &l.end_binding]
                        .into_iter()
                        .flatten()
                        .any(|b| &b.element_id == el.id());
                    if !points_back {
                        out.push(BindingViolation::MissingBinding {
                            shape: el.id().clone(),
                            linear: linear_id.clone(),
                        });
                    }
                }
                None => out.push(BindingViolation::DanglingBoundElement {
                    shape: el.id().clone(),
                    linear: linear_id.clone(),
                }),
            }
        }
    }
    out
}
