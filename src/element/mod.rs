//! Element model - the drawable record and its per-kind payloads.
//!
//! An [`Element`] owns its identity (`id`, `version`, `version_nonce`) and an
//! [`ElementData`] body. The body is readable through `Deref`, but the only way
//! to change it is [`Element::mutate`], which always bumps the version. This
//! makes "forgot to invalidate" bugs unrepresentable.
//!
//! ## Modules
//!
//! - `bounds` - rotation-aware bounding boxes and common bounds
//! - `hit_test` - painted-shape and bounding-box hit tests
//! - `linear` - point edits on lines, arrows and strokes
//! - `text` - text measuring seam

mod bounds;
mod linear;
mod text;

pub use bounds::{
    common_bounds, element_abs_coords, element_bounds, element_center, linear_point_global,
};
pub use hit_test::{
    element_containing_position, hit_test, hit_test_shape, is_hitting_bounding_box,
    is_hitting_bounding_box_without_hitting_element,
};
pub use linear::{move_linear_point, point_from_absolute};
pub use text::{ApproximateTextMeasurer, TextMeasurer, TextMetrics};

use crate::constants::{DEFAULT_FONT_SIZE, INVISIBLY_SMALL_ELEMENT_SIZE};
use crate::geometry::{Bounds, Point};
use crate::types::{
    Arrowhead, ElementType, FillStyle, FontFamily, StrokeSharpness, StrokeStyle, TextAlign,
    VerticalAlign,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable element identity. Generated once, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group identity. An element lists its groups innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f32,
    pub stroke_style: StrokeStyle,
    pub roughness: u8,
    pub opacity: u8,
    pub stroke_sharpness: StrokeSharpness,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            background_color: "transparent".to_string(),
            fill_style: FillStyle::default(),
            stroke_width: 1.0,
            stroke_style: StrokeStyle::default(),
            roughness: 1,
            opacity: 100,
            stroke_sharpness: StrokeSharpness::default(),
        }
    }
}

impl ElementStyle {
    pub fn has_background(&self) -> bool {
        self.background_color != "transparent"
    }
}

/// Anchor of a linear element's endpoint on a bindable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointBinding {
    pub element_id: ElementId,
    /// Normalized offset in `[-1, 1]` of the aim point across the target.
    pub focus: f32,
    /// Distance kept between the endpoint and the target's outline.
    pub gap: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeData {
    #[serde(default)]
    pub bound_elements: Vec<ElementId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearData {
    /// Points relative to the element origin; the first is always `(0, 0)` once normalized.
    pub points: Vec<Point>,
    #[serde(default)]
    pub last_committed_point: Option<Point>,
    #[serde(default)]
    pub start_binding: Option<PointBinding>,
    #[serde(default)]
    pub end_binding: Option<PointBinding>,
    #[serde(default)]
    pub start_arrowhead: Option<Arrowhead>,
    #[serde(default)]
    pub end_arrowhead: Option<Arrowhead>,
}

impl LinearData {
    pub fn binding(&self, end: crate::types::LinearEnd) -> Option<&PointBinding> {
        match end {
            crate::types::LinearEnd::Start => self.start_binding.as_ref(),
            crate::types::LinearEnd::End => self.end_binding.as_ref(),
        }
    }

    pub fn binding_mut(&mut self, end: crate::types::LinearEnd) -> &mut Option<PointBinding> {
        match end {
            crate::types::LinearEnd::Start => &mut self.start_binding,
            crate::types::LinearEnd::End => &mut self.end_binding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    pub text: String,
    pub font_size: f32,
    pub font_family: FontFamily,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub baseline: f32,
    #[serde(default)]
    pub bound_elements: Vec<ElementId>,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            text_align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            baseline: 0.0,
            bound_elements: Vec::new(),
        }
    }
}

/// Closed set of element kinds with kind-specific payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Rectangle(ShapeData),
    Ellipse(ShapeData),
    Diamond(ShapeData),
    Line(LinearData),
    Arrow(LinearData),
    Draw(LinearData),
    Text(TextData),
    /// Rubber-band marquee; lives in app state, never in the scene
    Selection,
}

// ============================================================================
// Element
// ============================================================================

/// Mutable body of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub angle: f32,
    #[serde(flatten)]
    pub style: ElementStyle,
    #[serde(default)]
    pub group_ids: Vec<GroupId>,
    pub seed: u32,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl ElementData {
    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Rectangle(_) => ElementType::Rectangle,
            ElementKind::Ellipse(_) => ElementType::Ellipse,
            ElementKind::Diamond(_) => ElementType::Diamond,
            ElementKind::Line(_) => ElementType::Line,
            ElementKind::Arrow(_) => ElementType::Arrow,
            ElementKind::Draw(_) => ElementType::Draw,
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Selection => ElementType::Selection,
        }
    }

    pub fn linear(&self) -> Option<&LinearData> {
        match &self.kind {
            ElementKind::Line(l) | ElementKind::Arrow(l) | ElementKind::Draw(l) => Some(l),
            _ => None,
        }
    }

    pub fn linear_mut(&mut self) -> Option<&mut LinearData> {
        match &mut self.kind {
            ElementKind::Line(l) | ElementKind::Arrow(l) | ElementKind::Draw(l) => Some(l),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextData> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_linear(&self) -> bool {
        self.linear().is_some()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    pub fn is_freedraw(&self) -> bool {
        matches!(self.kind, ElementKind::Draw(_))
    }

    /// Shapes a connector may anchor to.
    pub fn is_bindable(&self) -> bool {
        !self.is_deleted
            && matches!(
                self.kind,
                ElementKind::Rectangle(_)
                    | ElementKind::Ellipse(_)
                    | ElementKind::Diamond(_)
                    | ElementKind::Text(_)
            )
    }

    /// Connectors whose endpoints may bind. Freehand strokes never bind.
    pub fn is_binding_element(&self) -> bool {
        matches!(self.kind, ElementKind::Line(_) | ElementKind::Arrow(_))
    }

    /// Linear elements bound to this shape. Empty for kinds that can't be bound to.
    pub fn bound_elements(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::Rectangle(s) | ElementKind::Ellipse(s) | ElementKind::Diamond(s) => {
                &s.bound_elements
            }
            ElementKind::Text(t) => &t.bound_elements,
            _ => &[],
        }
    }

    pub fn bound_elements_mut(&mut self) -> Option<&mut Vec<ElementId>> {
        match &mut self.kind {
            ElementKind::Rectangle(s) | ElementKind::Ellipse(s) | ElementKind::Diamond(s) => {
                Some(&mut s.bound_elements)
            }
            ElementKind::Text(t) => Some(&mut t.bound_elements),
            _ => None,
        }
    }
}

/// A drawable object. See the module docs for the mutation contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    id: ElementId,
    version: u32,
    version_nonce: u32,
    #[serde(flatten)]
    data: ElementData,
}

impl Deref for Element {
    type Target = ElementData;

    fn deref(&self) -> &ElementData {
        &self.data
    }
}

impl Element {
    /// Wrap a body under a fresh identity.
    pub fn from_data(data: ElementData) -> Self {
        Self {
            id: ElementId::new(),
            version: 1,
            version_nonce: rand::random(),
            data,
        }
    }

    /// Same as [`Element::from_data`] with a caller-chosen id.
    pub fn with_id(id: ElementId, data: ElementData) -> Self {
        Self {
            id,
            version: 1,
            version_nonce: rand::random(),
            data,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn version_nonce(&self) -> u32 {
        self.version_nonce
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    /// The single mutation entry point. Always bumps `version` and draws a new nonce.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut ElementData) -> R) -> R {
        let result = f(&mut self.data);
        self.version = self.version.wrapping_add(1);
        self.version_nonce = rand::random();
        result
    }

    /// Take over a historical body while keeping the version monotonic.
    pub fn revert_to(&mut self, snapshot: &Element) {
        let floor = self.version.max(snapshot.version);
        self.data = snapshot.data.clone();
        self.version = floor.wrapping_add(1);
        self.version_nonce = rand::random();
    }

    /// Copy with an adjusted body but unchanged version, for history snapshots only.
    pub(crate) fn snapshot_with(&self, f: impl FnOnce(&mut ElementData)) -> Element {
        let mut copy = self.clone();
        f(&mut copy.data);
        copy
    }

    /// Structural equality ignoring version bookkeeping.
    pub fn same_content(&self, other: &Element) -> bool {
        self.id == other.id && self.data == other.data
    }
}

// ============================================================================
// Constructors
// ============================================================================

fn base_data(kind: ElementKind, x: f32, y: f32, style: ElementStyle) -> ElementData {
    ElementData {
        x,
        y,
        width: 0.0,
        height: 0.0,
        angle: 0.0,
        style,
        group_ids: Vec::new(),
        seed: rand::random(),
        is_deleted: false,
        kind,
    }
}

/// New generic shape (rectangle, ellipse, diamond) or marquee at `(x, y)` with zero size.
pub fn new_element(element_type: ElementType, x: f32, y: f32, style: ElementStyle) -> Element {
    let kind = match element_type {
        ElementType::Ellipse => ElementKind::Ellipse(ShapeData::default()),
        ElementType::Diamond => ElementKind::Diamond(ShapeData::default()),
        ElementType::Selection => ElementKind::Selection,
        ElementType::Arrow | ElementType::Line | ElementType::Draw => {
            return new_linear_element(element_type, x, y, style, None, None);
        }
        ElementType::Text => ElementKind::Text(TextData::default()),
        ElementType::Rectangle => ElementKind::Rectangle(ShapeData::default()),
    };
    Element::from_data(base_data(kind, x, y, style))
}

/// New linear element with no points yet.
pub fn new_linear_element(
    element_type: ElementType,
    x: f32,
    y: f32,
    style: ElementStyle,
    start_arrowhead: Option<Arrowhead>,
    end_arrowhead: Option<Arrowhead>,
) -> Element {
    let data = LinearData {
        start_arrowhead,
        end_arrowhead,
        ..LinearData::default()
    };
    let kind = match element_type {
        ElementType::Arrow => ElementKind::Arrow(data),
        ElementType::Draw => ElementKind::Draw(data),
        _ => ElementKind::Line(data),
    };
    Element::from_data(base_data(kind, x, y, style))
}

/// New text element measured with `measurer`.
pub fn new_text_element(
    x: f32,
    y: f32,
    style: ElementStyle,
    text: TextData,
    measurer: &dyn TextMeasurer,
) -> Element {
    let metrics = measurer.measure(&text.text, text.font_size, text.font_family);
    let mut data = base_data(
        ElementKind::Text(TextData {
            baseline: metrics.baseline,
            ..text
        }),
        x,
        y,
        style,
    );
    data.width = metrics.width;
    data.height = metrics.height;
    Element::from_data(data)
}

// ============================================================================
// Pure helpers
// ============================================================================

/// Positive-size box equivalent to a possibly flipped `(x, y, width, height)`.
pub fn normalized_dimensions(data: &ElementData) -> (f32, f32, f32, f32) {
    if data.is_linear() {
        return (data.x, data.y, data.width, data.height);
    }
    let (mut x, mut y, mut w, mut h) = (data.x, data.y, data.width, data.height);
    if w < 0.0 {
        x += w;
        w = -w;
    }
    if h < 0.0 {
        y += h;
        h = -h;
    }
    (x, y, w, h)
}

/// Apply [`normalized_dimensions`] in place.
pub fn normalize_dimensions(data: &mut ElementData) {
    let (x, y, w, h) = normalized_dimensions(data);
    data.x = x;
    data.y = y;
    data.width = w;
    data.height = h;
}

/// Shift points so the first is `(0, 0)`, moving the origin to compensate,
/// then refresh width/height from the point span.
pub fn normalize_linear_points(data: &mut ElementData) {
    let (dx, dy, span) = {
        let Some(linear) = data.linear_mut() else { return };
        let Some(&first) = linear.points.first() else { return };
        for p in linear.points.iter_mut() {
            *p = *p - first;
        }
        if let Some(c) = linear.last_committed_point.as_mut() {
            *c = *c - first;
        }
        (first.x, first.y, Bounds::from_points(linear.points.iter().copied()))
    };
    data.x += dx;
    data.y += dy;
    data.width = span.width();
    data.height = span.height();
}

/// Elements too small to keep after a create or resize gesture.
pub fn is_invisibly_small(element: &ElementData) -> bool {
    if let Some(linear) = element.linear() {
        if linear.points.len() < 2 {
            return true;
        }
        let span = Bounds::from_points(linear.points.iter().copied());
        return span.width() < INVISIBLY_SMALL_ELEMENT_SIZE
            && span.height() < INVISIBLY_SMALL_ELEMENT_SIZE;
    }
    element.width.abs() < INVISIBLY_SMALL_ELEMENT_SIZE
        && element.height.abs() < INVISIBLY_SMALL_ELEMENT_SIZE
}

/// Group ids for a duplicate: every group below the editing group gets a
/// fresh id (shared across the whole duplication through `group_id_map`).
pub fn new_group_ids_for_duplication(
    group_ids: &[GroupId],
    editing_group_id: Option<&GroupId>,
    group_id_map: &mut HashMap<GroupId, GroupId>,
) -> Vec<GroupId> {
    let end = editing_group_id
        .and_then(|g| group_ids.iter().position(|id| id == g))
        .unwrap_or(group_ids.len());
    group_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            if i < end {
                group_id_map.entry(id.clone()).or_default().clone()
            } else {
                id.clone()
            }
        })
        .collect()
}

/// Deep copy under a fresh id and seed, translated by `offset`.
///
/// Binding fields are copied verbatim; callers run the duplication fix-up afterwards.
pub fn duplicate_element(
    editing_group_id: Option<&GroupId>,
    group_id_map: &mut HashMap<GroupId, GroupId>,
    element: &Element,
    offset: Point,
) -> Element {
    let mut data = element.data.clone();
    data.seed = rand::random();
    data.group_ids = new_group_ids_for_duplication(&element.group_ids, editing_group_id, group_id_map);
    data.x += offset.x;
    data.y += offset.y;
    Element::from_data(data)
}
