//! Spatial Index Module
//!
//! R-tree over element bounds used as a broad phase for hit testing. The
//! exact shape tests in `element::hit_test` only run on the candidates the
//! tree returns, which keeps pointer-down and hover cheap on large scenes.

use crate::element::{element_bounds, hit_test, Element, ElementId};
use crate::geometry::{Bounds, Point};
use crate::constants::{BOUNDING_BOX_HIT_PADDING, SHAPE_HIT_TOLERANCE};
use crate::perf::profile_scope;
use rstar::{RTree, RTreeObject, AABB};

/// One live element's box plus its z-index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub id: ElementId,
    pub z: usize,
    pub bounds: Bounds,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min_x, self.bounds.min_y],
            [self.bounds.max_x, self.bounds.max_y],
        )
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// R-tree of element bounds.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    /// Widest stroke in the index, added to the query slack
    max_stroke: f32,
    len: usize,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the scene sequence. Tombstones are skipped; z is the scene position.
    pub fn from_elements(elements: &[Element]) -> Self {
        profile_scope!("spatial_index_build");
        let mut max_stroke = 0.0f32;
        let entries: Vec<SpatialEntry> = elements
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.is_deleted)
            .map(|(z, el)| {
                max_stroke = max_stroke.max(el.style.stroke_width);
                SpatialEntry {
                    id: el.id().clone(),
                    z,
                    bounds: element_bounds(el),
                }
            })
            .collect();
        let len = entries.len();
        Self {
            tree: RTree::bulk_load(entries),
            max_stroke,
            len,
        }
    }

    /// Candidates whose box is within `slack` of `p`, bottom to top.
    pub fn query_point(&self, p: Point, slack: f32) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners([p.x - slack, p.y - slack], [p.x + slack, p.y + slack]);
        let mut hits: Vec<&SpatialEntry> = self.tree.locate_in_envelope_intersecting(&envelope).collect();
        hits.sort_by_key(|e| e.z);
        hits
    }

    /// Entries whose box intersects `area`, bottom to top.
    pub fn query_rect(&self, area: Bounds) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners([area.min_x, area.min_y], [area.max_x, area.max_y]);
        let mut hits: Vec<&SpatialEntry> = self.tree.locate_in_envelope_intersecting(&envelope).collect();
        hits.sort_by_key(|e| e.z);
        hits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_stroke(&self) -> f32 {
        self.max_stroke
    }
}

/// Cached index that is rebuilt whenever the scene revision moves.
#[derive(Default)]
pub struct HitTester {
    index: SpatialIndex,
    revision: Option<u64>,
}

impl HitTester {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, elements: &[Element], revision: u64) {
        if self.revision != Some(revision) {
            self.index = SpatialIndex::from_elements(elements);
            self.revision = Some(revision);
        }
    }

    pub fn invalidate(&mut self) {
        self.revision = None;
    }

    /// Every live element hit at `p`, bottom to top. Selected elements also hit on their padded box.
    pub fn elements_at(
        &mut self,
        elements: &[Element],
        revision: u64,
        p: Point,
        zoom: f32,
        is_selected: impl Fn(&ElementId) -> bool,
    ) -> Vec<ElementId> {
        profile_scope!("hit_test_elements_at");
        self.ensure(elements, revision);
        let zoom = zoom.max(f32::EPSILON);
        let slack = (BOUNDING_BOX_HIT_PADDING + SHAPE_HIT_TOLERANCE) / zoom + self.index.max_stroke();
        self.index
            .query_point(p, slack)
            .into_iter()
            .filter_map(|entry| elements.get(entry.z).filter(|el| el.id() == &entry.id))
            .filter(|el| hit_test(el, is_selected(el.id()), p, zoom))
            .map(|el| el.id().clone())
            .collect()
    }

    /// Live elements whose box intersects `area`, bottom to top.
    pub fn elements_in(&mut self, elements: &[Element], revision: u64, area: Bounds) -> Vec<ElementId> {
        self.ensure(elements, revision);
        self.index
            .query_rect(area)
            .into_iter()
            .map(|entry| entry.id.clone())
            .collect()
    }

    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }
}
