//! Scene - the ordered element store.
//!
//! Order is z-order (index 0 is at the bottom). Tombstoned elements stay in
//! the sequence so remote reconciliation and undo can still see them.

use crate::element::{Element, ElementData, ElementId};
use std::collections::{HashMap, HashSet};

pub type SceneCallback = Box<dyn FnMut(&[Element])>;

/// Handle returned by [`Scene::add_callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

#[derive(Default)]
pub struct Scene {
    elements: Vec<Element>,
    index: HashMap<ElementId, usize>,
    callbacks: Vec<(CallbackId, SceneCallback)>,
    next_callback_id: u64,
    revision: u64,
    hold_depth: u32,
    dirty: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live elements, bottom to top.
    pub fn elements(&self) -> Vec<&Element> {
        self.elements.iter().filter(|el| !el.is_deleted).collect()
    }

    pub fn elements_including_deleted(&self) -> &[Element] {
        &self.elements
    }

    pub fn get_element(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    /// Like [`Scene::get_element`], but tombstones count as absent.
    pub fn get_live_element(&self, id: &ElementId) -> Option<&Element> {
        self.get_element(id).filter(|el| !el.is_deleted)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index.contains_key(id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Swap in a new sequence. Duplicate ids keep their first occurrence.
    pub fn replace_all_elements(&mut self, next: Vec<Element>) {
        let mut seen = HashSet::with_capacity(next.len());
        let mut elements = Vec::with_capacity(next.len());
        for el in next {
            if seen.insert(el.id().clone()) {
                elements.push(el);
            } else {
                tracing::warn!(id = %el.id(), "duplicate element id dropped from scene");
            }
        }
        self.index = elements
            .iter()
            .enumerate()
            .map(|(i, el)| (el.id().clone(), i))
            .collect();
        self.elements = elements;
        self.notify();
    }

    /// Mutate one element through its version-bumping entry point.
    /// Returns `None` if the id is unknown.
    pub fn mutate_element<R>(&mut self, id: &ElementId, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        let i = *self.index.get(id)?;
        let result = self.elements[i].mutate(f);
        self.notify();
        Some(result)
    }

    pub fn add_callback(&mut self, cb: SceneCallback) -> CallbackId {
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        self.callbacks.push((id, cb));
        id
    }

    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        before != self.callbacks.len()
    }

    /// Mark the scene changed and run callbacks, or defer them while held.
    pub fn notify(&mut self) {
        self.revision += 1;
        if self.hold_depth > 0 {
            self.dirty = true;
            return;
        }
        self.fire();
    }

    /// Defer callbacks until the matching [`Scene::release_notifications`].
    pub fn hold_notifications(&mut self) {
        self.hold_depth += 1;
    }

    /// Returns whether anything changed while held. Fires callbacks once if so.
    pub fn release_notifications(&mut self) -> bool {
        self.hold_depth = self.hold_depth.saturating_sub(1);
        if self.hold_depth > 0 || !self.dirty {
            return false;
        }
        self.dirty = false;
        self.fire();
        true
    }

    fn fire(&mut self) {
        let elements = &self.elements;
        for (_, cb) in self.callbacks.iter_mut() {
            cb(elements);
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("elements", &self.elements.len())
            .field("revision", &self.revision)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
