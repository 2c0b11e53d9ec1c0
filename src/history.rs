//! Undo/redo snapshot history.
//!
//! Recording is armed explicitly (`resume_recording`) by whatever produced a
//! user-visible change, and consumed by one `record` call at the end of the
//! event. Everything in between coalesces into a single entry.
//!
//! # Stacks
//!
//! ```text
//!   state_history: [baseline, e1, e2, e3]   <- top is the current state
//!   redo_stack:    [e5, e4]                 <- top is the next redo
//! ```
//!
//! Undo moves the top of `state_history` to `redo_stack` and returns the new
//! top. The baseline is never popped.

use crate::app_state::{AppState, HistoryAppState};
use crate::element::Element;
use serde::Serialize;

/// Deep copy of the scene plus the history-relevant app state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub app_state: HistoryAppState,
    pub elements: Vec<Element>,
}

#[derive(Debug, Default)]
pub struct History {
    state_history: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    last_entry: Option<HistoryEntry>,
    recording: bool,
}

impl History {
    pub fn new() -> Self {
        Self {
            recording: true,
            ..Self::default()
        }
    }

    pub fn resume_recording(&mut self) {
        self.recording = true;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Push one entry if armed, then disarm. Returns whether an entry was pushed.
    pub fn record(&mut self, state: &AppState, elements: &[Element]) -> bool {
        if !self.recording {
            return false;
        }
        self.recording = false;
        self.push_entry(state, elements)
    }

    fn push_entry(&mut self, state: &AppState, elements: &[Element]) -> bool {
        let entry = generate_entry(state, elements);
        if !self.should_create_entry(&entry) {
            return false;
        }
        tracing::trace!(
            elements = entry.elements.len(),
            depth = self.state_history.len() + 1,
            "history entry recorded"
        );
        self.state_history.push(entry.clone());
        self.last_entry = Some(entry);
        self.redo_stack.clear();
        true
    }

    fn should_create_entry(&self, next: &HistoryEntry) -> bool {
        let Some(last) = &self.last_entry else {
            return true;
        };
        if next.elements.len() != last.elements.len() {
            return true;
        }
        let elements_changed = next
            .elements
            .iter()
            .zip(&last.elements)
            .any(|(a, b)| a.id() != b.id() || a.version_nonce() != b.version_nonce());
        if elements_changed {
            return true;
        }
        // selection and tool alone never make an undo step
        next.app_state.editing_group_id != last.app_state.editing_group_id
            || next.app_state.editing_linear_element_id
                != last.app_state.editing_linear_element_id
    }

    /// Resync the comparison baseline without pushing.
    pub fn set_current_state(&mut self, state: &AppState, elements: &[Element]) {
        self.last_entry = Some(generate_entry(state, elements));
    }

    /// Entry to restore, or `None` when only the baseline is left.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.state_history.len() <= 1 {
            return None;
        }
        let current = self.state_history.pop()?;
        self.redo_stack.push(current);
        self.state_history.last().cloned()
    }

    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.state_history.push(entry.clone());
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.state_history.clear();
        self.redo_stack.clear();
        self.last_entry = None;
    }

    pub fn len(&self) -> usize {
        self.state_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state_history.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.state_history.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.state_history
    }
}

/// Snapshot the scene. A multi-point element under construction is stored
/// without its uncommitted trailing point, and dropped while it has one point.
pub fn generate_entry(state: &AppState, elements: &[Element]) -> HistoryEntry {
    let multi = state.multi_element.as_ref();
    let elements = elements
        .iter()
        .filter_map(|el| {
            if Some(el.id()) != multi {
                return Some(el.clone());
            }
            let linear = el.linear()?;
            if linear.points.len() < 2 {
                return None;
            }
            let last = linear.points.last().copied();
            if last == linear.last_committed_point {
                return Some(el.clone());
            }
            Some(el.snapshot_with(|d| {
                if let Some(l) = d.linear_mut() {
                    l.points.pop();
                }
            }))
        })
        .collect();
    HistoryEntry {
        app_state: state.history_subset(),
        elements,
    }
}
