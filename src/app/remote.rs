//! Remote element updates from a collaboration host.
//!
//! The host owns the network. It pushes updates through a cloneable
//! [`RemoteUpdateSender`] from any thread; the editor drains the inbox on its
//! own thread between gestures.

use super::Editor;
use crate::app_state::Collaborator;
use crate::element::{Element, ElementId};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RemoteUpdate {
    pub elements: Vec<Element>,
    pub collaborators: Option<HashMap<String, Collaborator>>,
}

#[derive(Debug, Clone)]
pub struct RemoteUpdateSender {
    inbox: Arc<Mutex<VecDeque<RemoteUpdate>>>,
}

impl RemoteUpdateSender {
    pub fn send(&self, update: RemoteUpdate) {
        self.inbox.lock().push_back(update);
    }

    pub fn pending(&self) -> usize {
        self.inbox.lock().len()
    }
}

/// Merge `remote` into `local` by id. The higher version wins, a tie goes to
/// the lower nonce, and `protected` (the element under local edit) always
/// keeps its local copy. Unknown remote elements are appended on top.
pub fn reconcile_elements(local: &[Element], remote: Vec<Element>, protected: Option<&ElementId>) -> Vec<Element> {
    let mut merged = local.to_vec();
    let index: HashMap<ElementId, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, el)| (el.id().clone(), i))
        .collect();

    for incoming in remote {
        match index.get(incoming.id()) {
            Some(&i) => {
                let current = &merged[i];
                if Some(current.id()) == protected {
                    continue;
                }
                let remote_wins = incoming.version() > current.version()
                    || (incoming.version() == current.version()
                        && incoming.version_nonce() < current.version_nonce());
                if remote_wins {
                    merged[i] = incoming;
                }
            }
            None => merged.push(incoming),
        }
    }
    merged
}

impl Editor {
    /// Handle for pushing remote updates from another thread.
    pub fn remote_sender(&self) -> RemoteUpdateSender {
        RemoteUpdateSender {
            inbox: Arc::clone(&self.system.remote_inbox),
        }
    }

    /// Apply queued remote updates unless a gesture is open. Returns how many were applied.
    pub(crate) fn drain_remote_updates(&mut self) -> usize {
        if self.interaction.session().is_some() {
            return 0;
        }
        let updates: Vec<RemoteUpdate> = self.system.remote_inbox.lock().drain(..).collect();
        if updates.is_empty() {
            return 0;
        }
        let count = updates.len();
        for update in updates {
            if let Some(collaborators) = update.collaborators {
                self.state.collaborators = collaborators;
            }
            if update.elements.is_empty() {
                continue;
            }
            let merged = reconcile_elements(
                self.scene.elements_including_deleted(),
                update.elements,
                self.state.editing_element.as_ref(),
            );
            self.scene.replace_all_elements(merged);
        }
        let scene = &self.scene;
        self.state.retain_selection(|id| scene.get_live_element(id).is_some());
        self.history
            .set_current_state(&self.state, self.scene.elements_including_deleted());
        tracing::debug!(count, "applied remote updates");
        count
    }
}
