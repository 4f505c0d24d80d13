use std::collections::{HashMap, HashSet};

/// A local attendance mutation awaiting server confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChange {
    Join,
    Cancel,
}

/// Optimistic attendance state, layered over the last confirmed fetch.
///
/// Pending entries are tagged so a hopeful local value is never mistaken
/// for a confirmed one; the reconciling refetch clears the whole overlay
/// because the fetched collection supersedes every pending edit.
#[derive(Debug, Default)]
pub struct AttendanceOverlay {
    pending: HashMap<String, PendingChange>,
}

impl AttendanceOverlay {
    pub fn mark_join(&mut self, event_id: &str) {
        self.pending
            .insert(event_id.to_string(), PendingChange::Join);
    }

    pub fn mark_cancel(&mut self, event_id: &str) {
        self.pending
            .insert(event_id.to_string(), PendingChange::Cancel);
    }

    /// Roll back one optimistic edit after the server rejected it.
    pub fn revert(&mut self, event_id: &str) {
        self.pending.remove(event_id);
    }

    /// Authoritative data arrived; nothing is pending anymore.
    pub fn confirm_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_for(&self, event_id: &str) -> Option<PendingChange> {
        self.pending.get(event_id).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The joined set as it should render right now: the confirmed set
    /// with pending joins added and pending cancels removed.
    pub fn joined_view(&self, confirmed: &HashSet<String>) -> HashSet<String> {
        let mut view = confirmed.clone();
        for (event_id, change) in &self.pending {
            match change {
                PendingChange::Join => {
                    view.insert(event_id.clone());
                }
                PendingChange::Cancel => {
                    view.remove(event_id);
                }
            }
        }
        view
    }
}
