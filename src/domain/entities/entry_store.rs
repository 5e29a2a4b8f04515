//! In-memory timeline state.
//!
//! Every transition consumes the store and returns the next one; storage and
//! network calls happen in the application services around it.

use crate::domain::entities::{EntryDetails, PendingChange, TimelineEntry};
use crate::domain::value_objects::EntryId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncState {
    #[default]
    Clean,
    /// Changes made offline that the remote has not seen yet, in queue order.
    Dirty(Vec<PendingChange>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryStore {
    entries: Vec<TimelineEntry>,
    state: SyncState,
}

impl EntryStore {
    pub fn new(entries: Vec<TimelineEntry>) -> Self {
        Self {
            entries,
            state: SyncState::Clean,
        }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn pending(&self) -> &[PendingChange] {
        match &self.state {
            SyncState::Clean => &[],
            SyncState::Dirty(pending) => pending,
        }
    }

    pub fn has_unsynced_changes(&self) -> bool {
        matches!(self.state, SyncState::Dirty(_))
    }

    pub fn find(&self, id: &EntryId) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// `local_<millis>`, suffixed when that id is already taken.
    pub fn next_local_id(&self, now: DateTime<Utc>) -> EntryId {
        let base = EntryId::local(now);
        if self.find(&base).is_none() {
            return base;
        }
        (1u32..)
            .map(|n| EntryId::local_with_suffix(now, n))
            .find(|candidate| self.find(candidate).is_none())
            .unwrap_or(base)
    }

    /// Rebuilds the store after a reload. `entries` come from the server or the
    /// local cache; pending changes are laid over them so optimistic edits stay
    /// visible until they are replayed.
    pub fn restore(entries: Vec<TimelineEntry>, pending: Vec<PendingChange>) -> Self {
        let mut store = Self::new(entries);
        for change in &pending {
            store = match change {
                PendingChange::Add(add) if store.find(&add.local_id).is_none() => store
                    .apply_remote_add(TimelineEntry::new(add.local_id.clone(), add.entry.clone())),
                PendingChange::Add(_) => store,
                PendingChange::Update(entry) => store.apply_edit(entry.clone()),
                PendingChange::Delete(id) => store.apply_remote_delete(id),
            };
        }
        store.with_pending(pending)
    }

    /// Restores pending changes read back from durable storage.
    pub fn with_pending(self, pending: Vec<PendingChange>) -> Self {
        Self {
            entries: self.entries,
            state: dirty_or_clean(pending),
        }
    }

    /// Offline add: the entry shows up immediately under `local_id`, and the
    /// returned change carries the untouched form payload.
    pub fn apply_local_add(
        self,
        local_id: EntryId,
        details: EntryDetails,
    ) -> (Self, PendingChange) {
        let change = PendingChange::add(local_id.clone(), details.clone());
        let mut next = self.push_pending(change.clone());
        next.entries.push(TimelineEntry::new(local_id, details));
        (next, change)
    }

    pub fn apply_local_delete(self, id: EntryId) -> (Self, PendingChange) {
        let change = PendingChange::Delete(id.clone());
        let next = self.push_pending(change.clone()).apply_remote_delete(&id);
        (next, change)
    }

    pub fn apply_local_edit(self, entry: TimelineEntry) -> (Self, PendingChange) {
        let change = PendingChange::Update(entry.clone());
        let next = self.push_pending(change.clone()).apply_edit(entry);
        (next, change)
    }

    pub fn apply_remote_add(mut self, entry: TimelineEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn apply_remote_delete(mut self, id: &EntryId) -> Self {
        self.entries.retain(|entry| &entry.id != id);
        self
    }

    /// Replaces the entry with the same id; unknown ids leave the list as is.
    pub fn apply_edit(mut self, entry: TimelineEntry) -> Self {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *slot = entry;
        }
        self
    }

    /// Replaces the optimistic entry created under `local_id` with the entry
    /// the server returned. The position in the list is kept. If the entry was
    /// deleted locally in the meantime it stays gone; the queued delete follows.
    pub fn apply_id_swap(mut self, local_id: &EntryId, server_entry: TimelineEntry) -> Self {
        if let Some(slot) = self.entries.iter_mut().find(|e| &e.id == local_id) {
            *slot = server_entry;
        }
        self
    }

    /// Drops the first `count` pending changes after the remote accepted them.
    pub fn apply_replayed(self, count: usize) -> Self {
        let state = match self.state {
            SyncState::Clean => SyncState::Clean,
            SyncState::Dirty(pending) => {
                dirty_or_clean(pending.into_iter().skip(count).collect())
            }
        };
        Self {
            entries: self.entries,
            state,
        }
    }

    /// Swaps in a fresh list from the server, keeping pending changes laid
    /// over it.
    pub fn apply_refresh(self, entries: Vec<TimelineEntry>) -> Self {
        let pending = match self.state {
            SyncState::Clean => Vec::new(),
            SyncState::Dirty(pending) => pending,
        };
        Self::restore(entries, pending)
    }

    /// Points pending changes at the server ids assigned during a replay.
    pub fn remap_pending(self, mapping: &HashMap<EntryId, EntryId>) -> Self {
        let state = match self.state {
            SyncState::Clean => SyncState::Clean,
            SyncState::Dirty(pending) => SyncState::Dirty(
                pending
                    .into_iter()
                    .map(|change| change.remapped(mapping))
                    .collect(),
            ),
        };
        Self {
            entries: self.entries,
            state,
        }
    }

    fn push_pending(mut self, change: PendingChange) -> Self {
        self.state = match self.state {
            SyncState::Clean => SyncState::Dirty(vec![change]),
            SyncState::Dirty(mut pending) => {
                pending.push(change);
                SyncState::Dirty(pending)
            }
        };
        self
    }
}

fn dirty_or_clean(pending: Vec<PendingChange>) -> SyncState {
    if pending.is_empty() {
        SyncState::Clean
    } else {
        SyncState::Dirty(pending)
    }
}
