use crate::domain::entities::{EntryDetails, TimelineEntry};
use crate::domain::value_objects::EntryId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an offline `add`: the form contents plus the id the entry was
/// given locally, so the swap to the server id does not depend on matching
/// contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAdd {
    pub local_id: EntryId,
    pub entry: EntryDetails,
}

/// A mutation made while offline, replayed against the remote in queue order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum PendingChange {
    Add(PendingAdd),
    Update(TimelineEntry),
    Delete(EntryId),
}

impl PendingChange {
    pub fn add(local_id: EntryId, entry: EntryDetails) -> Self {
        PendingChange::Add(PendingAdd { local_id, entry })
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            PendingChange::Add(_) => ChangeKind::Add,
            PendingChange::Update(_) => ChangeKind::Update,
            PendingChange::Delete(_) => ChangeKind::Delete,
        }
    }

    /// Id of the entry this change targets.
    pub fn target_id(&self) -> &EntryId {
        match self {
            PendingChange::Add(add) => &add.local_id,
            PendingChange::Update(entry) => &entry.id,
            PendingChange::Delete(id) => id,
        }
    }

    /// Rewrites a local target id through `mapping` once its `add` has been
    /// accepted by the server.
    pub fn remapped(self, mapping: &HashMap<EntryId, EntryId>) -> Self {
        match self {
            PendingChange::Update(mut entry) => {
                if let Some(server_id) = mapping.get(&entry.id) {
                    entry.id = server_id.clone();
                }
                PendingChange::Update(entry)
            }
            PendingChange::Delete(id) => {
                PendingChange::Delete(mapping.get(&id).cloned().unwrap_or(id))
            }
            add @ PendingChange::Add(_) => add,
        }
    }
}
