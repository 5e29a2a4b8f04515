use async_trait::async_trait;
use nhatky_lib::application::ports::TimelineGateway;
use nhatky_lib::domain::entities::{EntryDetails, TimelineEntry};
use nhatky_lib::domain::value_objects::EntryId;
use nhatky_lib::shared::error::AppError;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List,
    Create(String),
    Update(String),
    Delete(String),
}

/// Parks one mutating call until the test releases it.
#[derive(Default)]
pub struct MutationHold {
    entered: Notify,
    release: Notify,
}

impl MutationHold {
    /// Resolves once the held call has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// In-memory server. Mutating calls can be made to fail from a given call
/// number on, to simulate the connection dropping mid-sync, or held open to
/// act while a sync is in flight.
#[derive(Default)]
pub struct FakeTimelineGateway {
    entries: Mutex<Vec<TimelineEntry>>,
    calls: Mutex<Vec<RemoteCall>>,
    next_id: Mutex<u32>,
    mutations: Mutex<usize>,
    fail_from: Mutex<Option<usize>>,
    fail_list: Mutex<bool>,
    hold: Mutex<Option<Arc<MutationHold>>>,
}

impl FakeTimelineGateway {
    pub fn with_entries(entries: Vec<TimelineEntry>) -> Self {
        let gateway = Self::default();
        *gateway.entries.lock().unwrap() = entries;
        gateway
    }

    pub fn server_entries(&self) -> Vec<TimelineEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != RemoteCall::List)
            .collect()
    }

    /// Mutation number `n` (0-based, counted from now) and every later one fail.
    pub fn fail_mutations_from(&self, n: usize) {
        let done = *self.mutations.lock().unwrap();
        *self.fail_from.lock().unwrap() = Some(done + n);
    }

    pub fn recover(&self) {
        *self.fail_from.lock().unwrap() = None;
        *self.fail_list.lock().unwrap() = false;
    }

    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    /// The next create, update or delete waits until the hold is released.
    pub fn hold_next_mutation(&self) -> Arc<MutationHold> {
        let hold = Arc::new(MutationHold::default());
        *self.hold.lock().unwrap() = Some(hold.clone());
        hold
    }

    async fn wait_if_held(&self) {
        let hold = self.hold.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
    }

    fn record(&self, call: RemoteCall) -> Result<(), AppError> {
        let is_list = call == RemoteCall::List;
        self.calls.lock().unwrap().push(call);
        if is_list {
            if *self.fail_list.lock().unwrap() {
                return Err(AppError::Network("connection refused".to_string()));
            }
            return Ok(());
        }

        let mut mutations = self.mutations.lock().unwrap();
        let index = *mutations;
        *mutations += 1;
        match *self.fail_from.lock().unwrap() {
            Some(from) if index >= from => Err(AppError::Network("connection reset".to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TimelineGateway for FakeTimelineGateway {
    async fn list_entries(&self, _owner_id: &str) -> Result<Vec<TimelineEntry>, AppError> {
        self.record(RemoteCall::List)?;
        Ok(self.server_entries())
    }

    async fn create_entry(
        &self,
        _owner_id: &str,
        details: &EntryDetails,
    ) -> Result<TimelineEntry, AppError> {
        self.wait_if_held().await;
        self.record(RemoteCall::Create(details.activity_name.clone()))?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("srv-{}", *next)
        };
        let created = TimelineEntry::new(EntryId::parse(&id).unwrap(), details.clone());
        self.entries.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_entry(&self, entry: &TimelineEntry) -> Result<TimelineEntry, AppError> {
        self.wait_if_held().await;
        self.record(RemoteCall::Update(entry.id.to_string()))?;
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry.clone();
                Ok(entry.clone())
            }
            None => Err(AppError::NotFound(entry.id.to_string())),
        }
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<(), AppError> {
        self.wait_if_held().await;
        self.record(RemoteCall::Delete(id.to_string()))?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        if entries.len() == before {
            return Err(AppError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
