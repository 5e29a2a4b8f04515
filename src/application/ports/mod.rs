pub mod connectivity;
pub mod notifier;
pub mod slot_store;
pub mod timeline_gateway;

pub use connectivity::{ConnectivityEvent, ConnectivityProvider};
pub use notifier::{Notification, NotificationLevel, Notifier};
pub use slot_store::LocalSlotStore;
pub use timeline_gateway::TimelineGateway;
