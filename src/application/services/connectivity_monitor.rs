use crate::application::ports::{
    ConnectivityEvent, ConnectivityProvider, Notification, Notifier,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Single source of truth for the online/offline signal.
///
/// The platform shell reports what it observes through [`set_online`]; only
/// actual changes count as transitions. Each transition notifies the user and
/// is delivered to every subscriber.
///
/// [`set_online`]: ConnectivityMonitor::set_online
pub struct ConnectivityMonitor {
    online: AtomicBool,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ConnectivityEvent>>>,
    notifier: Arc<dyn Notifier>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool, notifier: Arc<dyn Notifier>) -> Self {
        tracing::debug!(online = initially_online, "Connectivity monitor initialized");
        Self {
            online: AtomicBool::new(initially_online),
            subscribers: Mutex::new(Vec::new()),
            notifier,
        }
    }

    /// Returns the transition, if the status actually changed.
    pub fn set_online(&self, online: bool) -> Option<ConnectivityEvent> {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return None;
        }

        let event = if online {
            tracing::info!("Connection restored");
            self.notifier.notify(Notification::info(
                "Đã kết nối lại. Dữ liệu sẽ được đồng bộ.",
            ));
            ConnectivityEvent::Online
        } else {
            tracing::warn!("Connection lost, switching to offline mode");
            self.notifier.notify(Notification::warning(
                "Đang ngoại tuyến. Thay đổi sẽ được lưu trên thiết bị.",
            ));
            ConnectivityEvent::Offline
        };

        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|tx| tx.send(event).is_ok());
        Some(event)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Drops every subscriber so listeners see their channel close.
    pub fn close(&self) {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl ConnectivityProvider for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ConnectivityEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        rx
    }
}
