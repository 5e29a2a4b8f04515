use crate::application::ports::{Notification, NotificationLevel, Notifier};

/// Renders toasts as log lines under the `nhatky::toast` target.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = notification.message.as_str();
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(target: "nhatky::toast", level = "success", "{message}")
            }
            NotificationLevel::Info => tracing::info!(target: "nhatky::toast", "{message}"),
            NotificationLevel::Warning => tracing::warn!(target: "nhatky::toast", "{message}"),
            NotificationLevel::Error => tracing::error!(target: "nhatky::toast", "{message}"),
        }
    }
}
