use nhatky_lib::application::ports::{Notification, NotificationLevel, Notifier};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.all().into_iter().map(|n| n.level).collect()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.levels().into_iter().filter(|l| *l == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
