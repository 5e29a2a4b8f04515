use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Process-wide online/offline signal.
pub trait ConnectivityProvider: Send + Sync {
    fn is_online(&self) -> bool;
    /// Every transition from now on, in order.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ConnectivityEvent>;
}
