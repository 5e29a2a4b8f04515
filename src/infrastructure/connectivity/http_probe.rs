use crate::application::services::ConnectivityMonitor;
use crate::infrastructure::api::HttpTimelineGateway;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Feeds the [`ConnectivityMonitor`] from periodic health checks against the
/// remote API.
pub struct HttpConnectivityProbe {
    gateway: HttpTimelineGateway,
    monitor: Arc<ConnectivityMonitor>,
    interval: Duration,
}

impl HttpConnectivityProbe {
    pub fn new(
        gateway: HttpTimelineGateway,
        monitor: Arc<ConnectivityMonitor>,
        interval: Duration,
    ) -> Self {
        Self {
            gateway,
            monitor,
            interval,
        }
    }

    /// One health check, reported to the monitor. Returns the observed status.
    pub async fn check(&self) -> bool {
        let online = self.gateway.probe().await;
        tracing::trace!(online, base_url = %self.gateway.base_url(), "Connectivity probed");
        self.monitor.set_online(online);
        online
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.check().await;
            }
        })
    }
}
