use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENTRIES_SLOT: &str = "timeline_entries";
pub const PENDING_CHANGES_SLOT: &str = "pending_changes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub owner_id: String,
    pub connect_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Drain the queue on every offline→online transition.
    pub auto_sync: bool,
    /// Route edits made while offline through the queue instead of the remote.
    pub queue_offline_edits: bool,
    pub probe_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub entries_slot: String,
    pub queue_slot: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            database: DatabaseConfig {
                url: database_url_for(&data_dir),
                max_connections: 5,
            },
            remote: RemoteConfig {
                base_url: "http://localhost:3000".to_string(),
                owner_id: String::new(),
                connect_timeout: 10,
            },
            sync: SyncConfig {
                auto_sync: true,
                queue_offline_edits: false,
                probe_interval: 15,
            },
            storage: StorageConfig {
                data_dir: data_dir.to_string_lossy().into_owned(),
                entries_slot: ENTRIES_SLOT.to_string(),
                queue_slot: PENDING_CHANGES_SLOT.to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("NHATKY_DATA_DIR") {
            let dir = v.trim();
            if !dir.is_empty() {
                cfg.storage.data_dir = dir.to_string();
                cfg.database.url = database_url_for(&PathBuf::from(dir));
            }
        }
        if let Ok(v) = std::env::var("NHATKY_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("NHATKY_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.remote.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = std::env::var("NHATKY_OWNER_ID") {
            cfg.remote.owner_id = v.trim().to_string();
        }
        if let Some(value) = std::env::var("NHATKY_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| parse_u64(&v))
        {
            cfg.remote.connect_timeout = value.max(1);
        }
        if let Ok(v) = std::env::var("NHATKY_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("NHATKY_QUEUE_OFFLINE_EDITS") {
            cfg.sync.queue_offline_edits = parse_bool(&v, cfg.sync.queue_offline_edits);
        }
        if let Some(value) = std::env::var("NHATKY_PROBE_INTERVAL_SECS")
            .ok()
            .and_then(|v| parse_u64(&v))
        {
            cfg.sync.probe_interval = value.max(1);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if !self.remote.base_url.starts_with("http://")
            && !self.remote.base_url.starts_with("https://")
        {
            return Err(format!(
                "Remote base_url must be an http(s) URL, got {:?}",
                self.remote.base_url
            ));
        }
        if self.remote.owner_id.trim().is_empty() {
            return Err("Remote owner_id is required (set NHATKY_OWNER_ID)".to_string());
        }
        if self.sync.probe_interval == 0 {
            return Err("Sync probe_interval must be greater than 0".to_string());
        }
        if self.storage.entries_slot == self.storage.queue_slot {
            return Err("Entry cache and pending queue must use different slots".to_string());
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nhatky")
}

fn database_url_for(data_dir: &std::path::Path) -> String {
    format!("sqlite:{}?mode=rwc", data_dir.join("nhatky.db").display())
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
