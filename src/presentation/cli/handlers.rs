use crate::application::services::{csv_export, Delivery, SyncOutcome};
use crate::domain::entities::{CostSummary, EntryDetails, EntryFilter, TimelineEntry};
use crate::domain::value_objects::EntryId;
use crate::presentation::cli::args::{AddArgs, Commands, FilterArgs};
use crate::state::AppState;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub struct CliHandler {
    state: AppState,
}

impl CliHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn handle(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Watch => return self.watch().await,
            Commands::Sync => return self.sync().await,
            _ => {}
        }

        self.state.timeline.load().await?;
        match command {
            Commands::List { filter, json } => self.list(filter, json).await,
            Commands::Add(args) => self.add(args).await,
            Commands::Edit { from_json } => self.edit(&from_json).await,
            Commands::Delete { id } => self.delete(&id).await,
            Commands::Queue => self.queue().await,
            Commands::Export { filter, output } => self.export(filter, output).await,
            Commands::Sync | Commands::Watch => Ok(()),
        }
    }

    async fn list(&self, filter: FilterArgs, json: bool) -> Result<()> {
        let filter = EntryFilter::from(filter);
        let entries = self.state.timeline.filtered(&filter).await;

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        for entry in &entries {
            println!("{}", format_entry_line(entry));
        }
        println!("{}", format_summary(&CostSummary::from_entries(&entries)));
        if self.state.timeline.has_unsynced_changes().await {
            println!("(có thay đổi chưa đồng bộ)");
        }
        Ok(())
    }

    async fn add(&self, args: AddArgs) -> Result<()> {
        let details = match &args.from_json {
            Some(path) => read_json::<EntryDetails>(path).await?,
            None => args
                .to_details()
                .ok_or_else(|| anyhow!("missing required activity fields"))?,
        };

        let (entry, delivery) = self.state.timeline.add(details).await?;
        println!("{} {}", delivery_label(delivery), entry.id);
        Ok(())
    }

    async fn edit(&self, path: &Path) -> Result<()> {
        let entry: TimelineEntry = read_json(path).await?;
        let (entry, delivery) = self.state.timeline.edit(entry).await?;
        println!("{} {}", delivery_label(delivery), entry.id);
        Ok(())
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let delivery = self.state.timeline.delete(id).await?;
        println!("{} {}", delivery_label(delivery), id);
        Ok(())
    }

    async fn queue(&self) -> Result<()> {
        let pending = self.state.timeline.pending_changes().await;
        println!("{}", serde_json::to_string_pretty(&pending)?);
        Ok(())
    }

    async fn export(&self, filter: FilterArgs, output: Option<PathBuf>) -> Result<()> {
        let filter = EntryFilter::from(filter);
        let csv = self.state.timeline.export_csv(&filter).await;
        let path = output.unwrap_or_else(|| {
            PathBuf::from(csv_export::default_file_name(
                chrono::Local::now().date_naive(),
            ))
        });
        csv_export::write_csv_file(&path, &csv).await?;
        println!("{}", path.display());
        Ok(())
    }

    async fn sync(&self) -> Result<()> {
        if !self.state.is_online() {
            return Err(anyhow!("cannot sync while offline"));
        }
        self.state.timeline.load().await?;
        let outcome = self.state.sync.sync_now().await?;
        println!("{}", describe_outcome(&outcome));
        match outcome {
            SyncOutcome::Failed { error, .. } => Err(anyhow!(error)),
            _ => Ok(()),
        }
    }

    async fn watch(&self) -> Result<()> {
        self.state.timeline.load().await?;
        let listener = self.state.spawn_reconnect_listener();
        let probe = self.state.spawn_probe();

        if self.state.is_online() && self.state.config.sync.auto_sync {
            let outcome = self.state.sync.sync_now().await?;
            tracing::info!(outcome = %describe_outcome(&outcome), "Startup sync finished");
        }

        tracing::info!("Watching connectivity. Press Ctrl+C to stop.");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down...");

        if let Some(probe) = probe {
            probe.abort();
        }
        self.state.shutdown().await;
        if let Some(listener) = listener {
            let _ = listener.await;
        }
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn delivery_label(delivery: Delivery) -> &'static str {
    match delivery {
        Delivery::Remote => "saved",
        Delivery::Queued => "queued",
    }
}

fn describe_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::NothingToSync => "nothing to sync".to_string(),
        SyncOutcome::Synced { replayed } => format!("synced {replayed} change(s)"),
        SyncOutcome::Failed {
            replayed,
            remaining,
            error,
        } => format!("sync failed after {replayed} change(s), {remaining} left: {error}"),
        SyncOutcome::AlreadyRunning => "sync already running".to_string(),
    }
}

fn format_entry_line(entry: &TimelineEntry) -> String {
    let details = &entry.details;
    let marker = if entry.id.is_local() { "*" } else { " " };
    let uploads = if details.has_pending_uploads() {
        "  (ảnh chờ tải lên)"
    } else {
        ""
    };
    format!(
        "{marker} {:<20} {}  {:<24} {:<16} {:>12.0}{uploads}",
        entry.id.as_str(),
        details.performed_date,
        details.activity_name,
        details.season_label(),
        details.total_cost(),
    )
}

fn format_summary(summary: &CostSummary) -> String {
    format!(
        "{} hoạt động | nhân công {:.0} | vật tư {:.0} | tổng {:.0}",
        summary.entry_count, summary.labor_total, summary.material_total, summary.grand_total
    )
}
