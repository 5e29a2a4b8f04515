use crate::domain::entities::{EntryDetails, EntryFilter};
use crate::domain::value_objects::{EntryId, PerformedDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nhatky")]
#[command(about = "Offline-first farm activity timeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Treat the device as offline for this session
    #[arg(long, global = true, env = "NHATKY_OFFLINE")]
    pub offline: bool,

    /// Keep the queue and cache in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true, env = "JSON_LOGS")]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show entries matching the filters with their cost summary
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a new activity
    Add(AddArgs),
    /// Replace an entry with the JSON object in a file
    Edit {
        #[arg(long)]
        from_json: PathBuf,
    },
    /// Delete an entry
    Delete { id: EntryId },
    /// Replay queued changes now
    Sync,
    /// Show changes waiting for the next sync
    Queue,
    /// Write the filtered entries to a CSV file
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Defaults to nhat-ky-<today>.csv in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Keep probing connectivity and sync on every reconnect
    Watch,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text search
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub season: Option<String>,
    /// Inclusive lower bound (dd/mm/yyyy)
    #[arg(long)]
    pub from: Option<PerformedDate>,
    /// Inclusive upper bound (dd/mm/yyyy)
    #[arg(long)]
    pub to: Option<PerformedDate>,
}

impl From<FilterArgs> for EntryFilter {
    fn from(args: FilterArgs) -> Self {
        EntryFilter {
            search_term: args.search,
            season_id: args.season,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Read the whole form from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["activity", "stage_id", "season_id", "date"])]
    pub from_json: Option<PathBuf>,
    #[arg(long, required_unless_present = "from_json")]
    pub activity: Option<String>,
    #[arg(long, required_unless_present = "from_json")]
    pub stage_id: Option<String>,
    #[arg(long)]
    pub stage_name: Option<String>,
    #[arg(long, required_unless_present = "from_json")]
    pub season_id: Option<String>,
    #[arg(long)]
    pub season_name: Option<String>,
    /// Day the work was done (dd/mm/yyyy)
    #[arg(long, required_unless_present = "from_json")]
    pub date: Option<PerformedDate>,
    #[arg(long, default_value_t = 0.0)]
    pub labor_cost: f64,
    #[arg(long, default_value_t = 0.0)]
    pub material_cost: f64,
    #[arg(long)]
    pub quantity: Option<f64>,
    #[arg(long)]
    pub quantity_unit: Option<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddArgs {
    /// Builds the form from flags. `None` when `--from-json` was given.
    pub fn to_details(&self) -> Option<EntryDetails> {
        Some(EntryDetails {
            activity_name: self.activity.clone()?,
            stage_id: self.stage_id.clone()?,
            stage_name: self.stage_name.clone().unwrap_or_default(),
            season_id: self.season_id.clone()?,
            season_name: self.season_name.clone(),
            performed_date: self.date?,
            labor_cost: self.labor_cost,
            material_cost: self.material_cost,
            quantity: self.quantity,
            quantity_unit: self.quantity_unit.clone(),
            notes: self.notes.clone(),
            images: Vec::new(),
            agrochemicals: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_flags() {
        let cli = Cli::try_parse_from([
            "nhatky",
            "--offline",
            "add",
            "--activity",
            "Bón phân",
            "--stage-id",
            "st-2",
            "--season-id",
            "s1",
            "--date",
            "05/03/2024",
            "--labor-cost",
            "150000",
        ])
        .unwrap();

        assert!(cli.offline);
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        let details = args.to_details().unwrap();
        assert_eq!(details.activity_name, "Bón phân");
        assert_eq!(details.performed_date.to_string(), "05/03/2024");
        assert_eq!(details.labor_cost, 150000.0);
    }

    #[test]
    fn add_requires_fields_without_json() {
        assert!(Cli::try_parse_from(["nhatky", "add", "--activity", "x"]).is_err());
        assert!(Cli::try_parse_from(["nhatky", "add", "--from-json", "form.json"]).is_ok());
    }

    #[test]
    fn filter_flags_map_to_entry_filter() {
        let cli = Cli::try_parse_from([
            "nhatky", "list", "--search", "phân", "--from", "01/03/2024", "--to", "31/03/2024",
        ])
        .unwrap();
        let Commands::List { filter, .. } = cli.command else {
            panic!("expected list");
        };
        let filter = EntryFilter::from(filter);
        assert_eq!(filter.search_term.as_deref(), Some("phân"));
        assert!(filter.date_from.is_some() && filter.date_to.is_some());
        assert!(filter.season_id.is_none());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["nhatky", "list", "--from", "2024/99/99"]).is_err());
    }
}
