use anyhow::Result;
use clap::{Parser, Subcommand};
use navstate::cli::{self, InspectMode};
use navstate::{util, Config, Database, SavedStateStore};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Inspect saved navigation state
#[derive(Debug, Parser)]
#[command(name = "navstate", version)]
struct Cli {
    /// Use a different data directory (default ~/.navstate)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List saved slots
    Slots,
    /// Show the records stored in a slot
    Inspect {
        /// Slot name (defaults to the configured slot)
        slot: Option<String>,
        /// Print each record as raw JSON
        #[arg(long, conflicts_with = "restore")]
        json: bool,
        /// Rebuild the slot using the configured `on_decode_error` policy
        #[arg(long)]
        restore: bool,
    },
    /// Delete a slot
    Drop { slot: String },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    util::init_data_dir(args.data_dir);
    let config = Config::load();

    // Initialize logging to file (~/.navstate/logs/navstate.log)
    let log_path = util::log_file_path();
    if let Some(logs_dir) = log_path.parent() {
        fs::create_dir_all(logs_dir)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let db = Database::open(config.database_path.clone())?;
    let store = SavedStateStore::new(db.connection());

    let lines = match args.command {
        Command::Slots => cli::list_slots(&store)?,
        Command::Inspect {
            slot,
            json,
            restore,
        } => {
            let mode = if json {
                InspectMode::Json
            } else if restore {
                InspectMode::Restore(config.restore_policy)
            } else {
                InspectMode::Summary
            };
            let slot = slot.unwrap_or(config.default_slot);
            cli::inspect_slot(&store, &slot, mode)?
        }
        Command::Drop { slot } => vec![cli::drop_slot(&store, &slot)?],
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}
