use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cropjournal::cli::{
    handle_advise_command, handle_backup_command, handle_check_command, handle_entry_command,
    handle_export_command, handle_log_command, handle_stats_command, handle_validate_command,
    AdviseCommands, BackupCommands, EntryCommands,
};
use cropjournal::display::format_violations;
use cropjournal::export::ExportFormat;
use cropjournal::storage::Storage;
use cropjournal::JournalError;

#[derive(Parser)]
#[command(
    name = "cropjournal",
    version,
    about = "Farm journaling from the command line",
    long_about = "Crop Journal keeps a diary of crop observations in a single JSON \
                  document, with automatic backups, corruption recovery, and \
                  JSON/CSV/YAML export."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Diary entry commands
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Show diary statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Check the diary file's structure
    Validate,

    /// Report on the health of every data file
    Check {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the diary
    Export {
        /// Output format (json, csv, yaml)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file; writes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plant identification and companion-planting helpers
    #[command(subcommand)]
    Advise(AdviseCommands),

    /// Show recent changes from the audit log
    Log {
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show configuration paths and settings
    Config,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = Storage::open()?;

    match run(&storage, cli.command) {
        Ok(code) => Ok(code),
        Err(JournalError::InvalidEntry(errors)) => {
            eprintln!("{}", format_violations(&errors));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn run(storage: &Storage, command: Option<Commands>) -> cropjournal::JournalResult<ExitCode> {
    match command {
        Some(Commands::Entry(cmd)) => handle_entry_command(storage, cmd)?,
        Some(Commands::Stats { json }) => handle_stats_command(storage, json)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(storage, cmd)?,
        Some(Commands::Validate) => {
            if !handle_validate_command(storage) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Check { json }) => {
            if !handle_check_command(storage, json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Export { format, output }) => {
            handle_export_command(storage, format, output)?
        }
        Some(Commands::Advise(cmd)) => handle_advise_command(storage, cmd)?,
        Some(Commands::Log { limit }) => handle_log_command(storage, limit)?,
        Some(Commands::Config) => {
            let paths = storage.paths();
            let settings = storage.settings();
            if !paths.settings_file().exists() {
                settings.save(paths)?;
            }

            println!("Crop Journal Configuration");
            println!("==========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Diary file:      {}", paths.diary_file().display());
            println!("History file:    {}", paths.history_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Backups kept:       {}", settings.backup_retention.keep_count);
            println!("  Cache freshness:    {}s", settings.cache_freshness_secs);
            println!(
                "  Page size:          {} (max {})",
                settings.pagination.default_per_page, settings.pagination.max_per_page
            );
            println!("  Recent window:      {} days", settings.recent_days);
            println!(
                "  Advisor:            {} ({}s timeout)",
                settings.advisor.model,
                settings.advisor.timeout().as_secs()
            );
            if let Some(catalog) = &settings.catalog_file {
                println!("  Crop catalog:       {}", catalog.display());
            }
        }
        None => {
            println!("Crop Journal - farm journaling from the command line");
            println!();
            println!("Run 'cropjournal --help' for usage information.");
            println!("Run 'cropjournal entry add <CROP> <OBSERVATIONS>' to record an entry.");
        }
    }

    Ok(ExitCode::SUCCESS)
}
