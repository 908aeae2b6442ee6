//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::display::format_backup_list;
use crate::error::JournalResult;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the diary now
    Create,

    /// List timestamped backups, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore the diary from a backup
    Recover {
        /// Backup timestamp (YYYYMMDD_HHMMSS); defaults to the latest snapshot
        #[arg(short, long)]
        timestamp: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(storage: &Storage, cmd: BackupCommands) -> JournalResult<()> {
    match cmd {
        BackupCommands::Create => match storage.backup()? {
            Some(snapshot) => {
                println!("Backup created: {}", snapshot.timestamped.display());
                if !snapshot.pruned.is_empty() {
                    println!("Pruned {} old backup(s).", snapshot.pruned.len());
                }
            }
            None => println!("Nothing to back up yet."),
        },

        BackupCommands::List { verbose } => {
            let backups = storage.list_backups()?;
            println!("{}", format_backup_list(&backups, verbose));
            if backups.is_empty() {
                println!("Create one with: cropjournal backup create");
            }
        }

        BackupCommands::Recover { timestamp, force } => {
            if !force {
                let source = timestamp.as_deref().unwrap_or("the latest snapshot");
                println!("WARNING: This replaces the current diary with {}.", source);
                println!("The current file is kept as a .corrupted_<timestamp> archive.");
                println!("To proceed, run again with --force");
                return Ok(());
            }

            let result = storage.recover(timestamp.as_deref())?;
            println!("{}", result.summary());
        }
    }

    Ok(())
}
