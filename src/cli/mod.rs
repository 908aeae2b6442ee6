//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod advise;
pub mod backup;
pub mod entry;
pub mod export;
pub mod report;

pub use advise::{handle_advise_command, AdviseCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use export::handle_export_command;
pub use report::{
    handle_check_command, handle_log_command, handle_stats_command, handle_validate_command,
};
