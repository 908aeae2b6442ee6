//! Advisor CLI commands
//!
//! Parses plant identification and companion-planting replies saved from
//! the model, and shows the history passed to it as context.

use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;

use crate::advisor::{parse_identified_crops, parse_recommendations, HistoricalContext};
use crate::error::{JournalError, JournalResult};
use crate::storage::Storage;

/// Advisor subcommands
#[derive(Subcommand)]
pub enum AdviseCommands {
    /// Parse an identification reply into a crop list
    Crops {
        /// File holding the reply; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Parse a companion-planting reply
    Recommendations {
        /// File holding the reply; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the farmland history used as context
    History,
}

/// Handle an advise command
pub fn handle_advise_command(storage: &Storage, cmd: AdviseCommands) -> JournalResult<()> {
    match cmd {
        AdviseCommands::Crops { file } => {
            let crops = parse_identified_crops(&read_reply(file)?)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "identified_crops": crops }))?
            );
        }

        AdviseCommands::Recommendations { file } => {
            let recommendations = parse_recommendations(&read_reply(file)?)?;
            for rec in &recommendations {
                println!("{}\n  {}\n", rec.plant, rec.reason);
            }
        }

        AdviseCommands::History => {
            let path = storage.paths().history_file();
            let context = HistoricalContext::load(&path);
            if !context.is_available() {
                eprintln!("(history not available, showing placeholder)");
            }
            println!("{}", context.to_pretty_string());
        }
    }

    Ok(())
}

fn read_reply(file: Option<PathBuf>) -> JournalResult<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| JournalError::Io(format!("Failed to read {}: {}", path.display(), e))),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| JournalError::Io(format!("Failed to read stdin: {}", e)))?;
            Ok(text)
        }
    }
}
