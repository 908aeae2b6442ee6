//! Entry CLI commands
//!
//! Implements CLI commands for adding, browsing, editing, and deleting
//! diary entries.

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::display::{format_entry_details, format_entry_page, format_entry_summary};
use crate::error::{JournalError, JournalResult};
use crate::models::EntryFields;
use crate::services::{EntryFilter, EntryService, PageRequest};
use crate::storage::Storage;
use crate::validation::DATE_FORMAT;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record a new observation
    Add {
        /// Crop name
        crop: String,
        /// What you observed
        observations: String,
        #[command(flatten)]
        details: EntryDetails,
    },
    /// List entries, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<usize>,
        /// Entries per page (1-100)
        #[arg(long)]
        per_page: Option<usize>,
        /// Skip this many entries (alternative to --page)
        #[arg(long, conflicts_with = "page")]
        offset: Option<usize>,
        /// Maximum entries to return (alternative to --per-page)
        #[arg(long, conflicts_with = "per_page")]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one entry
    Show {
        /// Entry ID or unique ID prefix
        id: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace an entry's fields; options not given keep their current value
    Edit {
        /// Entry ID or unique ID prefix
        id: String,
        /// New crop name
        #[arg(long)]
        crop: Option<String>,
        /// New observations
        #[arg(long)]
        observations: Option<String>,
        #[command(flatten)]
        details: EntryDetails,
        /// Clear actions and photos before applying --action/--photo
        #[arg(long)]
        reset_lists: bool,
    },
    /// Delete an entry
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Show the change history of an entry
    History {
        /// Entry ID or unique ID prefix
        id: String,
    },
}

/// Optional entry fields shared by add and edit
#[derive(Args, Default)]
pub struct EntryDetails {
    /// Observation date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Growth stage (seed, seedling, vegetative, flowering, ...)
    #[arg(short, long)]
    pub stage: Option<String>,
    #[arg(short, long)]
    pub weather: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Action taken (repeatable)
    #[arg(short, long = "action")]
    pub actions: Vec<String>,
    /// Photo path (repeatable)
    #[arg(long = "photo")]
    pub photos: Vec<String>,
}

impl EntryDetails {
    fn apply_to(self, fields: &mut EntryFields, replace_lists: bool) {
        if let Some(date) = self.date {
            fields.date = Some(date);
        }
        if let Some(stage) = self.stage {
            fields.growth_stage = stage;
        }
        if self.weather.is_some() {
            fields.weather = self.weather;
        }
        if self.location.is_some() {
            fields.location = self.location;
        }
        if self.notes.is_some() {
            fields.user_notes = self.notes;
        }
        if replace_lists {
            fields.actions_taken.clear();
            fields.photos.clear();
        }
        fields.actions_taken.extend(self.actions);
        fields.photos.extend(self.photos);
    }
}

/// Listing filters
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Only this crop (exact, case-insensitive)
    #[arg(short, long)]
    pub crop: Option<String>,
    /// Only this growth stage
    #[arg(short, long)]
    pub stage: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Text to search for in observations, notes, and crop names
    #[arg(short = 'q', long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> JournalResult<EntryFilter> {
        Ok(EntryFilter {
            crop_type: self.crop.clone(),
            growth_stage: self.stage.clone(),
            date_from: parse_date_arg("--from", self.from.as_deref())?,
            date_to: parse_date_arg("--to", self.to.as_deref())?,
            search: self.search.clone(),
        })
    }
}

fn parse_date_arg(flag: &str, value: Option<&str>) -> JournalResult<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), DATE_FORMAT).map_err(|_| {
                JournalError::Validation(format!("{} must be YYYY-MM-DD, got '{}'", flag, v))
            })
        })
        .transpose()
}

/// Handle an entry command
pub fn handle_entry_command(storage: &Storage, cmd: EntryCommands) -> JournalResult<()> {
    let service = EntryService::new(storage);

    match cmd {
        EntryCommands::Add {
            crop,
            observations,
            details,
        } => {
            let mut fields = EntryFields::new(crop, observations);
            details.apply_to(&mut fields, false);

            let entry = service.create(fields)?;
            println!(
                "Recorded {} {} on {} ({})",
                entry.crop_category.icon, entry.crop_type, entry.date, entry.id
            );
        }

        EntryCommands::List {
            filter,
            page,
            per_page,
            offset,
            limit,
            json,
        } => {
            let request = PageRequest {
                page,
                per_page,
                offset,
                limit,
            };
            let page = service.list(&filter.to_filter()?, request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                println!("{}", format_entry_page(&page));
            }
        }

        EntryCommands::Show { id, json } => {
            let id = service.resolve_id(&id)?;
            let entry = service.get(&id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                print!("{}", format_entry_details(&entry));
            }
        }

        EntryCommands::Edit {
            id,
            crop,
            observations,
            details,
            reset_lists,
        } => {
            let id = service.resolve_id(&id)?;
            let mut fields = service.get(&id)?.to_fields();
            if let Some(crop) = crop {
                fields.crop_type = crop;
            }
            if let Some(observations) = observations {
                fields.observations = observations;
            }
            details.apply_to(&mut fields, reset_lists);

            let entry = service.update(&id, fields)?;
            println!("Updated {} {} ({})", entry.crop_type, entry.date, entry.id);
        }

        EntryCommands::Delete { id } => {
            let id = service.resolve_id(&id)?;
            let removed = service.delete(&id)?;
            println!("Deleted: {}", format_entry_summary(&removed.summary()));
        }

        EntryCommands::History { id } => {
            let history = storage.audit().history_for(id.trim())?;
            let history = if history.is_empty() {
                // The entry may still exist under a prefix
                let id = service.resolve_id(&id)?;
                storage.audit().history_for(id.as_str())?
            } else {
                history
            };

            if history.is_empty() {
                println!("No recorded changes.");
            }
            for record in history {
                println!("{}", record.format_human_readable());
            }
        }
    }

    Ok(())
}
