//! Command definitions and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use nexus_core::db::open_db;
use nexus_core::{
    init_logging, max_streak, GraphService, HabitFrequency, HabitImpact, HabitService,
    LocalClock, NewHabitRequest, NewNoteRequest, NexusConfig, NoteService, NoteUpdate,
    SqliteWorkspaceStore, WorkspaceService,
};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// NEXUS - local-first second brain.
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the workspace database
    #[arg(short = 'D', long, global = true, default_value = "nexus.db")]
    pub database: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides config)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import an exported workspace JSON file
    Import {
        /// Path to the JSON document
        file: PathBuf,
    },

    /// Print the whole workspace as JSON
    Export,

    /// Print nodes, edges, degrees and dashboard counters
    Graph,

    /// Run the force layout to rest and print node positions
    Layout {
        /// Canvas width (defaults to config)
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height (defaults to config)
        #[arg(long)]
        height: Option<f64>,
    },

    /// Create a note (title defaults to "Untitled Insight")
    NoteAdd {
        title: Option<String>,

        /// Markdown body; `[[Title]]` markers become graph edges
        #[arg(long)]
        content: Option<String>,

        /// Folder label (defaults to General)
        #[arg(long)]
        folder: Option<String>,
    },

    /// Edit a note's title, body or folder
    NoteEdit {
        note_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        folder: Option<String>,
    },

    /// Delete a note
    NoteRm { note_id: String },

    /// List habits with streaks and 30-day completion rates
    Habits,

    /// Create a habit
    HabitAdd {
        name: String,

        /// Track weekly instead of daily
        #[arg(long)]
        weekly: bool,

        /// Mark as low impact
        #[arg(long)]
        low_impact: bool,
    },

    /// Toggle a day for a habit (today when no date is given)
    Toggle {
        habit_id: String,

        /// Day to toggle, formatted YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(cli: Cli) -> CliResult<String> {
    let config = match &cli.config {
        Some(path) => NexusConfig::load(path)?,
        None => NexusConfig::default(),
    };
    if let Some(log_dir) = cli.log_dir.as_ref().or(config.log_dir.as_ref()) {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&cli.database)?;
    let store = SqliteWorkspaceStore::new(&conn);

    let value = match cli.command {
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let report = WorkspaceService::new(&store).import_snapshot(&text)?;
            serde_json::to_value(report)?
        }
        Commands::Export => return Ok(WorkspaceService::new(&store).export_snapshot()?),
        Commands::Graph => {
            let service = GraphService::with_config(&store, config.layout);
            json!({
                "graph": service.knowledge_graph()?,
                "stats": service.graph_stats()?,
            })
        }
        Commands::Layout { width, height } => {
            let mut canvas = config.canvas;
            if let Some(width) = width {
                canvas.width = width;
            }
            if let Some(height) = height {
                canvas.height = height;
            }
            let layout =
                GraphService::with_config(&store, config.layout).layout(canvas.canvas())?;
            serde_json::to_value(layout)?
        }
        Commands::NoteAdd {
            title,
            content,
            folder,
        } => {
            let request = NewNoteRequest {
                title: title.unwrap_or_default(),
                content: content.unwrap_or_default(),
                folder: folder.unwrap_or_default(),
            };
            let note = NoteService::new(&store, LocalClock).create_note(&request)?;
            serde_json::to_value(note)?
        }
        Commands::NoteEdit {
            note_id,
            title,
            content,
            folder,
        } => {
            let update = NoteUpdate {
                title,
                content,
                folder,
                pinned: None,
            };
            if update.is_empty() {
                return Err("nothing to edit; pass --title, --content or --folder".into());
            }
            let note = NoteService::new(&store, LocalClock).update_note(&note_id, update)?;
            serde_json::to_value(note)?
        }
        Commands::NoteRm { note_id } => {
            NoteService::new(&store, LocalClock).delete_note(&note_id)?;
            json!({ "deleted": note_id })
        }
        Commands::Habits => {
            let service = HabitService::new(&store, LocalClock);
            let habits = service.list_habits()?;
            json!({
                "habits": service.summarize(&habits),
                "max_streak": max_streak(&habits),
            })
        }
        Commands::HabitAdd {
            name,
            weekly,
            low_impact,
        } => {
            let request = NewHabitRequest {
                name,
                frequency: if weekly {
                    HabitFrequency::Weekly
                } else {
                    HabitFrequency::Daily
                },
                impact: if low_impact {
                    HabitImpact::Low
                } else {
                    HabitImpact::High
                },
            };
            let habit = HabitService::new(&store, LocalClock).create_habit(&request)?;
            serde_json::to_value(habit)?
        }
        Commands::Toggle { habit_id, date } => {
            let service = HabitService::new(&store, LocalClock);
            let habit = match date {
                Some(date) => service.toggle_habit(&habit_id, date)?,
                None => service.toggle_today(&habit_id)?,
            };
            serde_json::to_value(habit)?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn parses_toggle_with_date() {
        let cli = Cli::parse_from(["nexus", "-D", "/tmp/w.db", "toggle", "h1", "--date", "2024-03-01"]);
        match cli.command {
            Commands::Toggle { habit_id, date } => {
                assert_eq!(habit_id, "h1");
                assert_eq!(date.map(|d| d.to_string()).as_deref(), Some("2024-03-01"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_note_edit_with_partial_fields() {
        let cli = Cli::parse_from(["nexus", "note-edit", "n1", "--title", "Renamed"]);
        match cli.command {
            Commands::NoteEdit {
                note_id,
                title,
                content,
                folder,
            } => {
                assert_eq!(note_id, "n1");
                assert_eq!(title.as_deref(), Some("Renamed"));
                assert_eq!(content, None);
                assert_eq!(folder, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn note_add_title_is_optional() {
        let cli = Cli::parse_from(["nexus", "note-add", "--content", "[[Inbox]]"]);
        assert!(matches!(
            cli.command,
            Commands::NoteAdd {
                title: None,
                content: Some(_),
                folder: None
            }
        ));
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["nexus", "toggle", "h1", "--date", "yesterday"]).is_err());
    }
}
