//! Command-line surface over `studyplan_core`.
//!
//! Stored commands open (and migrate) the database, run one use-case and
//! print the resulting document as pretty JSON on stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;
use studyplan_core::db::open_db;
use studyplan_core::{
    default_log_level, init_logging, normalize_extraction, NormalizedDocument,
    SqliteDocumentRepository, SqliteStatusRepository, StudyPlanService,
};

/// Command-line arguments for studyplan
#[derive(Parser, Debug)]
#[command(name = "studyplan")]
#[command(about = "Normalize extracted study plans and track course status")]
#[command(version)]
struct Args {
    /// SQLite database file
    #[arg(long, default_value = "studyplan.db", env = "STUDYPLAN_DB")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "STUDYPLAN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, env = "STUDYPLAN_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized document of a response file without storing it
    Normalize { file: PathBuf },
    #[command(flatten)]
    Stored(StoredCommand),
}

/// Commands that read or write the database.
#[derive(Subcommand, Debug)]
enum StoredCommand {
    /// Ingest an extraction-service response file
    Ingest { file: PathBuf },
    /// Import an already-normalized plan file
    Import { file: PathBuf },
    /// Show a document merged with its course statuses
    Show { doc_id: String },
    /// Show a document by its display name
    ShowByName { name: String },
    /// Assign a display name to a document
    Rename { doc_id: String, name: String },
    /// Record whether a course was passed
    SetStatus {
        doc_id: String,
        course_code: String,
        #[arg(action = clap::ArgAction::Set)]
        passed: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("Failed to initialize logging")?;
    }

    match args.command {
        Command::Normalize { file } => {
            let document = normalize_extraction(&read_json(&file)?)
                .with_context(|| format!("Failed to normalize {}", file.display()))?;
            print_json(&document)
        }
        Command::Stored(command) => run_stored(&args.db, command),
    }
}

fn run_stored(db: &Path, command: StoredCommand) -> Result<()> {
    let conn = open_db(db).with_context(|| format!("Failed to open database {}", db.display()))?;
    let service = StudyPlanService::new(
        SqliteDocumentRepository::new(&conn),
        SqliteStatusRepository::new(&conn),
    );

    let record = match command {
        StoredCommand::Ingest { file } => service
            .ingest_extraction(&read_json(&file)?)
            .with_context(|| format!("Failed to ingest {}", file.display()))?,
        StoredCommand::Import { file } => {
            let document: NormalizedDocument = serde_json::from_value(read_json(&file)?)
                .with_context(|| format!("{} is not a study plan", file.display()))?;
            service
                .import_document(&document)
                .with_context(|| format!("Failed to import {}", file.display()))?
        }
        StoredCommand::Show { doc_id } => service.get_document(&doc_id)?,
        StoredCommand::ShowByName { name } => service.get_document_by_name(&name)?,
        StoredCommand::Rename { doc_id, name } => service.rename_document(&doc_id, &name)?,
        StoredCommand::SetStatus {
            doc_id,
            course_code,
            passed,
        } => service.set_course_status(&doc_id, &course_code, passed)?,
    };

    info!(
        "event=cli_command module=cli status=ok doc_id={}",
        record.document.id
    );
    print_json(&record)
}

fn read_json(path: &Path) -> Result<Value> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
