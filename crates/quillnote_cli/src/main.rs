//! quillnote command-line driver.
//!
//! # Responsibility
//! - Load settings, open the database and run one request per invocation.
//! - Build the session claim set from `--id-claim` the way an auth layer
//!   would, then go through the same handlers a server would.
//! - Print the response envelope as JSON; exit non-zero for non-2xx.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use quillnote_core::api::{self, ApiResponse, NoteCreate, NoteUpdate, UserRegister};
use quillnote_core::db::open_db;
use quillnote_core::{
    init_logging, normalize_level, NoteId, NoteService, SessionClaims, Settings,
    SqliteNoteRepository, SqliteUserRepository, UserService, OWNER_ID_CLAIM,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// quillnote - personal notes backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "quillnote")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file (overrides settings)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides settings
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new user
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Defaults to `--password`
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Note operations for an authenticated caller
    Note {
        /// Value of the session `Id` claim; omit to act unauthenticated
        #[arg(long)]
        id_claim: Option<String>,

        #[command(subcommand)]
        action: NoteAction,
    },
}

#[derive(Subcommand, Debug)]
enum NoteAction {
    /// Create a note
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },

    /// List the caller's notes
    #[command(alias = "ls")]
    List,

    /// Show one note
    Get { id: NoteId },

    /// Replace a note's title and content
    Update {
        id: NoteId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete { id: NoteId },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    apply_overrides(&mut settings, cli.db.clone(), cli.log_level.clone())?;
    if let Some(dir) = settings.logging.dir.as_deref() {
        init_logging(&settings.logging.level, dir).context("failed to initialize logging")?;
    }

    let mut conn = open_db(&settings.database.path).with_context(|| {
        format!(
            "failed to open database `{}`",
            settings.database.path.display()
        )
    })?;
    info!("event=cli_start module=cli status=ok");

    let response = match cli.command {
        Commands::Register {
            email,
            username,
            password,
            confirm_password,
        } => {
            let repo = SqliteUserRepository::try_new(&mut conn)?;
            let mut service = UserService::new(repo);
            let request = UserRegister {
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                email,
                username,
                password,
            };
            api::register_user(&mut service, &request)
        }
        Commands::Note { id_claim, action } => {
            let claims = match id_claim {
                Some(value) => SessionClaims::new().with_claim(OWNER_ID_CLAIM, value),
                None => SessionClaims::new(),
            };
            let repo = SqliteNoteRepository::try_new(&mut conn)?;
            let mut service = NoteService::new(repo);
            run_note_action(&mut service, &claims, action)
        }
    };

    print_response(&response)?;
    Ok(ExitCode::from(exit_status(&response)))
}

/// Applies command-line overrides and rejects unknown log levels even when
/// file logging is off.
fn apply_overrides(
    settings: &mut Settings,
    db: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<()> {
    if let Some(db) = db {
        settings.database.path = db;
    }
    if let Some(level) = log_level {
        settings.logging.level = level;
    }
    normalize_level(&settings.logging.level)
        .with_context(|| format!("invalid log level `{}`", settings.logging.level))?;
    Ok(())
}

fn exit_status(response: &ApiResponse) -> u8 {
    if response.is_success() {
        0
    } else {
        1
    }
}

fn run_note_action(
    service: &mut NoteService<SqliteNoteRepository<'_>>,
    claims: &SessionClaims,
    action: NoteAction,
) -> ApiResponse {
    match action {
        NoteAction::Create { title, content } => {
            api::create_note(service, claims, &NoteCreate { title, content })
        }
        NoteAction::List => api::list_notes(service, claims),
        NoteAction::Get { id } => api::get_note(service, claims, id),
        NoteAction::Update { id, title, content } => {
            api::update_note(service, claims, &NoteUpdate { id, title, content })
        }
        NoteAction::Delete { id } => api::delete_note(service, claims, id),
    }
}

fn print_response(response: &ApiResponse) -> Result<()> {
    let json = serde_json::to_string_pretty(response).context("failed to encode response")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_overrides, exit_status, Cli, Commands, NoteAction};
    use clap::Parser;
    use quillnote_core::api::{
        ApiBody, ApiResponse, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND,
        STATUS_OK, STATUS_UNAUTHORIZED,
    };
    use quillnote_core::config::{DatabaseSettings, LoggingSettings};
    use quillnote_core::Settings;
    use std::path::PathBuf;

    fn settings_without_log_dir() -> Settings {
        Settings {
            database: DatabaseSettings {
                path: PathBuf::from("quillnote.sqlite3"),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                dir: None,
            },
        }
    }

    fn response(status: u16) -> ApiResponse {
        ApiResponse {
            status,
            body: ApiBody::Empty,
        }
    }

    #[test]
    fn only_success_statuses_exit_zero() {
        assert_eq!(exit_status(&response(STATUS_OK)), 0);
        for status in [
            STATUS_BAD_REQUEST,
            STATUS_UNAUTHORIZED,
            STATUS_NOT_FOUND,
            STATUS_INTERNAL_ERROR,
        ] {
            assert_eq!(exit_status(&response(status)), 1);
        }
    }

    #[test]
    fn unknown_log_level_is_rejected_without_log_dir() {
        let mut settings = settings_without_log_dir();
        assert!(apply_overrides(&mut settings, None, Some("verbose".to_string())).is_err());

        let mut settings = settings_without_log_dir();
        apply_overrides(
            &mut settings,
            Some(PathBuf::from("other.sqlite3")),
            Some("WARN".to_string()),
        )
        .unwrap();
        assert_eq!(settings.database.path, PathBuf::from("other.sqlite3"));
        assert_eq!(settings.logging.level, "WARN");
    }

    #[test]
    fn note_subcommands_parse_with_aliases() {
        let cli = Cli::try_parse_from([
            "quillnote",
            "--log-level",
            "warn",
            "note",
            "--id-claim",
            "7",
            "rm",
            "42",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
        match cli.command {
            Commands::Note { id_claim, action } => {
                assert_eq!(id_claim.as_deref(), Some("7"));
                assert!(matches!(action, NoteAction::Delete { id: 42 }));
            }
            other => panic!("expected a note command, got {other:?}"),
        }
    }
}
