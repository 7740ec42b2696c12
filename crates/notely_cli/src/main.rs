//! `notely` command-line entry point.
//!
//! # Responsibility
//! - Resolve database and logging configuration from flags or environment.
//! - Drive `NotebookService` and print one JSON envelope per command.
//!
//! # Invariants
//! - Exit status is 0 only when the printed envelope has status 200.

use clap::{Args, Parser, Subcommand};
use notely_core::db::open_db;
use notely_core::error_code::DATABASE_ERROR;
use notely_core::{
    default_log_level, init_logging, Envelope, NotebookService, SqliteNoteCollectionRepository,
    SqliteNoteRepository, SqliteUserRepository,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notely", version, about = "Manage notes grouped into collections")]
struct Cli {
    /// SQLite notebook file; created when missing.
    #[arg(long, env = "NOTELY_DB", default_value = "notely.sqlite3", global = true)]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "NOTELY_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[arg(long, env = "NOTELY_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info without touching the database.
    Ping,
    /// Row counts for every table.
    Stats,
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    Collection(CollectionCommand),
    #[command(subcommand)]
    Note(NoteCommand),
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    Create,
    List,
    Show { user_id: i64 },
    Delete { user_id: i64 },
}

#[derive(Debug, Subcommand)]
enum CollectionCommand {
    Create {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        name: String,
    },
    List {
        #[arg(long)]
        user: i64,
    },
    Show {
        collection_id: i64,
    },
    Rename {
        collection_id: i64,
        #[arg(long)]
        name: String,
    },
    Delete {
        collection_id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum NoteCommand {
    Add {
        #[arg(long)]
        collection: i64,
        #[command(flatten)]
        body: NoteBody,
    },
    List {
        #[arg(long)]
        collection: i64,
    },
    Show {
        note_id: i64,
    },
    /// Full replacement: omitted `--abridgement` clears the stored one.
    Replace {
        note_id: i64,
        #[command(flatten)]
        body: NoteBody,
    },
    /// Owner of the note's collection.
    Owner {
        note_id: i64,
    },
    Delete {
        note_id: i64,
    },
}

#[derive(Debug, Args)]
struct NoteBody {
    #[arg(long)]
    name: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    abridgement: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("notely: {err}");
            return ExitCode::FAILURE;
        }
    }

    if let Command::Ping = cli.command {
        println!("notely_core ping={}", notely_core::ping());
        println!("notely_core version={}", notely_core::core_version());
        return ExitCode::SUCCESS;
    }

    let conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => {
            log::error!("event=cli_open module=cli status=error error={err}");
            eprintln!("notely: cannot open {}: {err}", cli.db.display());
            return print(&Envelope::<()>::fail(&DATABASE_ERROR));
        }
    };
    let service = NotebookService::new(
        SqliteUserRepository::new(&conn),
        SqliteNoteCollectionRepository::new(&conn),
        SqliteNoteRepository::new(&conn),
    );

    match cli.command {
        Command::Ping => ExitCode::SUCCESS,
        Command::Stats => print(&service.stats()),
        Command::User(command) => match command {
            UserCommand::Create => print(&service.register_user()),
            UserCommand::List => print(&service.list_users()),
            UserCommand::Show { user_id } => print(&service.get_user(user_id)),
            UserCommand::Delete { user_id } => print(&service.delete_user(user_id)),
        },
        Command::Collection(command) => match command {
            CollectionCommand::Create { user, name } => {
                print(&service.create_collection(user, name))
            }
            CollectionCommand::List { user } => print(&service.list_collections(user)),
            CollectionCommand::Show { collection_id } => {
                print(&service.get_collection(collection_id))
            }
            CollectionCommand::Rename {
                collection_id,
                name,
            } => print(&service.rename_collection(collection_id, name)),
            CollectionCommand::Delete { collection_id } => {
                print(&service.delete_collection(collection_id))
            }
        },
        Command::Note(command) => match command {
            NoteCommand::Add { collection, body } => print(&service.create_note(
                collection,
                body.name,
                body.content,
                body.abridgement,
            )),
            NoteCommand::List { collection } => print(&service.list_notes(collection)),
            NoteCommand::Show { note_id } => print(&service.get_note(note_id)),
            NoteCommand::Replace { note_id, body } => print(&service.replace_note(
                note_id,
                body.name,
                body.content,
                body.abridgement,
            )),
            NoteCommand::Owner { note_id } => print(&service.note_owner(note_id)),
            NoteCommand::Delete { note_id } => print(&service.delete_note(note_id)),
        },
    }
}

fn print<T: Serialize>(envelope: &Envelope<T>) -> ExitCode {
    match render(envelope) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("notely: cannot encode response: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::from(exit_status(envelope))
}

fn render<T: Serialize>(envelope: &Envelope<T>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(envelope)
}

/// `0` for a success envelope, `1` for any failure code.
fn exit_status<T>(envelope: &Envelope<T>) -> u8 {
    if envelope.is_success() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_status, render, Cli, CollectionCommand, Command, NoteCommand};
    use clap::{CommandFactory, Parser};
    use notely_core::error_code::{ENTITY_STILL_REFERENCED, NOTE_NOT_FOUND};
    use notely_core::Envelope;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_note_add_with_optional_abridgement() {
        let cli = Cli::parse_from([
            "notely",
            "--db",
            "/tmp/n.sqlite3",
            "note",
            "add",
            "--collection",
            "1",
            "--name",
            "todo",
            "--content",
            "buy milk",
        ]);
        match cli.command {
            Command::Note(NoteCommand::Add { collection, body }) => {
                assert_eq!(collection, 1);
                assert_eq!(body.name, "todo");
                assert_eq!(body.content, "buy milk");
                assert!(body.abridgement.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn db_flag_is_accepted_after_subcommand() {
        let cli = Cli::parse_from([
            "notely",
            "collection",
            "rename",
            "4",
            "--name",
            "later",
            "--db",
            "x.sqlite3",
        ]);
        assert_eq!(cli.db.to_str(), Some("x.sqlite3"));
        assert!(matches!(
            cli.command,
            Command::Collection(CollectionCommand::Rename { collection_id: 4, .. })
        ));
    }

    #[test]
    fn success_envelopes_exit_zero() {
        let envelope = Envelope::success(vec![1, 2]);
        assert_eq!(exit_status(&envelope), 0);
        assert_eq!(exit_status(&Envelope::void_success()), 0);

        let printed: serde_json::Value =
            serde_json::from_str(&render(&envelope).unwrap()).unwrap();
        assert_eq!(
            printed,
            serde_json::json!({"statusCode": 200, "message": "success", "data": [1, 2]})
        );
    }

    #[test]
    fn failure_envelopes_exit_one_whatever_the_code() {
        for code in [&NOTE_NOT_FOUND, &ENTITY_STILL_REFERENCED] {
            let envelope = Envelope::<()>::fail(code);
            assert_eq!(exit_status(&envelope), 1);

            let printed: serde_json::Value =
                serde_json::from_str(&render(&envelope).unwrap()).unwrap();
            assert_eq!(printed["statusCode"], code.code());
            assert_eq!(printed["message"], "fail");
            assert_eq!(printed["data"]["name"], code.name());
        }
    }
}
