//! Command-line front end for the deadlines store.
//!
//! # Responsibility
//! - Drive the same store the menu-bar host uses, one command per run.
//! - Keep output line-oriented for scripting.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use deadlines_core::db::open_db;
use deadlines_core::{
    core_version, init_logging, CoreConfig, DeadlineId, DeadlineStore, SqliteKeyValueStore,
};
use log::warn;
use std::process::ExitCode;
use uuid::Uuid;

/// Track deadlines and how many days remain until each.
#[derive(Debug, Parser)]
#[command(name = "deadlines", version, about)]
struct Cli {
    /// Command to run; lists deadlines when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Show deadlines, soonest first.
    List,

    /// Add a deadline on a calendar date.
    Add {
        name: String,
        /// Date as YYYY-MM-DD.
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Add a deadline from month and day in the current year.
    #[command(name = "add-md")]
    AddMonthDay {
        name: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=31))]
        day: u32,
    },

    /// Rename a deadline.
    Rename {
        #[arg(value_parser = parse_id)]
        id: DeadlineId,
        name: String,
    },

    /// Remove a deadline.
    Remove {
        #[arg(value_parser = parse_id)]
        id: DeadlineId,
    },

    /// Purge deadlines overdue by more than a week.
    Cleanup,

    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli.command.unwrap_or(Command::List), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &CoreConfig) -> Result<(), String> {
    if command == Command::Version {
        println!("deadlines_core version={}", core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)
        .map_err(|err| format!("cannot open {}: {err}", config.db_path.display()))?;
    let mut store = DeadlineStore::open(SqliteKeyValueStore::new(conn));

    match command {
        Command::List => {
            for row in store.sorted_view() {
                println!("{}\t{}\t{:>10}\t{}", row.id, row.date, row.label, row.name);
            }
        }
        Command::Add { name, date } => match store.add(&name, date) {
            Some(id) => println!("added {id}"),
            None => return Err("not added: name must not be empty".to_string()),
        },
        Command::AddMonthDay { name, month, day } => {
            match store.add_month_day(&name, month, day) {
                Some(id) => println!("added {id}"),
                None => {
                    return Err(format!(
                        "not added: need a name and a valid month/day (got {month}/{day})"
                    ))
                }
            }
        }
        Command::Rename { id, name } => {
            if !store.rename(id, &name) {
                warn!("event=cli_rename module=cli status=noop id={id}");
                println!("unchanged");
            } else {
                println!("renamed {id}");
            }
        }
        Command::Remove { id } => {
            if store.remove(id) {
                println!("removed {id}");
            } else {
                println!("unchanged");
            }
        }
        Command::Cleanup => println!("removed {}", store.cleanup_overdue()),
        Command::Version => {}
    }

    store.shutdown();
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_id(raw: &str) -> Result<DeadlineId, String> {
    let id = Uuid::parse_str(raw.trim()).map_err(|err| err.to_string())?;
    if id.is_nil() {
        return Err("the nil id never names a deadline".to_string());
    }
    Ok(id)
}
