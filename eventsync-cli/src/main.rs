mod commands;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventsync_core::settings::Settings;
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[derive(Parser)]
#[command(name = "eventsync")]
#[command(about = "Manage events, participants and priorities stored in a flat file")]
struct Cli {
    /// Events file (overrides data_file from config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Participants file (overrides users_file from config)
    #[arg(long, global = true)]
    users: Option<PathBuf>,

    /// Skip corrupted lines instead of failing the load
    #[arg(long, global = true)]
    skip_corrupted: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all events
    List,
    /// Add an event
    Add {
        name: String,

        /// Start time ("2025-03-20 15:00")
        #[arg(short, long)]
        start: String,

        /// End time ("2025-03-20 16:00")
        #[arg(short, long)]
        end: String,

        #[arg(short, long, default_value = "")]
        location: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// LOW, MEDIUM or HIGH
        #[arg(short, long, default_value = "LOW")]
        priority: String,

        /// Participant to attach (repeatable)
        #[arg(long = "participant")]
        participants: Vec<String>,
    },
    /// Delete an event by its number in `list`
    Delete { index: usize },
    /// Find events matching a keyword
    Find { keyword: String },
    /// Attach a participant to an event
    Invite { index: usize, participant: String },
    /// Detach a participant from an event
    Uninvite { index: usize, participant: String },
    /// Change an event's priority
    Priority { index: usize, level: String },
    /// List or add known participants
    Participants {
        #[command(subcommand)]
        action: Option<ParticipantsAction>,
    },
    /// Report corrupted lines in the events file
    Check,
}

#[derive(Subcommand)]
enum ParticipantsAction {
    Add {
        name: String,

        /// ADMIN or MEMBER
        #[arg(short, long, default_value = "MEMBER")]
        level: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let settings = Settings::load()?;
    let session = Session::new(
        &settings,
        cli.data.as_deref(),
        cli.users.as_deref(),
        cli.skip_corrupted,
    )?;

    match cli.command {
        Commands::List => commands::list::run(&session),
        Commands::Add {
            name,
            start,
            end,
            location,
            description,
            priority,
            participants,
        } => commands::add::run(
            &session,
            commands::add::NewEvent {
                name,
                start,
                end,
                location,
                description,
                priority,
                participants,
            },
        ),
        Commands::Delete { index } => commands::delete::run(&session, index),
        Commands::Find { keyword } => commands::find::run(&session, &keyword),
        Commands::Invite { index, participant } => {
            commands::invite::run(&session, index, &participant)
        }
        Commands::Uninvite { index, participant } => {
            commands::invite::run_uninvite(&session, index, &participant)
        }
        Commands::Priority { index, level } => commands::priority::run(&session, index, &level),
        Commands::Participants { action } => match action {
            None => commands::participants::list(&session),
            Some(ParticipantsAction::Add { name, level }) => {
                commands::participants::add(&session, &name, &level)
            }
        },
        Commands::Check => commands::check::run(&session),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
