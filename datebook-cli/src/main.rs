mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use datebook_core::Datebook;
use datebook_core::config::DatebookConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "datebook")]
#[command(about = "Manage events and recurring events in your local datebook")]
struct Cli {
    /// Use this data directory instead of the configured one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events, optionally with generated occurrences
    List {
        /// Only events owned by this user
        #[arg(short, long)]
        user: Option<u64>,

        /// Include occurrences generated from recurrence rules
        #[arg(short, long)]
        expand: bool,

        /// Show events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show one event and its recurrence rule
    Show { id: u64 },
    /// Create an event
    New {
        title: String,

        /// Start date/time (e.g., "2026-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time; defaults to one hour after start
        #[arg(short = 'E', long)]
        end: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Work, Personal, Study, Health, Social or Other
        #[arg(short, long, default_value = "Personal")]
        category: String,

        /// Owning user id
        #[arg(short, long)]
        user: u64,

        /// Repeat interval: 1d, 1w, 1m or 1y
        #[arg(long)]
        repeat: Option<String>,

        /// Total number of occurrences including this one
        #[arg(long, default_value_t = 1)]
        times: u32,

        /// Last date a repetition may fall on (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
    },
    /// Delete an event (its recurrence rule is kept)
    Delete { id: u64 },
    /// Set or clear the recurrence rule of an event
    Repeat {
        id: u64,

        /// 1d, 1w, 1m, 1y, or None
        interval: Option<String>,

        /// Total number of occurrences including the event itself
        times: Option<u32>,

        #[arg(long)]
        until: Option<String>,

        /// Remove the rule instead of setting one
        #[arg(long, conflicts_with_all = ["interval", "times", "until"])]
        clear: bool,
    },
    /// Event statistics for one user
    Stats {
        #[arg(short, long)]
        user: u64,
    },
    /// Register a user
    AddUser {
        name: String,
        email: String,
        password: String,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let datebook = open_datebook(cli.data_dir)?;

    match cli.command {
        Commands::List {
            user,
            expand,
            from,
            to,
        } => commands::list::run(&datebook, user, expand, from.as_deref(), to.as_deref()),
        Commands::Show { id } => commands::list::show(&datebook, id),
        Commands::New {
            title,
            start,
            end,
            description,
            category,
            user,
            repeat,
            times,
            until,
        } => commands::new::run(
            &datebook,
            commands::new::NewArgs {
                title,
                start,
                end,
                description,
                category,
                user,
                repeat,
                times,
                until,
            },
        ),
        Commands::Delete { id } => commands::delete::run(&datebook, id),
        Commands::Repeat {
            id,
            interval,
            times,
            until,
            clear,
        } => {
            if clear {
                commands::repeat::clear(&datebook, id)
            } else {
                commands::repeat::run(&datebook, id, interval, times, until)
            }
        }
        Commands::Stats { user } => commands::stats::run(&datebook, user),
        Commands::AddUser {
            name,
            email,
            password,
        } => commands::user::add(&datebook, name, email, password),
    }
}

/// Logs go to stderr; quiet unless RUST_LOG asks for more.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn open_datebook(data_dir: Option<PathBuf>) -> Result<Datebook> {
    let mut config = DatebookConfig::load()?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(data_dir = %config.data_path().display(), "Opening datebook");
    Ok(Datebook::open(&config)?)
}
