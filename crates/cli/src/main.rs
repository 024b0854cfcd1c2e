//! studentsim CLI: the main entry point.
//!
//! Commands:
//! - `chat`   : Interactive tutoring session (default) or a single turn
//! - `status` : Show the mastery table
//! - `set`    : Change one component's mastery
//! - `add`    : Add a knowledge component
//! - `init`   : Write default config and prompt files
//! - `doctor` : Diagnose configuration and files

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use studentsim_config::CONFIG_FILE;

mod commands;
mod repl;

#[derive(Parser)]
#[command(
    name = "studentsim",
    about = "studentsim - practice tutoring with a simulated student",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the simulated student
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show current knowledge mastery levels
    Status,

    /// Set the mastery of one knowledge component
    Set {
        /// Component id, e.g. `carry_addition`
        id: String,

        /// New mastery (clamped to 0..=100)
        #[arg(allow_negative_numbers = true)]
        mastery: i64,
    },

    /// Add (or replace) a knowledge component
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        /// Comma-separated trigger keywords
        #[arg(long, value_delimiter = ',', required = true)]
        keywords: Vec<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        mastery: i64,
    },

    /// Write a default config file and prompt templates
    Init,

    /// Diagnose configuration, prompts, and the knowledge file
    Doctor {
        /// Also check that the provider endpoint answers
        #[arg(long)]
        online: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config;
    let result = match cli.command.unwrap_or(Commands::Chat { message: None }) {
        Commands::Chat { message } => commands::chat::run(&config_path, message).await,
        Commands::Status => commands::status::run(&config_path).await,
        Commands::Set { id, mastery } => commands::set::run(&config_path, &id, mastery).await,
        Commands::Add {
            id,
            name,
            keywords,
            description,
            mastery,
        } => commands::add::run(&config_path, id, name, keywords, description, mastery).await,
        Commands::Init => commands::init::run(&config_path).await,
        Commands::Doctor { online } => commands::doctor::run(&config_path, online).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
