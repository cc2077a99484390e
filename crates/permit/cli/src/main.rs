//! Graph Permit CLI
//!
//! A terminal driver for the permission request workflow:
//! - Browse and search the permission catalog
//! - Validate request drafts and show advisory warnings
//! - Replay scripted submit/approve/deny sessions
//! - Inspect the effective configuration

#![deny(unsafe_code)]

use clap::{Parser, Subcommand};
use permit_engine::{PermitController, SequentialIdGenerator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod files;
mod output;

use commands::{catalog, run, validate};
use config::CliConfig;
use error::CliResult;

/// Graph Permit CLI application
#[derive(Parser)]
#[command(name = "permit")]
#[command(about = "Graph Permit - Microsoft Graph permission requests and staged approvals")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PERMIT_CONFIG", global = true)]
    config: Option<String>,

    /// Permission catalog file (YAML or JSON) replacing the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Number requests REQ-001, REQ-002, ... instead of timestamped ids
    #[arg(long, global = true)]
    sequential_ids: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List requestable permissions
    Catalog {
        /// Case-insensitive filter on permission name or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Validate a request draft file
    Validate {
        /// Path to draft file (YAML or JSON)
        file: String,
    },

    /// Replay a session of submissions and decisions
    Run {
        /// Path to session file (YAML or JSON)
        file: String,

        /// Also print every approval history entry
        #[arg(long)]
        history: bool,
    },

    /// Show effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> CliResult<()> {
    // Load config; the --catalog flag wins over the config file
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if cli.catalog.is_some() {
        config.catalog = cli.catalog;
    }

    let catalog = files::load_catalog(config.catalog.as_deref())?;
    let mut controller = PermitController::new(config.engine.clone()).with_catalog(catalog);
    if cli.sequential_ids {
        controller = controller.with_id_generator(SequentialIdGenerator::new());
    }

    match cli.command {
        Commands::Catalog { search } => {
            catalog::execute(controller.catalog(), search.as_deref(), cli.output)
        }
        Commands::Validate { file } => validate::execute(&controller, &file, cli.output),
        Commands::Run { file, history } => {
            run::execute(&mut controller, &file, history, cli.output)
        }
        Commands::Config => match cli.output {
            output::OutputFormat::Table => {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            format => output::print_single(&config, format),
        },
    }
}
