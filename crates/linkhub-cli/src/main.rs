//! linkhub CLI
//!
//! Serves the link hub over HTTP and manages links and search engines
//! from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linkhub_core::{
    Config, EngineRegistry, HubError, JsonConfigStore, JsonRecordStore, LinkService,
};

mod commands;
mod output;
mod server;

use commands::link::LinkFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkhub")]
#[command(about = "linkhub - Personal link hub and start page backend")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides settings)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage search engines
    Engine {
        #[command(subcommand)]
        command: EngineCommands,
    },
    /// Show or change application settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// List all links with their positions
    #[command(alias = "ls")]
    List,
    /// Add a link at the end of the list
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Display title (defaults to the URL)
        #[arg(short, long)]
        title: Option<String>,
        /// Image path, e.g. images/logo.png
        #[arg(short, long)]
        image: Option<String>,
        /// Extra field as key=value (repeatable)
        #[arg(short, long = "field")]
        field: Vec<String>,
    },
    /// Change fields of a link
    Edit {
        /// Position in the list
        index: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        image: Option<String>,
        /// Extra field as key=value (repeatable)
        #[arg(short, long = "field")]
        field: Vec<String>,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Position in the list
        index: i64,
    },
    /// Move a link one position up or down
    #[command(alias = "mv")]
    Move {
        /// Position in the list
        index: i64,
        /// "up" or "down"
        direction: String,
    },
}

#[derive(Subcommand)]
enum EngineCommands {
    /// List search engines
    #[command(alias = "ls")]
    List,
    /// Add a search engine, or update the one with the same name
    Set {
        /// Engine name (matched ignoring case)
        name: String,
        /// Query URL, e.g. https://duckduckgo.com/?q=
        url: String,
        /// Logo path or URL
        logo: String,
    },
    /// Remove a search engine
    #[command(alias = "rm")]
    Remove {
        /// Engine name (matched ignoring case)
        name: String,
    },
    /// Select the active search engine
    Use {
        /// Engine name (exact, case-sensitive)
        name: String,
    },
}

#[derive(Subcommand, Clone)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Set a settings value
    Set {
        /// Settings key (data_dir, bind, static_dir, log_level, admin_password)
        key: String,
        /// Settings value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output).await;
    if let Err(e) = &result {
        if !output.is_quiet() {
            if let Some(hint) = recovery_hint(e) {
                eprintln!("Hint: {}", hint);
            }
        }
    }
    result
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    match cli.command {
        Commands::Settings { command } => handle_settings_command(command, config_path, output),
        Commands::Serve { bind } => {
            let config = load_config(config_path)?;
            init_logging(&config.log_level, cli.quiet);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            output.message(&format!("Serving linkhub on http://{}", bind));
            if config.uses_default_admin_password() {
                tracing::warn!(
                    "Admin password is the built-in default; set LINKHUB_ADMIN_PASSWORD or admin_password"
                );
            }
            server::serve(&config, &bind).await
        }
        Commands::Link { command } => {
            let config = load_config(config_path)?;
            init_logging("warn", cli.quiet);
            let service = LinkService::new(JsonRecordStore::from_config(&config));
            handle_link_command(command, &service, output)
        }
        Commands::Engine { command } => {
            let config = load_config(config_path)?;
            init_logging("warn", cli.quiet);
            let registry = EngineRegistry::new(JsonConfigStore::from_config(&config));
            handle_engine_command(command, &registry, output)
        }
    }
}

fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    Config::load_with_cli_override(config_path).context("Failed to load configuration")
}

/// Recovery suggestion of the first link or engine error in the chain
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<HubError>())
        .and_then(HubError::recovery_suggestion)
}

fn handle_link_command(
    command: LinkCommands,
    service: &LinkService<JsonRecordStore>,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::List => commands::link::list(service, output),
        LinkCommands::Add {
            url,
            title,
            image,
            field,
        } => commands::link::add(
            service,
            url,
            LinkFields {
                title,
                url: None,
                image,
                extra: field,
            },
            output,
        ),
        LinkCommands::Edit {
            index,
            title,
            url,
            image,
            field,
        } => commands::link::edit(
            service,
            index,
            LinkFields {
                title,
                url,
                image,
                extra: field,
            },
            output,
        ),
        LinkCommands::Delete { index } => commands::link::delete(service, index, output),
        LinkCommands::Move { index, direction } => {
            commands::link::move_link(service, index, direction, output)
        }
    }
}

fn handle_engine_command(
    command: EngineCommands,
    registry: &EngineRegistry<JsonConfigStore>,
    output: &Output,
) -> Result<()> {
    match command {
        EngineCommands::List => commands::engine::list(registry, output),
        EngineCommands::Set { name, url, logo } => {
            commands::engine::set(registry, name, url, logo, output)
        }
        EngineCommands::Remove { name } => commands::engine::remove(registry, name, output),
        EngineCommands::Use { name } => commands::engine::activate(registry, name, output),
    }
}

fn handle_settings_command(
    command: Option<SettingsCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(config_path, output),
        Some(SettingsCommands::Set { key, value }) => {
            commands::settings::set(key, value, config_path, output)
        }
    }
}

/// Log to stderr; RUST_LOG takes precedence over the configured level
fn init_logging(level: &str, quiet: bool) {
    let level = if quiet { "warn" } else { level };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("linkhub_core={},linkhub_cli={}", level, level))
    });

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
