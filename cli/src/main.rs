//! Gitpod CLI - local command-line client for Gitpod
//!
//! Authenticate with a personal access token, read and write local settings
//! and list your workspaces from the terminal.

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod workspace;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{AuthCommands, Cli, Commands, ConfigCommands, WorkspaceCommands};
use crate::config::settings::env;
use crate::error::Result;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env::LOG_LEVEL)
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Run the command
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if e.is_storage_error() {
            eprintln!(
                "Hint: check that the system keyring is running and that {} is writable.",
                config::config_file()
                    .map_or_else(|_| "the config file".to_string(), |p| p.display().to_string())
            );
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                token,
                no_verify,
                prevent_plain,
            } => cli::commands::handle_login(&token, no_verify, prevent_plain).await,
            AuthCommands::Logout => cli::commands::handle_logout(),
            AuthCommands::Status => cli::commands::handle_status().await,
        },
        Commands::Config { command } => match command {
            ConfigCommands::Set { key, value } => cli::commands::handle_config_set(&key, &value),
            ConfigCommands::Get { key } => cli::commands::handle_config_get(&key),
        },
        Commands::Workspace { command } => match command {
            WorkspaceCommands::List => cli::commands::handle_workspace_list(cli.json).await,
        },
        Commands::Completions { shell } => cli::commands::handle_completions(shell),
    }
}
