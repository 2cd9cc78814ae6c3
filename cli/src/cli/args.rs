//! Command-line argument parsing.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line client for Gitpod.
///
/// Authenticate with a personal access token, manage local settings and
/// list your workspaces.
#[derive(Parser, Debug)]
#[command(name = "gitpod")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON output where supported.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage authentication.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Read and write local configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Work with your Gitpod workspaces.
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },

    /// Generate shell completion scripts.
    ///
    /// Outputs completion script for the specified shell.
    /// Follow shell-specific instructions to install.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: ShellType,
    },
}

/// Supported shell types for completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

/// Authentication subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with a personal access token.
    ///
    /// The token is stored in the system keyring, or in the config file when
    /// no keyring is available.
    Login {
        /// Personal access token to store.
        token: String,

        /// Store the token without checking it against the API.
        #[arg(short = 'n', long)]
        no_verify: bool,

        /// Never fall back to storing the token in the plaintext config file.
        #[arg(short = 'p', long)]
        prevent_plain: bool,
    },

    /// Log out and remove stored credentials.
    Logout,

    /// Show current authentication status.
    Status,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value.
    Set {
        /// Configuration key (e.g. `host`).
        key: String,

        /// Value to store.
        value: String,
    },

    /// Print a configuration value (empty when unset).
    Get {
        /// Configuration key (e.g. `host`).
        key: String,
    },
}

/// Workspace subcommands.
#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    /// List your workspaces.
    List,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_login_with_flags() {
        let cli = Cli::try_parse_from(["gitpod", "auth", "login", "gitpod_pat_x", "-n", "--prevent-plain"])
            .unwrap();

        match cli.command {
            Commands::Auth {
                command:
                    AuthCommands::Login {
                        token,
                        no_verify,
                        prevent_plain,
                    },
            } => {
                assert_eq!(token, "gitpod_pat_x");
                assert!(no_verify);
                assert!(prevent_plain);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn login_requires_token() {
        assert!(Cli::try_parse_from(["gitpod", "auth", "login"]).is_err());
    }

    #[test]
    fn config_set_requires_exactly_two_arguments() {
        assert!(Cli::try_parse_from(["gitpod", "config", "set", "host"]).is_err());
        assert!(Cli::try_parse_from(["gitpod", "config", "set", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from(["gitpod", "config", "set", "host", "gitpod.example.com"]).is_ok());
    }

    #[test]
    fn config_get_requires_exactly_one_argument() {
        assert!(Cli::try_parse_from(["gitpod", "config", "get"]).is_err());
        assert!(Cli::try_parse_from(["gitpod", "config", "get", "a", "b"]).is_err());
    }

    #[test]
    fn json_flag_is_accepted_anywhere() {
        let before = Cli::try_parse_from(["gitpod", "--json", "workspace", "list"]).unwrap();
        let after = Cli::try_parse_from(["gitpod", "workspace", "list", "--json"]).unwrap();

        assert!(before.json);
        assert!(after.json);
    }

    #[test]
    fn completions_takes_a_known_shell() {
        let cli = Cli::try_parse_from(["gitpod", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: ShellType::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["gitpod", "completions", "tcsh"]).is_err());
    }
}
