//! CLI module for gitpod.

pub mod args;
pub mod commands;

pub use args::{AuthCommands, Cli, Commands, ConfigCommands, WorkspaceCommands};
