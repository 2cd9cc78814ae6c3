//! Shell completion generation.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::args::{Cli, ShellType};
use crate::error::Result;

/// Handles the `gitpod completions <shell>` command.
///
/// Generates shell completion scripts.
pub fn handle_completions(shell: ShellType) -> Result<()> {
    completions(shell, &mut io::stdout())
}

/// Writes the completion script for `shell` to `out`.
pub fn completions(shell: ShellType, out: &mut impl Write) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
    };

    generate(shell, &mut cmd, "gitpod", out);
    out.flush()?;

    Ok(())
}
