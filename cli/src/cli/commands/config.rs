//! Configuration command handlers.

use std::io::{self, Write};

use crate::config::ConfigStore;
use crate::error::{GitpodError, Result};

/// Handle the `gitpod config set <key> <value>` command.
pub fn handle_config_set(key: &str, value: &str) -> Result<()> {
    let config = ConfigStore::open_default()?;
    set(&config, key, value)
}

/// Handle the `gitpod config get <key>` command.
pub fn handle_config_get(key: &str) -> Result<()> {
    let config = ConfigStore::open_default()?;
    get(&config, key, &mut io::stdout())
}

/// Durably stores `value` under `key`.
pub fn set(config: &ConfigStore, key: &str, value: &str) -> Result<()> {
    config.set(validate_key(key)?, value)
}

/// Prints the value of `key`; an unset key prints an empty line.
pub fn get(config: &ConfigStore, key: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", config.get(validate_key(key)?))?;
    Ok(())
}

fn validate_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        return Err(GitpodError::InvalidArgument(
            "configuration key must not be empty".to_string(),
        ));
    }
    Ok(key)
}
