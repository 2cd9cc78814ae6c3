//! File-backed flat key-value configuration.
//!
//! Keys live in a single namespace: `gitpod.token` is one key, not a nested
//! table. The file is TOML with quoted keys where needed:
//!
//! ```toml
//! "gitpod.token" = "..."
//! host = "gitpod.io"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::paths::config_file;
use crate::error::{GitpodError, Result};

/// In-memory representation of the config file.
pub type ConfigEntries = BTreeMap<String, String>;

/// Handle to the configuration file.
///
/// Created once per process and passed by reference to every component that
/// needs configuration. All methods take `&self`, so the handle can be shared
/// by the credential backends and the command handlers at the same time.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    entries: OnceLock<RwLock<ConfigEntries>>,
}

impl ConfigStore {
    /// Creates a handle without touching the filesystem.
    ///
    /// The file is created and loaded lazily by [`init`](Self::init), which
    /// every accessor calls on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceLock::new(),
        }
    }

    /// Creates a handle for `path` and initializes it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        store.init()?;
        Ok(store)
    }

    /// Opens the configuration at the default location.
    pub fn open_default() -> Result<Self> {
        Self::open(config_file()?)
    }

    /// Ensures the backing file and the in-memory map exist.
    ///
    /// Idempotent: the file is loaded at most once per handle.
    pub fn init(&self) -> Result<()> {
        if self.entries.get().is_some() {
            return Ok(());
        }

        let entries = if self.path.exists() {
            read_entries(&self.path)?
        } else {
            let empty = ConfigEntries::new();
            write_entries(&self.path, &empty)?;
            debug!(path = ?self.path, "Created configuration file");
            empty
        };

        self.entries.get_or_init(|| RwLock::new(entries));
        Ok(())
    }

    /// Returns the value for `key`, or an empty string when it is not set.
    pub fn get(&self, key: &str) -> String {
        match self.entries() {
            Ok(lock) => lock
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                warn!(key, error = %e, "Configuration unavailable, treating key as unset");
                String::new()
            }
        }
    }

    /// Durably sets `key` to `value`.
    ///
    /// The file is re-read before writing so keys written by another
    /// invocation in the meantime are kept.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        debug!(key, path = ?self.path, "Configuration updated");
        Ok(())
    }

    /// Durably removes `key`. Returns `true` if the key was set.
    pub fn unset(&self, key: &str) -> Result<bool> {
        let removed = self.update(|entries| entries.remove(key).is_some())?;
        if removed {
            debug!(key, path = ?self.path, "Configuration key removed");
        }
        Ok(removed)
    }

    fn entries(&self) -> Result<&RwLock<ConfigEntries>> {
        self.init()?;
        self.entries
            .get()
            .ok_or_else(|| GitpodError::Config("configuration was not initialized".to_string()))
    }

    fn update<T>(&self, apply: impl FnOnce(&mut ConfigEntries) -> T) -> Result<T> {
        let lock = self.entries()?;
        let mut cached = lock.write().unwrap_or_else(PoisonError::into_inner);

        let mut updated = if self.path.exists() {
            read_entries(&self.path)?
        } else {
            ConfigEntries::new()
        };
        let outcome = apply(&mut updated);

        write_entries(&self.path, &updated)?;
        *cached = updated;

        Ok(outcome)
    }
}

fn read_entries(path: &Path) -> Result<ConfigEntries> {
    let contents = fs::read_to_string(path)
        .map_err(|e| GitpodError::ConfigRead(format!("{}: {e}", path.display())))?;
    let entries: ConfigEntries = toml::from_str(&contents)
        .map_err(|e| GitpodError::ConfigRead(format!("{}: {e}", path.display())))?;
    Ok(entries)
}

/// Writes the whole map to a unique sibling temp file and renames it into
/// place. Concurrent writers never share a temp file; the last rename wins.
fn write_entries(path: &Path, entries: &ConfigEntries) -> Result<()> {
    let write_err = |e: std::io::Error| GitpodError::ConfigWrite(format!("{}: {e}", path.display()));

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let contents = toml::to_string(entries)?;

    // Created 0600; may hold a plaintext token.
    let mut file = NamedTempFile::new_in(parent).map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(write_err)?;
    }
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;

    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
