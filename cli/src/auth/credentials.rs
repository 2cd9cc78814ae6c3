//! Credential storage backends.
//!
//! Every place a token can live implements [`CredentialBackend`]:
//! - [`KeyringBackend`] - the operating system keyring (macOS Keychain,
//!   Linux kernel keyutils / Secret Service, Windows Credential Manager)
//! - [`ConfigFileBackend`] - the `gitpod.token` key of the config file
//!
//! Backends are single-slot: each holds at most one token.

use keyring::Entry;
use tracing::debug;

use crate::auth::error::CredentialError;
use crate::auth::tokens::CredentialLocation;
use crate::config::{keys, ConfigStore};

/// Keyring service name.
pub const SERVICE_NAME: &str = "gitpod-cli";

/// Keyring account name.
pub const ACCOUNT_NAME: &str = "token";

/// A place that can hold the auth token.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialBackend: Send + Sync {
    /// Which location this backend represents.
    fn location(&self) -> CredentialLocation;

    /// Whether the token is stored unencrypted.
    fn is_plaintext(&self) -> bool;

    /// Reads the token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] if nothing is stored.
    fn get(&self) -> Result<String, CredentialError>;

    /// Stores the token, replacing any previous one.
    fn set(&self, token: &str) -> Result<(), CredentialError>;

    /// Removes the token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] if nothing was stored.
    fn delete(&self) -> Result<(), CredentialError>;
}

/// Token storage in the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringBackend {
    service: String,
    account: String,
}

impl KeyringBackend {
    /// Creates a backend for the CLI's fixed keyring slot.
    pub fn new() -> Self {
        Self::with_entry(SERVICE_NAME, ACCOUNT_NAME)
    }

    /// Creates a backend for an arbitrary keyring slot.
    pub fn with_entry(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, CredentialError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialBackend for KeyringBackend {
    fn location(&self) -> CredentialLocation {
        CredentialLocation::SecureStore
    }

    fn is_plaintext(&self) -> bool {
        false
    }

    fn get(&self) -> Result<String, CredentialError> {
        Ok(self.entry()?.get_password()?)
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        self.entry()?.set_password(token)?;

        // Read back through a fresh entry: mock or session-less keyrings
        // accept the write but never persist it.
        match self.entry()?.get_password() {
            Ok(stored) if stored == token => {
                debug!(service = %self.service, "Token stored in keyring");
                Ok(())
            },
            Ok(_) => Err(CredentialError::StoreUnavailable(
                "keyring returned a different value than was stored".to_string(),
            )),
            Err(keyring::Error::NoEntry) => Err(CredentialError::StoreUnavailable(
                "keyring accepted the token but did not persist it".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self) -> Result<(), CredentialError> {
        Ok(self.entry()?.delete_credential()?)
    }
}

/// Plaintext token storage in the config file.
#[derive(Debug, Clone, Copy)]
pub struct ConfigFileBackend<'a> {
    config: &'a ConfigStore,
}

impl<'a> ConfigFileBackend<'a> {
    /// Creates a backend over the given config handle.
    pub const fn new(config: &'a ConfigStore) -> Self {
        Self { config }
    }
}

impl CredentialBackend for ConfigFileBackend<'_> {
    fn location(&self) -> CredentialLocation {
        CredentialLocation::ConfigFile
    }

    fn is_plaintext(&self) -> bool {
        true
    }

    fn get(&self) -> Result<String, CredentialError> {
        let token = self.config.get(keys::TOKEN);
        if token.is_empty() {
            return Err(CredentialError::NotFound);
        }
        Ok(token)
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        self.config
            .set(keys::TOKEN, token)
            .map_err(|e| CredentialError::File(e.to_string()))
    }

    fn delete(&self) -> Result<(), CredentialError> {
        match self.config.unset(keys::TOKEN) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CredentialError::NotFound),
            Err(e) => Err(CredentialError::File(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::open(dir.path().join("config.toml")).unwrap()
    }

    #[test]
    fn config_backend_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        let backend = ConfigFileBackend::new(&config);

        backend.set("gitpod_pat_abc").unwrap();

        assert_eq!(backend.get().unwrap(), "gitpod_pat_abc");
        assert_eq!(config.get(keys::TOKEN), "gitpod_pat_abc");
    }

    #[test]
    fn config_backend_empty_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        let backend = ConfigFileBackend::new(&config);

        assert!(backend.get().unwrap_err().is_not_found());
        assert!(backend.delete().unwrap_err().is_not_found());
    }

    #[test]
    fn config_backend_delete_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        config.set(keys::HOST, "gitpod.example.com").unwrap();
        let backend = ConfigFileBackend::new(&config);

        backend.set("gitpod_pat_abc").unwrap();
        backend.delete().unwrap();

        assert!(backend.get().unwrap_err().is_not_found());
        assert_eq!(config.get(keys::HOST), "gitpod.example.com");
    }

    #[test]
    fn config_backend_write_failure_is_file_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();
        let config = ConfigStore::new(blocker.join("config.toml"));
        let backend = ConfigFileBackend::new(&config);

        assert!(matches!(
            backend.set("gitpod_pat_abc"),
            Err(CredentialError::File(_))
        ));
    }

    #[test]
    fn backends_report_their_location() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let keyring = KeyringBackend::new();
        assert_eq!(keyring.location(), CredentialLocation::SecureStore);
        assert!(!keyring.is_plaintext());

        let file = ConfigFileBackend::new(&config);
        assert_eq!(file.location(), CredentialLocation::ConfigFile);
        assert!(file.is_plaintext());
    }

    #[test]
    #[ignore] // Requires actual keyring access
    fn keyring_backend_roundtrip() {
        let backend = KeyringBackend::with_entry("gitpod-cli-test", "token");

        backend.set("gitpod_pat_test").unwrap();
        assert_eq!(backend.get().unwrap(), "gitpod_pat_test");

        backend.delete().unwrap();
        assert!(backend.get().unwrap_err().is_not_found());
    }
}
