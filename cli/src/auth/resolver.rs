//! Credential resolution across an ordered list of backends.
//!
//! Backends are consulted in priority order (secure store first). One policy
//! governs all three operations:
//! - read: the first backend holding a token wins
//! - write: the first permitted backend accepting the token wins, stale
//!   copies in lower-priority backends are then removed
//! - delete: every backend is cleared so no stale copy can be resurrected

use tracing::{debug, warn};

use crate::auth::credentials::{CredentialBackend, ConfigFileBackend, KeyringBackend};
use crate::auth::error::CredentialError;
use crate::auth::tokens::{CredentialLocation, StoredToken, WritePolicy};
use crate::config::ConfigStore;
use crate::error::{GitpodError, Result};

/// Single read/write/delete policy for the auth token.
pub struct CredentialResolver<'a> {
    backends: Vec<Box<dyn CredentialBackend + 'a>>,
}

impl<'a> CredentialResolver<'a> {
    /// Creates a resolver over `backends`, highest priority first.
    pub fn new(backends: Vec<Box<dyn CredentialBackend + 'a>>) -> Self {
        Self { backends }
    }

    /// Keyring first, then the `gitpod.token` key of `config`.
    pub fn with_default_backends(config: &'a ConfigStore) -> Self {
        Self::new(vec![
            Box::new(KeyringBackend::new()),
            Box::new(ConfigFileBackend::new(config)),
        ])
    }

    /// Resolves the active token. `None` means "not logged in".
    pub fn read(&self) -> Option<StoredToken> {
        for backend in &self.backends {
            let location = backend.location();
            match backend.get() {
                Ok(token) if !token.is_empty() => {
                    debug!(%location, "Resolved credential");
                    return Some(StoredToken { token, location });
                },
                Ok(_) | Err(CredentialError::NotFound) => {
                    debug!(%location, "No credential stored");
                },
                Err(e) => {
                    warn!(%location, error = %e, "Failed to read credential, trying next backend");
                },
            }
        }
        None
    }

    /// Where the active token lives.
    pub fn location(&self) -> CredentialLocation {
        self.read()
            .map_or(CredentialLocation::Absent, |stored| stored.location)
    }

    /// Stores `token` and reports which backend ended up holding it.
    ///
    /// # Errors
    ///
    /// Returns [`GitpodError::CredentialPersistence`] if no permitted backend
    /// accepted the token. Nothing is written in that case.
    pub fn write(&self, token: &str, policy: WritePolicy) -> Result<CredentialLocation> {
        let mut last_error = None;

        for (index, backend) in self.backends.iter().enumerate() {
            let location = backend.location();

            if backend.is_plaintext() && !policy.allow_plaintext {
                debug!(%location, "Plaintext storage forbidden, skipping backend");
                continue;
            }

            match backend.set(token) {
                Ok(()) => {
                    self.remove_stale_copies(index + 1);
                    return Ok(location);
                },
                Err(e) => {
                    warn!(%location, error = %e, "Failed to store credential");
                    last_error = Some(e);
                },
            }
        }

        Err(GitpodError::CredentialPersistence(last_error.unwrap_or_else(
            || CredentialError::StoreUnavailable("no permitted credential store".to_string()),
        )))
    }

    /// Removes the token from every backend.
    ///
    /// Returns the locations that held a token; an empty list means there was
    /// nothing to remove. An unreachable keyring cannot serve a later read
    /// either, so [`CredentialError::StoreUnavailable`] is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`GitpodError::CredentialPersistence`] if a backend that may
    /// still hold the token refused the deletion. The remaining backends are
    /// cleared regardless.
    pub fn delete(&self) -> Result<Vec<CredentialLocation>> {
        let mut removed = Vec::new();
        let mut failure = None;

        for backend in &self.backends {
            let location = backend.location();
            match backend.delete() {
                Ok(()) => {
                    debug!(%location, "Credential removed");
                    removed.push(location);
                },
                Err(CredentialError::NotFound) => {
                    debug!(%location, "No credential to remove");
                },
                Err(e @ CredentialError::StoreUnavailable(_)) => {
                    warn!(%location, error = %e, "Credential store unreachable, skipping");
                },
                Err(e) => {
                    warn!(%location, error = %e, "Failed to remove credential");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                },
            }
        }

        match failure {
            Some(e) => Err(GitpodError::CredentialPersistence(e)),
            None => Ok(removed),
        }
    }

    fn remove_stale_copies(&self, from: usize) {
        for backend in self.backends.iter().skip(from) {
            let location = backend.location();
            match backend.delete() {
                Ok(()) => debug!(%location, "Removed stale credential copy"),
                Err(e) if e.is_not_found() => {},
                Err(e) => warn!(%location, error = %e, "Failed to remove stale credential copy"),
            }
        }
    }
}
