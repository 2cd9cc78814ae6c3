//! Credential backend error types.

use thiserror::Error;

/// Errors reported by a single credential backend.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The backend holds no credential.
    #[error("no stored credential found")]
    NotFound,

    /// The backend cannot be reached (no keyring daemon, headless session).
    #[error("secure credential storage is unavailable ({0}). Start a keyring service, or allow storing the token in the config file.")]
    StoreUnavailable(String),

    /// The backend refused access.
    #[error("access to secure credential storage was denied ({0}). Ensure your system keyring is unlocked.")]
    StoreDenied(String),

    /// The plaintext config file could not be updated.
    #[error("failed to update the config file ({0})")]
    File(String),
}

impl CredentialError {
    /// Checks if this is a "nothing stored" error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => Self::NotFound,
            keyring::Error::NoStorageAccess(e) => Self::StoreDenied(e.to_string()),
            keyring::Error::PlatformFailure(e) => Self::StoreUnavailable(e.to_string()),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
