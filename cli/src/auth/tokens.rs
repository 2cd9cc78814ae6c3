//! Token types for authentication.

use std::fmt;

/// Where the active token currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialLocation {
    /// The operating system keyring.
    SecureStore,
    /// The plaintext configuration file.
    ConfigFile,
    /// No backend holds a token.
    Absent,
}

impl fmt::Display for CredentialLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecureStore => write!(f, "system keyring"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Absent => write!(f, "nowhere"),
        }
    }
}

/// A token together with the backend it was read from.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredToken {
    /// The opaque token value.
    pub token: String,
    /// The backend that holds it.
    pub location: CredentialLocation,
}

impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("token", &"[REDACTED]")
            .field("location", &self.location)
            .finish()
    }
}

/// Caller-supplied constraints for storing a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    /// Whether the token may fall back to the plaintext config file.
    pub allow_plaintext: bool,
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self {
            allow_plaintext: true,
        }
    }
}
