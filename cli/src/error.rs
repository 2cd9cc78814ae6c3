//! Error types and result aliases for the gitpod CLI.
//!
//! Every variant renders as a message the user can act on; `main` prints it
//! as `Error: <message>` and exits with status 1.

use thiserror::Error;

use crate::auth::CredentialError;

/// Main error type for gitpod CLI operations.
///
/// Storage failures and verification failures are deliberately separate
/// variants so the user can tell whether to re-check the token or the local
/// environment. Use [`requires_reauth`](Self::requires_reauth) and
/// [`is_storage_error`](Self::is_storage_error) to classify an error.
#[derive(Error, Debug)]
pub enum GitpodError {
    /// A command argument was syntactically fine but unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The server rejected the token during verification.
    #[error("Credentials are invalid for {host}. Please check your token and run 'gitpod auth login <token>' again.")]
    VerificationFailed {
        /// The host the token was checked against.
        host: String,
    },

    /// The token could not be stored or removed in any permitted backend.
    #[error("Could not persist credentials: {0}")]
    CredentialPersistence(#[source] CredentialError),

    /// The API answered with a Connect error other than the ones below.
    #[error("API request failed ({status}): {message}")]
    ApiError {
        /// HTTP status of the response.
        status: u16,
        /// Connect error message, or the raw body.
        message: String,
    },

    /// The API rejected the token (401 or `unauthenticated`).
    #[error("API server returned unauthorized (401). Run 'gitpod auth login <token>' with a valid token.")]
    Unauthorized,

    /// The API could not be reached or answered 503.
    #[error("API server is unavailable. Check your network connection or the configured host.")]
    ApiUnavailable,

    /// A remote call exceeded its time bound.
    #[error("Request to the Gitpod API timed out. Try again later.")]
    Timeout,

    /// Transport failure other than connect or timeout.
    #[error("Network error: {0}. Check your connection and the configured host.")]
    Network(String),

    /// The configuration location could not be determined or loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The config file exists but cannot be read or parsed.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    ConfigRead(String),

    /// The config file cannot be written.
    #[error("Failed to write configuration file: {0}. Check directory permissions.")]
    ConfigWrite(String),

    /// Writing command output or another local IO call failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("Data serialization error: {0}")]
    Serialization(String),

    /// The configured host does not form a valid API URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GitpodError {
    /// Checks if this error can be resolved by logging in again.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::VerificationFailed { .. } | Self::Unauthorized)
    }

    /// Checks if this error comes from the local environment (keyring or
    /// config file) rather than from the token or the network.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::CredentialPersistence(_) | Self::ConfigRead(_) | Self::ConfigWrite(_)
        )
    }
}

/// Result type alias using [`GitpodError`].
pub type Result<T> = std::result::Result<T, GitpodError>;

impl From<serde_json::Error> for GitpodError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("invalid JSON: {err}"))
    }
}

impl From<toml::ser::Error> for GitpodError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigWrite(format!("cannot encode TOML: {err}"))
    }
}

impl From<reqwest::Error> for GitpodError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ApiUnavailable
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for GitpodError {
    fn from(err: reqwest_middleware::Error) -> Self {
        if let reqwest_middleware::Error::Reqwest(e) = err {
            return e.into();
        }
        let err_str = err.to_string();
        if err_str.contains("timeout") || err_str.contains("timed out") {
            Self::Timeout
        } else if err_str.contains("connect") || err_str.contains("connection") {
            Self::ApiUnavailable
        } else {
            Self::Network(err_str)
        }
    }
}

impl From<tokio::time::error::Elapsed> for GitpodError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}
