//! Authentication module for the gitpod CLI.
//!
//! This module stores the personal access token in the OS keyring, falling
//! back to the config file when the keyring is unavailable, and resolves it
//! again for authenticated commands.

pub mod credentials;
pub mod error;
pub mod resolver;
pub mod tokens;

pub use error::CredentialError;
pub use resolver::CredentialResolver;
pub use tokens::{CredentialLocation, WritePolicy};
