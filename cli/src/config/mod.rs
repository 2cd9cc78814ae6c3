//! Configuration management for the gitpod CLI.

pub mod paths;
pub mod settings;
pub mod store;

pub use paths::config_file;
pub use settings::{keys, ApiConfig};
pub use store::ConfigStore;
