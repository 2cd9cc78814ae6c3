//! Command implementations.

pub mod auth;
pub mod completions;
pub mod config;
pub mod workspace;

pub use auth::{handle_login, handle_logout, handle_status};
pub use completions::handle_completions;
pub use config::{handle_config_get, handle_config_set};
pub use workspace::handle_workspace_list;
