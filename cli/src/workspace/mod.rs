//! Workspace records and their presentation.
//!
//! - [`types`] - the workspace record returned by the API and its phase
//! - [`render`] - table and JSON output for `gitpod workspace list`

pub mod render;
pub mod types;

pub use render::{render_json, render_table};
pub use types::Workspace;
