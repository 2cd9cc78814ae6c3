//! API client for the Gitpod public API.

pub mod api;
pub mod middleware;

pub use api::{ApiClientFactory, GitpodApi, HttpClientFactory};

#[cfg(test)]
pub use api::{MockApiClientFactory, MockGitpodApi};
