//! Workspace command handlers.

use std::io::{self, Write};

use chrono::Utc;

use crate::auth::CredentialResolver;
use crate::cli::commands::auth::print_not_logged_in;
use crate::client::{ApiClientFactory, HttpClientFactory};
use crate::config::settings::LIST_TIMEOUT;
use crate::config::{ApiConfig, ConfigStore};
use crate::error::Result;
use crate::workspace::{render_json, render_table};

/// Handles the `gitpod workspace list` command.
pub async fn handle_workspace_list(json: bool) -> Result<()> {
    let config = ConfigStore::open_default()?;
    let resolver = CredentialResolver::with_default_backends(&config);

    list(&resolver, &config, &HttpClientFactory, json, &mut io::stdout()).await
}

/// Lists the workspaces of the stored credential as a table or JSON array.
///
/// Without a stored token this prints the "Not logged in" notice and makes
/// no request.
pub async fn list(
    resolver: &CredentialResolver<'_>,
    config: &ConfigStore,
    factory: &dyn ApiClientFactory,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let Some(stored) = resolver.read() else {
        return print_not_logged_in(out);
    };

    let api_config = ApiConfig::from_store(config, LIST_TIMEOUT)?;
    let api = factory.connect(&api_config, &stored.token)?;
    let workspaces = api.list_workspaces().await?;

    if json {
        writeln!(out, "{}", render_json(&workspaces)?)?;
    } else if workspaces.is_empty() {
        writeln!(out, "No workspaces found.")?;
    } else {
        write!(out, "{}", render_table(&workspaces, Utc::now()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::auth::credentials::{ConfigFileBackend, CredentialBackend, MockCredentialBackend};
    use crate::auth::{CredentialError, CredentialLocation};
    use crate::client::{GitpodApi, MockApiClientFactory, MockGitpodApi};
    use crate::config::keys;
    use crate::error::GitpodError;
    use crate::workspace::Workspace;

    fn empty_keyring() -> MockCredentialBackend {
        let mut keyring = MockCredentialBackend::new();
        keyring
            .expect_location()
            .return_const(CredentialLocation::SecureStore);
        keyring.expect_is_plaintext().return_const(false);
        keyring.expect_get().returning(|| Err(CredentialError::NotFound));
        keyring
    }

    fn resolver_for(config: &ConfigStore) -> CredentialResolver<'_> {
        let backends: Vec<Box<dyn CredentialBackend + '_>> = vec![
            Box::new(empty_keyring()),
            Box::new(ConfigFileBackend::new(config)),
        ];
        CredentialResolver::new(backends)
    }

    fn sample_workspaces() -> Vec<Workspace> {
        serde_json::from_value(json!([
            {
                "workspaceId": "ws-1",
                "ownerId": "user-1",
                "context": { "contextUrl": "https://github.com/gitpod-io/gitpod" },
                "status": { "instance": {
                    "instanceId": "inst-1",
                    "createdAt": "2023-05-01T10:00:00Z",
                    "status": { "phase": "PHASE_RUNNING" }
                } }
            },
            {
                "workspaceId": "ws-2",
                "context": { "contextUrl": "https://github.com/gitpod-io/website" },
                "status": { "instance": {
                    "createdAt": "2023-05-02T10:00:00Z",
                    "status": { "phase": "PHASE_STOPPED" }
                } }
            }
        ]))
        .unwrap()
    }

    fn factory_returning(workspaces: Vec<Workspace>) -> MockApiClientFactory {
        let mut factory = MockApiClientFactory::new();
        factory
            .expect_connect()
            .withf(|_, token| token.to_string() == "gitpod_pat_abc")
            .times(1)
            .returning(move |_, _| {
                let mut api = MockGitpodApi::new();
                let workspaces = workspaces.clone();
                api.expect_list_workspaces()
                    .times(1)
                    .returning(move || Ok(workspaces.clone()));
                Ok(Box::new(api) as Box<dyn GitpodApi>)
            });
        factory
    }

    fn logged_in_config(dir: &TempDir) -> ConfigStore {
        let config = ConfigStore::open(dir.path().join("config.toml")).unwrap();
        config.set(keys::TOKEN, "gitpod_pat_abc").unwrap();
        config
    }

    #[tokio::test]
    async fn list_as_json_outputs_every_workspace() {
        let dir = TempDir::new().unwrap();
        let config = logged_in_config(&dir);
        let resolver = resolver_for(&config);
        let mut out = Vec::new();

        list(
            &resolver,
            &config,
            &factory_returning(sample_workspaces()),
            true,
            &mut out,
        )
        .await
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["workspaceId"], "ws-1");
        assert_eq!(array[0]["ownerId"], "user-1");
    }

    #[tokio::test]
    async fn list_as_table_shows_display_phase() {
        let dir = TempDir::new().unwrap();
        let config = logged_in_config(&dir);
        let resolver = resolver_for(&config);
        let mut out = Vec::new();

        list(
            &resolver,
            &config,
            &factory_returning(sample_workspaces()),
            false,
            &mut out,
        )
        .await
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("WORKSPACE ID"));
        assert!(out.contains("| running "));
        assert!(out.contains("| stopped "));
        assert!(out.contains("https://github.com/gitpod-io/website"));
        assert!(!out.contains("PHASE_"));
    }

    #[tokio::test]
    async fn empty_list_prints_notice_or_empty_array() {
        let dir = TempDir::new().unwrap();
        let config = logged_in_config(&dir);
        let resolver = resolver_for(&config);

        let mut table = Vec::new();
        list(&resolver, &config, &factory_returning(Vec::new()), false, &mut table)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(table).unwrap(), "No workspaces found.\n");

        let mut json_out = Vec::new();
        list(&resolver, &config, &factory_returning(Vec::new()), true, &mut json_out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(json_out).unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn list_without_credential_prints_not_logged_in() {
        let dir = TempDir::new().unwrap();
        let config = ConfigStore::open(dir.path().join("config.toml")).unwrap();
        let resolver = resolver_for(&config);
        let mut factory = MockApiClientFactory::new();
        factory.expect_connect().never();
        let mut out = Vec::new();

        list(&resolver, &config, &factory, false, &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Not logged in\n"));
        assert!(out.contains("gitpod auth login"));
    }

    #[tokio::test]
    async fn list_propagates_api_errors() {
        let dir = TempDir::new().unwrap();
        let config = logged_in_config(&dir);
        let resolver = resolver_for(&config);
        let mut factory = MockApiClientFactory::new();
        factory.expect_connect().returning(|_, _| {
            let mut api = MockGitpodApi::new();
            api.expect_list_workspaces()
                .returning(|| Err(GitpodError::Unauthorized));
            Ok(Box::new(api) as Box<dyn GitpodApi>)
        });
        let mut out = Vec::new();

        let result = list(&resolver, &config, &factory, true, &mut out).await;

        assert!(matches!(result, Err(GitpodError::Unauthorized)));
    }
}
