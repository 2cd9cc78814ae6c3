//! Gitpod public API client.
//!
//! The public API speaks the Connect protocol: every RPC is an HTTP `POST`
//! to `/<package>.<Service>/<Method>` with a JSON body. Errors come back as
//! `{"code": "...", "message": "..."}` with a matching HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::client::middleware::AuthMiddleware;
use crate::config::ApiConfig;
use crate::error::{GitpodError, Result};
use crate::workspace::Workspace;

const LIST_PERSONAL_ACCESS_TOKENS: &str =
    "gitpod.experimental.v1.TokensService/ListPersonalAccessTokens";
const LIST_WORKSPACES: &str = "gitpod.experimental.v1.WorkspacesService/ListWorkspaces";

/// A personal access token as listed by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalAccessToken {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remote operations the CLI consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitpodApi: Send + Sync {
    /// Lists the caller's personal access tokens. Cheap, authenticated call
    /// used to check that a token is accepted.
    async fn list_personal_access_tokens(&self) -> Result<Vec<PersonalAccessToken>>;

    /// Lists the caller's workspaces.
    async fn list_workspaces(&self) -> Result<Vec<Workspace>>;
}

/// Builds authenticated API clients.
#[cfg_attr(test, mockall::automock)]
pub trait ApiClientFactory {
    /// Connects to the API described by `config` using `token`.
    fn connect(&self, config: &ApiConfig, token: &str) -> Result<Box<dyn GitpodApi>>;
}

/// Factory for the real HTTP client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl ApiClientFactory for HttpClientFactory {
    fn connect(&self, config: &ApiConfig, token: &str) -> Result<Box<dyn GitpodApi>> {
        Ok(Box::new(GitpodClient::new(config, token)?))
    }
}

/// HTTP client for the Gitpod public API.
pub struct GitpodClient {
    client: ClientWithMiddleware,
    base_url: Url,
    timeout: Duration,
}

impl GitpodClient {
    /// Create a new API client authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, token: &str) -> Result<Self> {
        let inner_client = Client::builder()
            .user_agent(format!("gitpod-cli/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        let client = ClientBuilder::new(inner_client)
            .with(AuthMiddleware::new(token))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    /// Performs one unary Connect call.
    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.base_url.join(method)?;
        tracing::debug!(%url, "Calling Gitpod API");

        let send = self
            .client
            .post(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .header("connect-protocol-version", "1")
            .body(serde_json::to_string(request)?)
            .send();

        let response = tokio::time::timeout(self.timeout, send).await??;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GitpodApi for GitpodClient {
    async fn list_personal_access_tokens(&self) -> Result<Vec<PersonalAccessToken>> {
        #[derive(Deserialize)]
        struct ListPersonalAccessTokensResponse {
            #[serde(default)]
            tokens: Vec<PersonalAccessToken>,
        }

        let response: ListPersonalAccessTokensResponse = self
            .call(LIST_PERSONAL_ACCESS_TOKENS, &serde_json::json!({}))
            .await?;
        Ok(response.tokens)
    }

    async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        #[derive(Deserialize)]
        struct ListWorkspacesResponse {
            #[serde(default)]
            result: Vec<Workspace>,
        }

        let response: ListWorkspacesResponse =
            self.call(LIST_WORKSPACES, &serde_json::json!({})).await?;
        tracing::debug!(count = response.result.len(), "Listed workspaces");
        Ok(response.result)
    }
}

/// Maps a non-success response to an error.
fn error_from_response(status: StatusCode, body: &str) -> GitpodError {
    #[derive(Deserialize)]
    struct ConnectError {
        #[serde(default)]
        code: String,
        #[serde(default)]
        message: String,
    }

    let connect_error = serde_json::from_str::<ConnectError>(body).ok();

    if status == StatusCode::UNAUTHORIZED
        || connect_error
            .as_ref()
            .is_some_and(|e| e.code == "unauthenticated")
    {
        return GitpodError::Unauthorized;
    }

    if status == StatusCode::SERVICE_UNAVAILABLE {
        return GitpodError::ApiUnavailable;
    }

    let message = match connect_error {
        Some(e) if !e.message.is_empty() => e.message,
        Some(e) if !e.code.is_empty() => e.code,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    GitpodError::ApiError {
        status: status.as_u16(),
        message,
    }
}
