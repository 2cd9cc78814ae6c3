//! Authentication command handlers.

use std::io::{self, Write};

use http::HeaderValue;
use tracing::debug;

use crate::auth::{CredentialLocation, CredentialResolver, WritePolicy};
use crate::client::{ApiClientFactory, GitpodApi, HttpClientFactory};
use crate::config::settings::VERIFY_TIMEOUT;
use crate::config::{config_file, ApiConfig, ConfigStore};
use crate::error::{GitpodError, Result};

/// Handle the `gitpod auth login <token>` command.
pub async fn handle_login(token: &str, no_verify: bool, prevent_plain: bool) -> Result<()> {
    let config = ConfigStore::open_default()?;
    let resolver = CredentialResolver::with_default_backends(&config);
    let api_config = ApiConfig::from_store(&config, VERIFY_TIMEOUT)?;
    let policy = WritePolicy {
        allow_plaintext: !prevent_plain,
    };

    login(
        &resolver,
        &api_config,
        &HttpClientFactory,
        token,
        no_verify,
        policy,
        &mut io::stdout(),
    )
    .await
}

/// Handle the `gitpod auth logout` command.
///
/// The config file is loaded lazily so an unreadable file does not keep the
/// keyring copy from being removed.
pub fn handle_logout() -> Result<()> {
    let config = ConfigStore::new(config_file()?);
    let resolver = CredentialResolver::with_default_backends(&config);

    logout(&resolver, &mut io::stdout())
}

/// Handle the `gitpod auth status` command.
pub async fn handle_status() -> Result<()> {
    let config = ConfigStore::new(config_file()?);
    let resolver = CredentialResolver::with_default_backends(&config);

    status(&resolver, &config, &HttpClientFactory, &mut io::stdout()).await
}

/// Stores `token` after checking it against the API.
///
/// With `no_verify` the check is skipped and the token is stored as given.
pub async fn login(
    resolver: &CredentialResolver<'_>,
    api_config: &ApiConfig,
    factory: &dyn ApiClientFactory,
    token: &str,
    no_verify: bool,
    policy: WritePolicy,
    out: &mut impl Write,
) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(GitpodError::InvalidArgument(
            "token must not be empty".to_string(),
        ));
    }
    if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
        return Err(GitpodError::InvalidArgument(
            "token contains characters that cannot be sent in a request header".to_string(),
        ));
    }

    if no_verify {
        debug!("Skipping credential verification");
    } else {
        let api = factory.connect(api_config, token)?;
        verify(api.as_ref(), &api_config.host).await?;
    }

    debug!(previous = %resolver.location(), "Storing credential");
    let location = resolver.write(token, policy)?;

    if location == CredentialLocation::ConfigFile {
        writeln!(
            out,
            "Saved token to config file because the system keyring was not available"
        )?;
    } else {
        writeln!(out, "Saved token to {location}")?;
    }
    writeln!(out, "Successfully logged in to {}", api_config.host)?;

    Ok(())
}

/// Removes the stored token from every backend.
pub fn logout(resolver: &CredentialResolver<'_>, out: &mut impl Write) -> Result<()> {
    let removed = resolver.delete()?;

    if removed.is_empty() {
        writeln!(out, "Not currently logged in.")?;
    } else {
        writeln!(out, "Successfully logged out.")?;
    }

    Ok(())
}

/// Reports whether a token is stored and whether the API accepts it.
///
/// No request is made, and the host is not resolved, when no token is stored.
pub async fn status(
    resolver: &CredentialResolver<'_>,
    config: &ConfigStore,
    factory: &dyn ApiClientFactory,
    out: &mut impl Write,
) -> Result<()> {
    let Some(stored) = resolver.read() else {
        return print_not_logged_in(out);
    };

    let api_config = ApiConfig::from_store(config, VERIFY_TIMEOUT)?;
    let api = factory.connect(&api_config, &stored.token)?;
    match verify(api.as_ref(), &api_config.host).await {
        Ok(()) => {
            writeln!(out, "Logged in to {}", api_config.host)?;
            writeln!(out)?;
            writeln!(out, "  Token stored in: {}", stored.location)?;
            Ok(())
        },
        Err(e) if e.requires_reauth() => {
            writeln!(
                out,
                "Logged in with invalid credentials. Please login again."
            )?;
            Err(e)
        },
        Err(e) => Err(e),
    }
}

/// Prints the notice shown by authenticated commands when no token is stored.
pub fn print_not_logged_in(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Not logged in")?;
    writeln!(out)?;
    writeln!(out, "Run 'gitpod auth login <token>' to authenticate.")?;
    Ok(())
}

/// Checks that the API accepts the token.
///
/// A rejection becomes [`GitpodError::VerificationFailed`]; network and
/// server failures are passed through unchanged.
async fn verify(api: &dyn GitpodApi, host: &str) -> Result<()> {
    match api.list_personal_access_tokens().await {
        Ok(_) => {
            debug!(host, "Credential verified");
            Ok(())
        },
        Err(GitpodError::Unauthorized | GitpodError::ApiError { status: 403, .. }) => {
            Err(GitpodError::VerificationFailed {
                host: host.to_string(),
            })
        },
        Err(e) => Err(e),
    }
}
