//! Access tokens for Firestore requests
//!
//! Obtaining credentials is left to the environment: either an access token
//! is handed over through configuration, or the metadata server of the
//! machine we run on issues one. The token is attached to every request as
//! `Authorization: Bearer <token>`. Against the emulator the fixed `owner`
//! token is sent, which the emulator treats as an admin caller.

use crate::config::{secret_string, AuthType, FirestoreConfig, SecretString};
use crate::domain::{ExporterError, FirestoreError, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

/// Bearer token the Firestore emulator accepts as an admin caller
pub const EMULATOR_OWNER_TOKEN: &str = "owner";

/// Token response of the GCE / Cloud Run metadata server
#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Source of the bearer token attached to requests
#[derive(Debug)]
pub enum TokenProvider {
    /// Token supplied by configuration
    Static(SecretString),

    /// Token fetched once from the metadata server and reused for the run
    Metadata {
        url: String,
        cached: OnceCell<SecretString>,
    },

    /// Fixed `owner` token understood by the Firestore emulator
    Emulator(SecretString),

    /// No authentication
    Anonymous,
}

impl TokenProvider {
    /// Builds the provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an authentication error when bearer auth is selected without a token.
    pub fn from_config(config: &FirestoreConfig) -> Result<Self> {
        match config.auth_type {
            AuthType::Bearer => config
                .access_token
                .clone()
                .map(TokenProvider::Static)
                .ok_or_else(|| {
                    ExporterError::Authentication(
                        "auth_type is 'bearer' but no access_token is configured".to_string(),
                    )
                }),
            AuthType::Metadata => Ok(TokenProvider::Metadata {
                url: config.metadata_url.clone(),
                cached: OnceCell::new(),
            }),
            AuthType::Emulator => Ok(TokenProvider::Emulator(secret_string(
                EMULATOR_OWNER_TOKEN.to_string(),
            ))),
            AuthType::Anonymous => Ok(TokenProvider::Anonymous),
        }
    }

    /// Returns the token to send, if any
    pub async fn token(&self, http: &Client) -> Result<Option<&SecretString>> {
        match self {
            TokenProvider::Static(token) | TokenProvider::Emulator(token) => Ok(Some(token)),
            TokenProvider::Metadata { url, cached } => {
                let token = cached
                    .get_or_try_init(|| fetch_metadata_token(http, url))
                    .await?;
                Ok(Some(token))
            }
            TokenProvider::Anonymous => Ok(None),
        }
    }
}

async fn fetch_metadata_token(http: &Client, url: &str) -> Result<SecretString> {
    tracing::debug!(url = %url, "Requesting access token from metadata server");

    let response = http
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| {
            FirestoreError::AuthenticationFailed(format!("metadata server unreachable: {e}"))
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FirestoreError::AuthenticationFailed(format!(
            "metadata server returned {status}: {body}"
        ))
        .into());
    }

    let token: MetadataToken = response.json().await.map_err(|e| {
        FirestoreError::AuthenticationFailed(format!("invalid metadata token response: {e}"))
    })?;

    tracing::info!(
        expires_in_secs = token.expires_in.unwrap_or_default(),
        "Obtained access token from metadata server"
    );

    Ok(secret_string(token.access_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn config(auth_type: AuthType) -> FirestoreConfig {
        FirestoreConfig {
            project_id: "demo-project".to_string(),
            auth_type,
            ..FirestoreConfig::default()
        }
    }

    #[tokio::test]
    async fn test_static_token() {
        let mut config = config(AuthType::Bearer);
        config.access_token = Some(secret_string("abc".to_string()));

        let provider = TokenProvider::from_config(&config).unwrap();
        let token = provider.token(&Client::new()).await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "abc");
    }

    #[test]
    fn test_bearer_without_token() {
        let result = TokenProvider::from_config(&config(AuthType::Bearer));
        assert!(matches!(result, Err(ExporterError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_emulator_sends_owner_token() {
        let provider = TokenProvider::from_config(&config(AuthType::Emulator)).unwrap();
        let token = provider.token(&Client::new()).await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "owner");
    }

    #[tokio::test]
    async fn test_anonymous_has_no_token() {
        let provider = TokenProvider::from_config(&config(AuthType::Anonymous)).unwrap();
        assert!(provider.token(&Client::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_metadata_token_fetched_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/token")
            .match_header("metadata-flavor", "Google")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"from-metadata","expires_in":3599,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut config = config(AuthType::Metadata);
        config.metadata_url = format!("{}/token", server.url());

        let provider = TokenProvider::from_config(&config).unwrap();
        let http = Client::new();
        let first = provider.token(&http).await.unwrap().unwrap().clone();
        let second = provider.token(&http).await.unwrap().unwrap().clone();

        assert_eq!(first.expose_secret(), "from-metadata");
        assert_eq!(second.expose_secret(), "from-metadata");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_metadata_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token")
            .with_status(404)
            .with_body("not on GCE")
            .create_async()
            .await;

        let mut config = config(AuthType::Metadata);
        config.metadata_url = format!("{}/token", server.url());

        let provider = TokenProvider::from_config(&config).unwrap();
        let err = provider.token(&Client::new()).await.unwrap_err();
        assert!(err.is_connection_failure());
        assert!(err.to_string().contains("404"));
    }
}
