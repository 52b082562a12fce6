// ABOUTME: OAuth2 client-credentials token provider for the Warcraft Logs API
// ABOUTME: Exchanges client id/secret for an access token and caches it on disk

#[cfg(feature = "oauth")]
use async_trait::async_trait;
#[cfg(feature = "oauth")]
use oauth2::basic::BasicClient;
#[cfg(feature = "oauth")]
use oauth2::{ClientId, ClientSecret, EndpointNotSet, EndpointSet, TokenResponse, TokenUrl};
#[cfg(feature = "oauth")]
use secrecy::{ExposeSecret, SecretString};
#[cfg(feature = "oauth")]
use std::borrow::Cow;
#[cfg(feature = "oauth")]
use std::path::PathBuf;
#[cfg(feature = "oauth")]
use tokio::sync::Mutex;

#[cfg(feature = "oauth")]
use crate::constants::auth;
#[cfg(feature = "oauth")]
use crate::token::{StoredToken, TokenProvider};
#[cfg(feature = "oauth")]
use crate::{Result, WclError, storage};

#[cfg(feature = "oauth")]
type ConfiguredClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[cfg(feature = "oauth")]
#[derive(Debug)]
pub struct ClientCredentialsProvider {
    client: ConfiguredClient,
    http_client: reqwest::Client,
    token_path: Option<PathBuf>,
    current: Mutex<Option<StoredToken>>,
}

#[cfg(feature = "oauth")]
impl ClientCredentialsProvider {
    pub fn new(
        client_id: String,
        client_secret: SecretString,
        token_url: &str,
        token_path: Option<PathBuf>,
    ) -> Result<Self> {
        if client_id.is_empty() || client_secret.expose_secret().is_empty() {
            return Err(WclError::OAuthConfig);
        }

        let token_url =
            TokenUrl::new(token_url.to_string()).map_err(|_| WclError::OAuthConfig)?;
        let client = BasicClient::new(ClientId::new(client_id))
            .set_client_secret(ClientSecret::new(
                client_secret.expose_secret().to_string(),
            ))
            .set_token_uri(token_url);

        // Redirects are not followed on the token endpoint
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            http_client,
            token_path,
            current: Mutex::new(None),
        })
    }

    /// Reads `WCL_CLIENT_ID` and `WCL_CLIENT_SECRET`.
    pub fn from_env(token_url: &str, token_path: Option<PathBuf>) -> Result<Self> {
        let client_id = std::env::var("WCL_CLIENT_ID").map_err(|_| WclError::OAuthConfig)?;
        let client_secret =
            std::env::var("WCL_CLIENT_SECRET").map_err(|_| WclError::OAuthConfig)?;

        Self::new(
            client_id,
            SecretString::new(client_secret.into_boxed_str()),
            token_url,
            token_path,
        )
    }

    async fn exchange(&self) -> Result<StoredToken> {
        let response = self
            .client
            .exchange_client_credentials()
            .request_async(&self.http_client)
            .await
            .map_err(|err| WclError::Auth {
                reason: Cow::Owned(format!("token exchange failed: {err}")),
            })?;

        let token_type = match response.token_type().as_ref() {
            kind if kind.eq_ignore_ascii_case("bearer") => "Bearer".to_string(),
            kind => kind.to_string(),
        };
        let expires_in = response
            .expires_in()
            .map(|duration| duration.as_secs() as i64)
            .unwrap_or(auth::DEFAULT_TOKEN_LIFETIME_SECS);
        let token = StoredToken::new(
            response.access_token().secret().clone(),
            token_type,
            expires_in,
        );

        if let Some(path) = &self.token_path {
            if let Err(err) = storage::store(path, &token) {
                log::warn!("could not cache token at {}: {err}", path.display());
            }
        }
        Ok(token)
    }

    fn load_cached(&self) -> Option<StoredToken> {
        let path = self.token_path.as_ref()?;
        storage::load(path)
            .ok()
            .filter(|token| !token.is_expired())
    }
}

#[cfg(feature = "oauth")]
#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn authorization(&self) -> Result<SecretString> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.authorization());
        }

        let token = match self.load_cached() {
            Some(token) => token,
            None => self.exchange().await?,
        };
        let authorization = token.authorization();
        *current = Some(token);
        Ok(authorization)
    }

    async fn refresh(&self) -> Result<SecretString> {
        let mut current = self.current.lock().await;
        log::info!("requesting a new access token");
        let token = self.exchange().await?;
        let authorization = token.authorization();
        *current = Some(token);
        Ok(authorization)
    }
}
