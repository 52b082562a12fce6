// ABOUTME: Token provider seam consulted by the executor for the Authorization header
// ABOUTME: Defines the stored OAuth token format and a fixed-token provider

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Result;
use crate::error::WclError;

/// Tokens within this many seconds of expiry are treated as expired.
const EXPIRY_SKEW_SECS: f64 = 60.0;

/// Source of the `Authorization` header value.
///
/// `refresh` replaces the stored credential; implementations serialize concurrent refreshes.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn authorization(&self) -> Result<SecretString>;

    async fn refresh(&self) -> Result<SecretString>;
}

/// A fixed header value, e.g. a token obtained out of band.
pub struct StaticToken {
    authorization: SecretString,
}

impl StaticToken {
    pub fn new(authorization: SecretString) -> Self {
        Self { authorization }
    }

    pub fn bearer(access_token: &str) -> Self {
        Self::new(SecretString::new(
            format!("Bearer {access_token}").into_boxed_str(),
        ))
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn authorization(&self) -> Result<SecretString> {
        Ok(self.authorization.clone())
    }

    async fn refresh(&self) -> Result<SecretString> {
        Err(WclError::auth("a static token cannot be refreshed"))
    }
}

/// OAuth access token as persisted on disk.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    /// Unix timestamp in seconds.
    pub expires_at: f64,
}

impl StoredToken {
    pub fn new(access_token: String, token_type: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type,
            expires_in,
            expires_at: unix_now() + expires_in as f64,
        }
    }

    /// Header value, `"{token_type} {access_token}"`.
    pub fn authorization(&self) -> SecretString {
        SecretString::new(format!("{} {}", self.token_type, self.access_token).into_boxed_str())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    pub fn is_expired_at(&self, now: f64) -> bool {
        now + EXPIRY_SKEW_SECS >= self.expires_at
    }
}

impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub(crate) fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
