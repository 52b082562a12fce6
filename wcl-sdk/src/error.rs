// ABOUTME: Custom error types for the Warcraft Logs SDK with user-friendly messages
// ABOUTME: Covers transport, authentication, query, schema and pagination failure modes

use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WclError {
    #[error("Authentication failed: {reason}")]
    Auth { reason: Cow<'static, str> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("GraphQL error: {message}")]
    GraphQL {
        message: String,
        errors: Vec<graphql_client::Error>,
    },

    #[error("Rate limit exceeded. Please wait before making more requests")]
    RateLimit,

    #[error("Invalid API response format: {0}")]
    InvalidResponse(String),

    #[error("Timeout: Request took too long to complete")]
    Timeout,

    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("OAuth configuration error")]
    OAuthConfig,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl WclError {
    pub fn auth(reason: &'static str) -> Self {
        WclError::Auth {
            reason: Cow::Borrowed(reason),
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            WclError::Auth { .. } => Some(
                "Check WCL_CLIENT_ID and WCL_CLIENT_SECRET, or run `wcl auth` to fetch a fresh token",
            ),
            WclError::Network(_) => Some("Check your internet connection and try again"),
            WclError::RateLimit => Some("Wait a moment before making another request"),
            WclError::Timeout => Some("Try again or raise `timeout_secs` in your config"),
            WclError::MalformedSchema(_) => {
                Some("The introspection result violates the type reference contract")
            }
            WclError::OAuthConfig => Some(
                "Create an API client at https://www.warcraftlogs.com/api/clients/\n\nThen set WCL_CLIENT_ID and WCL_CLIENT_SECRET with its credentials",
            ),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WclError::Network(_) | WclError::Timeout | WclError::RateLimit
        )
    }
}

impl From<reqwest::Error> for WclError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WclError::Timeout
        } else if let Some(status) = err.status() {
            match status {
                http::StatusCode::UNAUTHORIZED => WclError::Auth {
                    reason: Cow::Owned(err.to_string()),
                },
                http::StatusCode::TOO_MANY_REQUESTS => WclError::RateLimit,
                _ => WclError::Network(err.to_string()),
            }
        } else {
            WclError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WclError {
    fn from(err: serde_json::Error) -> Self {
        WclError::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for WclError {
    fn from(err: std::io::Error) -> Self {
        WclError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for WclError {
    fn from(err: rusqlite::Error) -> Self {
        WclError::Storage(err.to_string())
    }
}
