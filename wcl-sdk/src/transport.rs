// ABOUTME: Transport seam for posting query documents to the GraphQL endpoint
// ABOUTME: HttpTransport sends form-encoded queries over reqwest with timeout and backoff

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::Result;
use crate::retry::{RetryConfig, retry_with_backoff};

/// Sends one query document and returns the raw response text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, authorization: &SecretString, query: &str)
    -> Result<String>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(timeout: Duration, retry: RetryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client, retry })
    }

    async fn send_once(
        &self,
        endpoint: &str,
        authorization: &SecretString,
        query: &str,
    ) -> Result<String> {
        let response = self
            .client
            .post(endpoint)
            .header(AUTHORIZATION, authorization.expose_secret())
            .header(USER_AGENT, concat!("wcl/", env!("CARGO_PKG_VERSION")))
            .form(&[("query", query)])
            .send()
            .await?;

        // The body of a 401 carries the `Unauthenticated.` signal the executor acts on.
        if response.status() == http::StatusCode::UNAUTHORIZED {
            return Ok(response.text().await?);
        }

        Ok(response.error_for_status()?.text().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        authorization: &SecretString,
        query: &str,
    ) -> Result<String> {
        retry_with_backoff(&self.retry, || {
            self.send_once(endpoint, authorization, query)
        })
        .await
    }
}
