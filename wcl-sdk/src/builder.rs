// ABOUTME: Builder pattern implementation for WclClient configuration
// ABOUTME: Provides type-safe configuration with compile-time required fields

use std::sync::Arc;
use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

use crate::WclClient;
use crate::constants::{pagination, retry, timeouts, urls};
use crate::error::WclError;
use crate::retry::RetryConfig;
use crate::token::TokenProvider;
use crate::transport::{HttpTransport, Transport};

#[derive(TypedBuilder)]
#[builder(build_method(into = Result<WclClient, WclError>))]
pub struct WclClientConfig {
    pub token_provider: Arc<dyn TokenProvider>,

    #[builder(default = urls::WCL_API_CLIENT.to_string(), setter(into))]
    pub endpoint: String,

    #[builder(default = timeouts::HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = retry::MAX_RETRIES)]
    pub max_retries: u32,

    #[builder(default = pagination::MAX_PAGES)]
    pub max_pages: usize,

    /// Replaces the HTTP transport; `timeout` and `max_retries` are then unused.
    #[builder(default = None, setter(strip_option))]
    pub transport: Option<Arc<dyn Transport>>,
}

impl From<WclClientConfig> for Result<WclClient, WclError> {
    fn from(config: WclClientConfig) -> Self {
        WclClient::from_config(config)
    }
}

impl WclClient {
    pub fn builder() -> WclClientConfigBuilder<((), (), (), (), (), ())> {
        WclClientConfig::builder()
    }

    pub fn from_config(config: WclClientConfig) -> Result<Self, WclError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| WclError::Configuration(format!("Invalid endpoint URL: {}", e)))?;

        if config.max_pages == 0 {
            return Err(WclError::Configuration(
                "max_pages must be at least 1".to_string(),
            ));
        }

        let transport = match config.transport {
            Some(transport) => transport,
            None => {
                let retry = RetryConfig {
                    max_retries: config.max_retries,
                    ..RetryConfig::default()
                };
                Arc::new(HttpTransport::new(config.timeout, retry)?)
            }
        };

        Ok(Self {
            endpoint: endpoint.to_string(),
            transport,
            tokens: config.token_provider,
            max_pages: config.max_pages,
        })
    }
}
