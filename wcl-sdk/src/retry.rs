// ABOUTME: Retry logic with exponential backoff for transient transport failures
// ABOUTME: Retries network errors, timeouts and rate limits; everything else is returned as is

use crate::constants::retry;
use crate::error::WclError;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            initial_delay: retry::INITIAL_DELAY,
            max_delay: retry::MAX_DELAY,
            backoff_multiplier: retry::BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryConfig {
    /// A config that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, WclError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, WclError>>,
{
    let mut delay = config.initial_delay;
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            log::debug!(
                "Retrying operation (attempt {}/{})",
                attempt,
                config.max_retries
            );
            sleep(delay).await;
            delay = std::cmp::min(
                Duration::from_millis(
                    (delay.as_millis() as f64 * config.backoff_multiplier) as u64,
                ),
                config.max_delay,
            );
        }

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !error.is_retryable() || attempt == config.max_retries {
                    return Err(error);
                }

                log::warn!("Request failed (retryable): {}", error);
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| WclError::Network("Retry failed".to_string())))
}
