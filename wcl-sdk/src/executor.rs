// ABOUTME: Query execution: build, send, one-shot auth retry, extraction and pagination
// ABOUTME: Also provides the caching executor wrapper used for cacheable queries

use async_trait::async_trait;
use graphql_client::Response;
use serde_json::Value;
use std::sync::Arc;

use crate::cache::{CacheStats, QueryCache};
use crate::constants::auth;
use crate::error::WclError;
use crate::pagination::{PageWalker, merge_page, next_cursor};
use crate::query::{Query, drill_down};
use crate::{Result, WclClient};

/// Runs a query to completion, following pagination, and returns the extracted body.
///
/// The query is mutable only so the pagination cursor variable can be advanced.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &mut Query) -> Result<Value>;

    /// Namespace for cached results. Executors talking to different servers must differ.
    fn cache_scope(&self) -> &str {
        ""
    }
}

/// True for responses rejecting the credential.
pub fn is_unauthenticated(response: &Value) -> bool {
    if response.get("error").and_then(Value::as_str) == Some(auth::UNAUTHENTICATED_MESSAGE) {
        return true;
    }

    response
        .get("errors")
        .and_then(Value::as_array)
        .is_some_and(|errors| {
            errors.iter().any(|error| {
                error.pointer("/extensions/code").and_then(Value::as_str)
                    == Some(auth::UNAUTHENTICATED_CODE)
            })
        })
}

impl WclClient {
    /// SEND, refreshing the credential and resending once on an authentication failure.
    async fn send_authenticated(&self, document: &str) -> Result<Response<Value>> {
        let mut refreshed = false;
        loop {
            let authorization = self.tokens.authorization().await?;
            log::debug!("requesting {document}");
            let text = self
                .transport
                .post(&self.endpoint, &authorization, document)
                .await?;
            let raw: Value = serde_json::from_str(&text)?;

            if !is_unauthenticated(&raw) {
                return Ok(serde_json::from_value(raw)?);
            }
            if refreshed {
                log::error!("Unauthenticated after obtaining a new token; giving up");
                return Err(WclError::auth("still unauthenticated after token refresh"));
            }

            log::warn!("Unauthenticated. Obtaining a new token and retrying");
            self.tokens.refresh().await?;
            refreshed = true;
        }
    }

    /// One round trip for the query as currently bound, drilled down to its path.
    async fn fetch_page(&self, query: &Query) -> Result<Value> {
        let document = query.document_text();
        let response = self.send_authenticated(&document).await?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            log::error!("Failed to complete {document}\n{errors:#?}");
            let message = errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(WclError::GraphQL { message, errors });
        }

        let data = response.data.unwrap_or(Value::Null);
        Ok(drill_down(&data, &query.path())
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[async_trait]
impl QueryExecutor for WclClient {
    async fn execute(&self, query: &mut Query) -> Result<Value> {
        let mut body = self.fetch_page(query).await?;

        let mut walker = PageWalker::new(self.max_pages);
        let mut cursor = next_cursor(&query.paginator, &body).cloned();
        while let Some(next) = cursor {
            walker.advance(query, next)?;
            let page = self.fetch_page(query).await?;
            cursor = next_cursor(&query.paginator, &page).cloned();
            merge_page(&mut body, page)?;
        }

        if walker.pages() > 1 {
            log::debug!("merged {} pages", walker.pages());
        }
        Ok(body)
    }

    fn cache_scope(&self) -> &str {
        &self.endpoint
    }
}

/// Executor wrapper serving cacheable queries from a [`QueryCache`].
pub struct CachedExecutor<E> {
    inner: E,
    cache: Arc<QueryCache>,
}

impl<E: QueryExecutor> CachedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self::with_cache(inner, Arc::new(QueryCache::new()))
    }

    /// Shares an existing cache, e.g. between executors of one process.
    pub fn with_cache(inner: E, cache: Arc<QueryCache>) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl<E: QueryExecutor> QueryExecutor for CachedExecutor<E> {
    async fn execute(&self, query: &mut Query) -> Result<Value> {
        if !query.paginator.cacheable {
            return self.inner.execute(query).await;
        }

        let key = format!("{}\u{1f}{}", self.inner.cache_scope(), query.identity());
        let inner = &self.inner;
        self.cache
            .get_or_execute(key, move || inner.execute(query))
            .await
    }

    fn cache_scope(&self) -> &str {
        self.inner.cache_scope()
    }
}
