// ABOUTME: Warcraft Logs SDK: schema-driven code generation and a paginating GraphQL client
// ABOUTME: Wires token providers, HTTP transport, execution and response caching together

use std::sync::Arc;

pub mod builder;
pub mod cache;
pub mod codegen;
pub mod constants;
pub mod error;
pub mod executor;
pub mod introspection;
#[cfg(feature = "oauth")]
pub mod oauth;
pub mod pagination;
pub mod persistent;
pub mod primitives;
pub mod query;
pub mod retry;
pub mod schema;
pub mod storage;
pub mod token;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use builder::WclClientConfig;
pub use cache::{CacheStats, QueryCache};
pub use codegen::{GeneratedSources, SchemaCodeGenerator, SourceWriter};
pub use error::WclError;
pub use executor::{CachedExecutor, QueryExecutor};
#[cfg(feature = "oauth")]
pub use oauth::ClientCredentialsProvider;
pub use pagination::Paginator;
pub use persistent::DiskStore;
pub use query::{Argument, Query, QueryNode, QueryPath};
pub use schema::IntrospectionSchema;
pub use token::{StaticToken, StoredToken, TokenProvider};
pub use transport::{HttpTransport, Transport};

pub type Result<T> = std::result::Result<T, WclError>;

/// Execution context for one API endpoint and credential source.
pub struct WclClient {
    endpoint: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    max_pages: usize,
}

impl WclClient {
    /// Client for the public v2 endpoint with default transport settings.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Self::builder().token_provider(tokens).build()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

impl std::fmt::Debug for WclClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WclClient")
            .field("endpoint", &self.endpoint)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}
