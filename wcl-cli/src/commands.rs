// ABOUTME: Command handlers behind the wcl subcommands
// ABOUTME: Builds the client from config and runs generation, queries and schema dumps

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use wcl_sdk::introspection::{fetch_schema, schema_query};
use wcl_sdk::{
    CachedExecutor, ClientCredentialsProvider, Query, QueryCache, QueryExecutor, QueryNode,
    SchemaCodeGenerator, SourceWriter, TokenProvider, WclClient,
};

use crate::config::Config;

/// Command-line overrides applied on top of a query file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub pagination_field: Option<String>,
    pub overrides: Option<String>,
    pub cacheable: bool,
    pub vars: Vec<String>,
}

/// Token provider and client for the configured endpoint.
pub fn build_client(config: &Config) -> Result<(Arc<ClientCredentialsProvider>, WclClient)> {
    let provider = Arc::new(ClientCredentialsProvider::from_env(
        config.token_url(),
        Some(config.token_path()),
    )?);

    let client = WclClient::builder()
        .token_provider(provider.clone() as Arc<dyn TokenProvider>)
        .endpoint(config.endpoint())
        .timeout(config.timeout())
        .max_pages(config.max_pages())
        .build()
        .context("Failed to create Warcraft Logs client")?;

    Ok((provider, client))
}

/// Wraps the client in the configured cache: none, in memory, or persisted at `cache_path`.
pub fn build_executor<E: QueryExecutor + 'static>(
    config: &Config,
    client: E,
) -> Result<Box<dyn QueryExecutor>> {
    if !config.cache_enabled() {
        return Ok(Box::new(client));
    }

    let cache = match config.cache_path() {
        Some(path) => QueryCache::persistent(path)
            .with_context(|| format!("Failed to open query cache: {}", path.display()))?,
        None => QueryCache::new(),
    };
    Ok(Box::new(CachedExecutor::with_cache(client, Arc::new(cache))))
}

/// Parses a query file: either a bare tree or an object with a `tree` key.
pub fn parse_query(contents: &str) -> Result<Query> {
    let value: Value = serde_json::from_str(contents).context("Query file is not valid JSON")?;

    if value.get("tree").is_some() {
        serde_json::from_value(value).context("Invalid query")
    } else {
        let tree: QueryNode = serde_json::from_value(value).context("Invalid query tree")?;
        Ok(Query::new(tree))
    }
}

/// Splits `NAME=VALUE`; the value is JSON when it parses as JSON, otherwise a string.
pub fn parse_var(binding: &str) -> Result<(String, Value)> {
    let (name, raw) = binding
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected NAME=VALUE, got '{binding}'"))?;
    if name.is_empty() {
        return Err(anyhow!("Variable name missing in '{binding}'"));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

pub fn load_query(path: &Path, options: QueryOptions) -> Result<Query> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file: {}", path.display()))?;
    let mut query = parse_query(&contents)
        .with_context(|| format!("Failed to load query file: {}", path.display()))?;

    if options.pagination_field.is_some() {
        query.paginator.pagination_field = options.pagination_field;
    }
    if options.overrides.is_some() {
        query.paginator.overrides = options.overrides;
    }
    query.paginator.cacheable |= options.cacheable;

    for binding in &options.vars {
        let (name, value) = parse_var(binding)?;
        query.update(name, value);
    }
    Ok(query)
}

/// Introspects the API and writes the generated enum and object sources.
pub async fn generate<E: QueryExecutor + ?Sized>(
    executor: &E,
    writer: &mut dyn SourceWriter,
) -> Result<()> {
    let schema = fetch_schema(executor)
        .await
        .context("Failed to fetch the introspection schema")?;
    let sources = SchemaCodeGenerator::generate(&schema).context("Failed to generate sources")?;
    SchemaCodeGenerator::emit(&sources, writer).context("Failed to write generated sources")?;
    Ok(())
}

/// Raw `__schema` body.
pub async fn dump_schema<E: QueryExecutor + ?Sized>(executor: &E) -> Result<Value> {
    Ok(executor.execute(&mut schema_query()).await?)
}
