// ABOUTME: End-to-end tests for the command handlers against a mocked Warcraft Logs API
// ABOUTME: Covers code generation to disk, paginated query files and client construction

use mockito::{Matcher, Server};
use serde_json::{Value, json};
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;
use wcl_cli::commands::{self, QueryOptions};
use wcl_cli::config::Config;
use wcl_cli::output::FileSourceWriter;
use wcl_sdk::{CachedExecutor, QueryExecutor, StaticToken, TokenProvider, WclClient, WclError};

fn client_for(server: &Server) -> WclClient {
    WclClient::builder()
        .token_provider(Arc::new(StaticToken::bearer("test-token")) as Arc<dyn TokenProvider>)
        .endpoint(format!("{}/api/v2/client", server.url()))
        .max_retries(0)
        .build()
        .expect("client builds")
}

fn schema_response() -> Value {
    json!({
        "data": {
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": null,
                "types": [
                    {
                        "kind": "ENUM",
                        "name": "RankingTimeframeType",
                        "description": "Whether rankings are today or historical.",
                        "enumValues": [
                            { "name": "Today", "description": "Compare against today's rankings." },
                            { "name": "Historical", "description": "Compare against historical rankings." }
                        ]
                    },
                    {
                        "kind": "OBJECT",
                        "name": "RateLimitData",
                        "description": "A way to obtain your current rate limit usage.",
                        "fields": [
                            {
                                "name": "limitPerHour",
                                "description": "The total amount of points this API key can spend per hour.",
                                "args": [],
                                "type": {
                                    "kind": "NON_NULL",
                                    "name": null,
                                    "ofType": { "kind": "SCALAR", "name": "Int", "ofType": null }
                                }
                            }
                        ]
                    },
                    { "kind": "SCALAR", "name": "Int", "description": null }
                ]
            }
        }
    })
}

fn write_query_file(dir: &TempDir, tree: Value) -> std::path::PathBuf {
    let path = dir.path().join("query.json");
    std::fs::write(&path, tree.to_string()).expect("write query file");
    path
}

#[tokio::test]
async fn test_generate_writes_sources() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/client")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Regex("IntrospectionQuery".to_string()))
        .with_status(200)
        .with_body(schema_response().to_string())
        .expect(1)
        .create_async()
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut writer = FileSourceWriter::new(temp_dir.path().join("types"));
    let client = client_for(&server);

    commands::generate(&client, &mut writer).await.unwrap();

    mock.assert_async().await;
    let enums = std::fs::read_to_string(temp_dir.path().join("types/enums.rs")).unwrap();
    let objects = std::fs::read_to_string(temp_dir.path().join("types/objects.rs")).unwrap();

    assert!(enums.contains("pub const GQL_RankingTimeframeType: GqlEnum"));
    assert!(enums.contains("\"Today\",      // Compare against today's rankings."));
    assert!(objects.contains("/// A way to obtain your current rate limit usage."));
    assert!(objects.contains("type_chain: &[\"NON_NULL\", \"Int\"],"));
    assert_eq!(writer.written().len(), 2);
}

#[tokio::test]
async fn test_paginated_query_file() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/api/v2/client")
        .match_body(Matcher::UrlEncoded(
            "query".to_string(),
            "query { reportData { report(code: \"abc\") { events { data nextPageTimestamp } } } }"
                .to_string(),
        ))
        .with_status(200)
        .with_body(
            json!({ "data": { "reportData": { "report": { "events": {
                "data": [{ "type": "cast" }], "nextPageTimestamp": 1500
            } } } } })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("POST", "/api/v2/client")
        .match_body(Matcher::UrlEncoded(
            "query".to_string(),
            "query { reportData { report(code: \"abc\") { events(startTime: 1500) { data nextPageTimestamp } } } }"
                .to_string(),
        ))
        .with_status(200)
        .with_body(
            json!({ "data": { "reportData": { "report": { "events": {
                "data": [{ "type": "damage" }], "nextPageTimestamp": null
            } } } } })
            .to_string(),
        )
        .create_async()
        .await;

    let temp_dir = TempDir::new().unwrap();
    let path = write_query_file(
        &temp_dir,
        json!({
            "name": "reportData",
            "fields": [{
                "name": "report",
                "args": { "code": "abc" },
                "fields": [{
                    "name": "events",
                    "args": { "startTime": { "variable": "startTime" } },
                    "fields": [{ "name": "data" }, { "name": "nextPageTimestamp" }]
                }]
            }]
        }),
    );
    let options = QueryOptions {
        pagination_field: Some("nextPageTimestamp".to_string()),
        overrides: Some("startTime".to_string()),
        ..Default::default()
    };

    let mut query = commands::load_query(&path, options).unwrap();
    let body = client_for(&server).execute(&mut query).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(
        body,
        json!({ "data": [{ "type": "cast" }, { "type": "damage" }], "nextPageTimestamp": 1500 })
    );
}

#[tokio::test]
async fn test_cached_schema_dump_hits_api_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/client")
        .with_status(200)
        .with_body(schema_response().to_string())
        .expect(1)
        .create_async()
        .await;

    let executor = CachedExecutor::new(client_for(&server));
    let first = commands::dump_schema(&executor).await.unwrap();
    let second = commands::dump_schema(&executor).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(first["types"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_persistent_cache_serves_later_runs() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/client")
        .with_status(200)
        .with_body(schema_response().to_string())
        .expect(1)
        .create_async()
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        cache_path: Some(temp_dir.path().join("cache").join("cache.db")),
        ..Default::default()
    };

    let first_run = commands::build_executor(&config, client_for(&server)).unwrap();
    let first = commands::dump_schema(first_run.as_ref()).await.unwrap();
    drop(first_run);
    let second_run = commands::build_executor(&config, client_for(&server)).unwrap();
    let second = commands::dump_schema(second_run.as_ref()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert!(temp_dir.path().join("cache").join("cache.db").exists());
}

#[tokio::test]
async fn test_disabled_cache_always_hits_api() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/client")
        .with_status(200)
        .with_body(schema_response().to_string())
        .expect(2)
        .create_async()
        .await;
    let config: Config = toml::from_str("cache = false\n").unwrap();

    let executor = commands::build_executor(&config, client_for(&server)).unwrap();
    commands::dump_schema(executor.as_ref()).await.unwrap();
    commands::dump_schema(executor.as_ref()).await.unwrap();

    mock.assert_async().await;
}

#[test]
fn test_vars_are_bound_onto_query() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_query_file(&temp_dir, json!({ "name": "rateLimitData" }));
    let options = QueryOptions {
        vars: vec!["code=abc".to_string(), "fightIDs=[1,2]".to_string()],
        cacheable: true,
        ..Default::default()
    };

    let query = commands::load_query(&path, options).unwrap();

    assert_eq!(query.variables["code"], json!("abc"));
    assert_eq!(query.variables["fightIDs"], json!([1, 2]));
    assert!(query.paginator.cacheable);
}

#[test]
#[serial]
fn test_build_client_requires_credentials() {
    // SAFETY: serialized with the other environment tests
    unsafe {
        std::env::remove_var("WCL_CLIENT_ID");
        std::env::remove_var("WCL_CLIENT_SECRET");
    }

    let err = commands::build_client(&Config::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WclError>(),
        Some(WclError::OAuthConfig)
    ));
}

#[test]
#[serial]
fn test_build_client_uses_config() {
    // SAFETY: serialized with the other environment tests
    unsafe {
        std::env::set_var("WCL_CLIENT_ID", "client-id");
        std::env::set_var("WCL_CLIENT_SECRET", "client-secret");
    }

    let config: Config = toml::from_str(
        "endpoint = \"https://www.warcraftlogs.com/api/v2/user\"\nmax_pages = 7\n",
    )
    .unwrap();
    let (_, client) = commands::build_client(&config).unwrap();

    assert_eq!(client.endpoint(), "https://www.warcraftlogs.com/api/v2/user");
    assert_eq!(client.max_pages(), 7);

    unsafe {
        std::env::remove_var("WCL_CLIENT_ID");
        std::env::remove_var("WCL_CLIENT_SECRET");
    }
}
