// ABOUTME: Test helper utilities for mocking Warcraft Logs API responses and servers
// ABOUTME: Provides mockito servers plus scripted transport and token fakes for executor tests

use async_trait::async_trait;
use mockito::{Server, ServerGuard};
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::WclError;
use crate::schema::IntrospectionSchema;
use crate::token::TokenProvider;
use crate::transport::Transport;
use crate::{Result, WclClient};

pub async fn mock_wcl_server() -> ServerGuard {
    Server::new_async().await
}

pub fn mock_unauthenticated_response() -> Value {
    json!({ "error": "Unauthenticated." })
}

pub fn mock_graphql_error_response() -> Value {
    json!({
        "data": null,
        "errors": [
            {
                "message": "Cannot query field \"foo\" on type \"Report\".",
                "locations": [{ "line": 1, "column": 30 }]
            }
        ]
    })
}

pub fn mock_token_response(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 31_104_000
    })
}

/// Two scalars, one enum and the `Report` / `ReportFight` objects, in that order.
pub fn mock_introspection_schema() -> IntrospectionSchema {
    let string = json!({ "kind": "SCALAR", "name": "String", "ofType": null });
    let int = json!({ "kind": "SCALAR", "name": "Int", "ofType": null });
    let non_null = |inner: &Value| json!({ "kind": "NON_NULL", "name": null, "ofType": inner });

    serde_json::from_value(json!({
        "types": [
            { "kind": "SCALAR", "name": "String", "description": "Built-in string." },
            {
                "kind": "ENUM",
                "name": "KillType",
                "description": "Filters fights by outcome.",
                "enumValues": [
                    { "name": "All", "description": "Include trash and encounters." },
                    { "name": "Encounters", "description": "Only include encounters." },
                    { "name": "Kills", "description": "Only include encounters that ended in kills." },
                    { "name": "Trash", "description": null },
                    { "name": "Wipes", "description": "Only include encounters that ended in wipes." }
                ]
            },
            {
                "kind": "OBJECT",
                "name": "Report",
                "description": "A single report uploaded by a player to a guild or personal logs.",
                "fields": [
                    {
                        "name": "code",
                        "description": "The report code, a unique value used to identify the report.",
                        "args": [],
                        "type": non_null(&string)
                    },
                    {
                        "name": "fights",
                        "description": "A set of fights with details about participating players.",
                        "args": [
                            {
                                "name": "killType",
                                "description": "Optional. Only fights that match this kill type are returned.",
                                "type": { "kind": "ENUM", "name": "KillType", "ofType": null }
                            },
                            {
                                "name": "fightIDs",
                                "description": null,
                                "type": {
                                    "kind": "LIST",
                                    "name": null,
                                    "ofType": int
                                }
                            }
                        ],
                        "type": {
                            "kind": "LIST",
                            "name": null,
                            "ofType": { "kind": "OBJECT", "name": "ReportFight", "ofType": null }
                        }
                    }
                ]
            },
            {
                "kind": "OBJECT",
                "name": "ReportFight",
                "description": "The ReportFight represents a single fight that occurs in the report.",
                "fields": [
                    {
                        "name": "id",
                        "description": "The report ID of the fight.",
                        "args": [],
                        "type": non_null(&int)
                    },
                    {
                        "name": "name",
                        "description": "The name of the fight.",
                        "args": [],
                        "type": non_null(&string)
                    }
                ]
            },
            { "kind": "SCALAR", "name": "Int", "description": null }
        ]
    }))
    .expect("mock introspection schema is valid")
}

/// Transport answering each post with the next queued JSON response.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Value>>,
    documents: Mutex<Vec<String>>,
    authorizations: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            documents: Mutex::new(Vec::new()),
            authorizations: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn documents(&self) -> Vec<String> {
        self.documents.lock().clone()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.authorizations.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(
        &self,
        _endpoint: &str,
        authorization: &SecretString,
        query: &str,
    ) -> Result<String> {
        self.documents.lock().push(query.to_string());
        self.authorizations
            .lock()
            .push(authorization.expose_secret().to_string());

        self.responses
            .lock()
            .pop_front()
            .map(|response| response.to_string())
            .ok_or_else(|| WclError::Network("no scripted response left".to_string()))
    }
}

/// Token provider handing out `Bearer token-<n>`, where n counts refreshes.
pub struct CountingTokens {
    refreshes: AtomicUsize,
}

impl CountingTokens {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            refreshes: AtomicUsize::new(0),
        })
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn current(&self) -> SecretString {
        SecretString::new(format!("Bearer token-{}", self.refreshes()).into_boxed_str())
    }
}

#[async_trait]
impl TokenProvider for CountingTokens {
    async fn authorization(&self) -> Result<SecretString> {
        Ok(self.current())
    }

    async fn refresh(&self) -> Result<SecretString> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(self.current())
    }
}

pub fn test_client(transport: Arc<ScriptedTransport>, tokens: Arc<CountingTokens>) -> WclClient {
    WclClient::builder()
        .token_provider(tokens as Arc<dyn TokenProvider>)
        .transport(transport as Arc<dyn Transport>)
        .max_pages(10)
        .build()
        .expect("test client builds")
}
