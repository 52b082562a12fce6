// ABOUTME: Schema introspection query and fetching through the regular execution path
// ABOUTME: The response is extracted at `__schema` and cached like any cacheable query

use crate::executor::QueryExecutor;
use crate::pagination::Paginator;
use crate::query::{Query, QueryNode};
use crate::schema::IntrospectionSchema;
use crate::{Result, WclClient};

pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    types {
      ...FullType
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}"#;

/// The introspection query: tree `__schema`, sent as the literal document above.
pub fn schema_query() -> Query {
    Query::new(QueryNode::leaf("__schema"))
        .with_document(INTROSPECTION_QUERY)
        .with_paginator(Paginator::default().cacheable(true))
}

/// Fetches and decodes the live schema.
pub async fn fetch_schema<E: QueryExecutor + ?Sized>(executor: &E) -> Result<IntrospectionSchema> {
    let mut query = schema_query();
    let body = executor.execute(&mut query).await?;
    log::debug!("decoding introspection schema");
    Ok(serde_json::from_value(body)?)
}

impl WclClient {
    /// Introspects the endpoint this client talks to.
    pub async fn schema(&self) -> Result<IntrospectionSchema> {
        fetch_schema(self).await
    }
}
