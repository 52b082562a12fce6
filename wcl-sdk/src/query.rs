// ABOUTME: Declarative query trees, their serialization and response path resolution
// ABOUTME: Builds query documents and finds where in a response the selected data lives

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::pagination::Paginator;

/// Argument value attached to a query node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    /// Bound from the owning query's variables when the document is built.
    Variable { variable: String },
    /// Bare enum literal such as `DESC`.
    Enum {
        #[serde(rename = "enum")]
        value: String,
    },
    Value(Value),
}

impl Argument {
    pub fn variable(name: impl Into<String>) -> Self {
        Argument::Variable {
            variable: name.into(),
        }
    }

    pub fn enum_value(value: impl Into<String>) -> Self {
        Argument::Enum {
            value: value.into(),
        }
    }
}

macro_rules! literal_argument {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Value(Value::from(value))
                }
            }
        )*
    };
}

literal_argument!(&str, String, bool, i32, i64, u32, u64, f64, Value);

/// One node of a query tree. No `fields` means a scalar selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<QueryNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<BTreeMap<String, Argument>>,
}

impl QueryNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: None,
            args: None,
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<QueryNode>) -> Self {
        Self {
            name: name.into(),
            fields: Some(fields),
            args: None,
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.args
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    fn has_fields(&self) -> bool {
        self.fields.as_ref().is_some_and(|fields| !fields.is_empty())
    }

    fn has_args(&self) -> bool {
        self.args.as_ref().is_some_and(|args| !args.is_empty())
    }

    fn write_selection(&self, variables: &BTreeMap<String, Value>, out: &mut String) {
        out.push_str(&self.name);

        let rendered_args: Vec<String> = self
            .args
            .iter()
            .flatten()
            .filter_map(|(name, argument)| {
                let literal = match argument {
                    Argument::Variable { variable } => graphql_literal(variables.get(variable)?),
                    Argument::Enum { value } => value.clone(),
                    Argument::Value(value) => graphql_literal(value),
                };
                Some(format!("{name}: {literal}"))
            })
            .collect();
        if !rendered_args.is_empty() {
            out.push('(');
            out.push_str(&rendered_args.join(", "));
            out.push(')');
        }

        if let Some(fields) = self.fields.as_ref().filter(|fields| !fields.is_empty()) {
            out.push_str(" { ");
            for (index, field) in fields.iter().enumerate() {
                if index > 0 {
                    out.push(' ');
                }
                field.write_selection(variables, out);
            }
            out.push_str(" }");
        }
    }
}

/// Renders a JSON value as a GraphQL input literal.
pub fn graphql_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(graphql_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{key}: {}", graphql_literal(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Where the meaningful data sits inside a response's `data` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPath {
    Name(String),
    Names(Vec<PathComponent>),
}

/// Element of a multi-step path. Nested lists only appear when a later child of a node
/// resolves to a path while the first child does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    Name(String),
    Nested(Vec<PathComponent>),
}

/// Computes the response path for a query tree.
///
/// A node continues downward only when one of its children selects sub-fields or takes
/// arguments; only the first child's resolution is flattened into the path.
pub fn resolve_path(node: &QueryNode) -> QueryPath {
    let Some(fields) = &node.fields else {
        return QueryPath::Name(node.name.clone());
    };

    if !fields.iter().any(|field| field.has_fields() || field.has_args()) {
        return QueryPath::Name(node.name.clone());
    }

    let children: Vec<QueryPath> = fields.iter().map(resolve_path).collect();
    let mut components = vec![PathComponent::Name(node.name.clone())];
    match children.as_slice() {
        [QueryPath::Names(first), ..] => components.extend(first.iter().cloned()),
        children => components.extend(children.iter().map(|child| match child {
            QueryPath::Name(name) => PathComponent::Name(name.clone()),
            QueryPath::Names(nested) => PathComponent::Nested(nested.clone()),
        })),
    }
    QueryPath::Names(components)
}

/// Follows `path` through `data`, yielding `None` as soon as a step is absent.
pub fn drill_down<'a>(data: &'a Value, path: &QueryPath) -> Option<&'a Value> {
    match path {
        QueryPath::Name(name) => data.get(name),
        QueryPath::Names(components) => {
            components
                .iter()
                .try_fold(data, |current, component| match component {
                    PathComponent::Name(name) => current.get(name),
                    PathComponent::Nested(_) => None,
                })
        }
    }
}

/// A query tree together with its variable bindings and pagination settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub tree: QueryNode,
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    #[serde(default)]
    pub paginator: Paginator,
    /// Verbatim document sent instead of the serialized tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

impl Query {
    pub fn new(tree: QueryNode) -> Self {
        Self {
            tree,
            variables: BTreeMap::new(),
            paginator: Paginator::default(),
            document: None,
        }
    }

    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Rebinds a variable in place; used to advance to the next page.
    pub fn update(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Query-language text sent to the API.
    pub fn document_text(&self) -> String {
        if let Some(document) = &self.document {
            return document.clone();
        }
        let mut out = String::from("query { ");
        self.tree.write_selection(&self.variables, &mut out);
        out.push_str(" }");
        out
    }

    /// Canonical identity used as the cache key.
    pub fn identity(&self) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}",
            self.document_text(),
            self.paginator.pagination_field.as_deref().unwrap_or_default(),
            self.paginator.overrides.as_deref().unwrap_or_default()
        )
    }

    pub fn path(&self) -> QueryPath {
        resolve_path(&self.tree)
    }
}
