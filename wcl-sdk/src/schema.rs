// ABOUTME: Introspection schema model and type reference resolution
// ABOUTME: Unwraps NON_NULL/LIST modifier chains down to the terminal named type

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

use crate::Result;
use crate::error::WclError;

/// `__TypeKind` as reported by introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    pub fn is_wrapper(self) -> bool {
        matches!(self, TypeKind::List | TypeKind::NonNull)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type reference exactly as introspection returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<RawTypeRef>>,
}

/// A validated type reference: a chain of wrappers ending in one named type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTypeRef")]
pub enum TypeRef {
    Named { kind: TypeKind, name: String },
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        TypeRef::Named {
            kind,
            name: name.into(),
        }
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Token chain, outermost wrapper first and the named type last.
    pub fn resolve(&self) -> Vec<TypeToken> {
        let mut tokens = Vec::new();
        let mut current = self;
        loop {
            match current {
                TypeRef::NonNull(inner) => {
                    tokens.push(TypeToken::NonNull);
                    current = inner;
                }
                TypeRef::List(inner) => {
                    tokens.push(TypeToken::List);
                    current = inner;
                }
                TypeRef::Named { name, .. } => {
                    tokens.push(TypeToken::Named(name.clone()));
                    return tokens;
                }
            }
        }
    }

    /// Name of the terminal named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named { name, .. } => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.named_type(),
        }
    }
}

impl TryFrom<RawTypeRef> for TypeRef {
    type Error = WclError;

    fn try_from(raw: RawTypeRef) -> Result<Self> {
        if raw.kind.is_wrapper() {
            let inner = raw.of_type.ok_or_else(|| {
                WclError::MalformedSchema(format!("{} wrapper without ofType", raw.kind))
            })?;
            let inner = TypeRef::try_from(*inner)?;
            Ok(match raw.kind {
                TypeKind::NonNull => TypeRef::non_null(inner),
                _ => TypeRef::list(inner),
            })
        } else {
            match raw.name {
                Some(name) if !name.is_empty() => Ok(TypeRef::named(raw.kind, name)),
                _ => Err(WclError::MalformedSchema(format!(
                    "{} type reference without a name",
                    raw.kind
                ))),
            }
        }
    }
}

/// One element of a resolved type chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeToken {
    NonNull,
    List,
    Named(String),
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeToken::NonNull => f.write_str("NON_NULL"),
            TypeToken::List => f.write_str("LIST"),
            TypeToken::Named(name) => f.write_str(name),
        }
    }
}

/// Resolves a raw descriptor, failing on a broken wrapper/named invariant.
pub fn resolve_type(raw: &RawTypeRef) -> Result<Vec<TypeToken>> {
    Ok(TypeRef::try_from(raw.clone())?.resolve())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub args: Vec<InputValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A top-level entry of the introspection `types` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValue>>,
}

impl SchemaType {
    /// Checks that member names are non-empty and unique within this type.
    pub fn validate(&self) -> Result<()> {
        let names: Vec<&str> = match self.kind {
            TypeKind::Enum => self
                .enum_values
                .iter()
                .flatten()
                .map(|value| value.name.as_str())
                .collect(),
            _ => self
                .fields
                .iter()
                .flatten()
                .map(|field| field.name.as_str())
                .collect(),
        };

        let mut seen = HashSet::new();
        for name in names {
            if name.is_empty() {
                return Err(WclError::MalformedSchema(format!(
                    "{} has a member without a name",
                    self.name
                )));
            }
            if !seen.insert(name) {
                return Err(WclError::MalformedSchema(format!(
                    "{} declares `{}` more than once",
                    self.name, name
                )));
            }
        }
        Ok(())
    }
}

/// Body of `__schema` as far as generation needs it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntrospectionSchema {
    pub types: Vec<SchemaType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_named() {
        let ty = TypeRef::named(TypeKind::Scalar, "String");
        assert_eq!(ty.resolve(), vec![TypeToken::Named("String".to_string())]);
    }

    #[test]
    fn test_resolve_keeps_every_wrapper() {
        let raw: RawTypeRef = serde_json::from_value(json!({
            "kind": "NON_NULL",
            "name": null,
            "ofType": {
                "kind": "LIST",
                "name": null,
                "ofType": {
                    "kind": "NON_NULL",
                    "name": null,
                    "ofType": { "kind": "OBJECT", "name": "Foo", "ofType": null }
                }
            }
        }))
        .unwrap();

        let tokens = resolve_type(&raw).unwrap();
        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["NON_NULL", "LIST", "NON_NULL", "Foo"]);
    }

    #[test]
    fn test_resolve_length_matches_depth() {
        let mut ty = TypeRef::named(TypeKind::Enum, "Difficulty");
        for depth in 0..6 {
            assert_eq!(ty.resolve().len(), depth + 1);
            assert_eq!(
                ty.resolve().last(),
                Some(&TypeToken::Named("Difficulty".to_string()))
            );
            ty = if depth % 2 == 0 {
                TypeRef::list(ty)
            } else {
                TypeRef::non_null(ty)
            };
        }
    }

    #[test]
    fn test_wrapper_without_of_type_is_malformed() {
        let raw = RawTypeRef {
            kind: TypeKind::List,
            name: None,
            of_type: None,
        };
        assert!(matches!(
            resolve_type(&raw),
            Err(WclError::MalformedSchema(_))
        ));
    }

    #[test]
    fn test_named_without_name_is_malformed() {
        let result: std::result::Result<TypeRef, _> =
            serde_json::from_value(json!({ "kind": "OBJECT", "name": null, "ofType": null }));
        assert!(result.is_err());
    }

    #[test]
    fn test_named_type_walks_chain() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::named(TypeKind::Object, "Report")));
        assert_eq!(ty.named_type(), "Report");
    }

    #[test]
    fn test_schema_type_deserializes_object() {
        let entry: SchemaType = serde_json::from_value(json!({
            "kind": "OBJECT",
            "name": "Report",
            "description": "A single report.",
            "fields": [
                {
                    "name": "code",
                    "description": "The report code.",
                    "args": [],
                    "type": {
                        "kind": "NON_NULL",
                        "name": null,
                        "ofType": { "kind": "SCALAR", "name": "String", "ofType": null }
                    },
                    "isDeprecated": false
                }
            ],
            "interfaces": [],
            "enumValues": null
        }))
        .unwrap();

        assert_eq!(entry.kind, TypeKind::Object);
        let fields = entry.fields.unwrap();
        assert_eq!(fields[0].ty.named_type(), "String");
        assert!(fields[0].args.is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicate_members() {
        let entry: SchemaType = serde_json::from_value(json!({
            "kind": "ENUM",
            "name": "Difficulty",
            "enumValues": [
                { "name": "Heroic", "description": "x" },
                { "name": "Heroic", "description": "y" }
            ]
        }))
        .unwrap();

        assert!(matches!(
            entry.validate(),
            Err(WclError::MalformedSchema(_))
        ));
    }
}
