// ABOUTME: Deterministic Rust source generation for schema enums and objects
// ABOUTME: Renders introspection entries into constants built from `primitives` types

use std::collections::BTreeMap;

use crate::Result;
use crate::error::WclError;
use crate::schema::{Field, InputValue, IntrospectionSchema, SchemaType, TypeKind, TypeRef};

const INDENT: &str = "    ";

pub const ENUM_HEADER: &str = "//! ENUM TYPES
//! THIS FILE IS GENERATED BY `wcl generate`.

#![allow(non_upper_case_globals)]

use wcl_sdk::primitives::GqlEnum;";

pub const OBJECT_HEADER: &str = "//! OBJECT TYPES
//! THIS FILE IS GENERATED BY `wcl generate`.

#![allow(non_upper_case_globals)]

use wcl_sdk::primitives::{GqlArg, GqlField, GqlObject};";

/// Renders an ENUM entry. Values without a description are left out.
pub fn render_enum(entry: &SchemaType) -> Result<String> {
    if entry.kind != TypeKind::Enum {
        return Err(WclError::MalformedSchema(format!(
            "{} is {}, expected ENUM",
            entry.name, entry.kind
        )));
    }

    let described: Vec<(&str, String)> = entry
        .enum_values
        .iter()
        .flatten()
        .filter_map(|value| {
            value
                .description
                .as_deref()
                .filter(|description| !description.is_empty())
                .map(|description| (value.name.as_str(), single_line(description)))
        })
        .collect();

    let width = described
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!("pub const GQL_{}: GqlEnum = GqlEnum {{", entry.name),
        format!("{INDENT}name: \"{}\",", entry.name),
        format!("{INDENT}values: &["),
    ];
    for (name, description) in &described {
        let padding = " ".repeat(width - name.len());
        lines.push(format!(
            "{INDENT}{INDENT}\"{name}\",{padding} // {description}"
        ));
    }
    lines.push(format!("{INDENT}],"));
    lines.push("};".to_string());

    Ok(lines.join("\n"))
}

/// Renders an OBJECT entry, keeping schema order for fields and arguments.
pub fn render_object(entry: &SchemaType) -> Result<String> {
    if entry.kind != TypeKind::Object {
        return Err(WclError::MalformedSchema(format!(
            "{} is {}, expected OBJECT",
            entry.name, entry.kind
        )));
    }

    let mut lines = Vec::new();
    if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
        for line in description.lines() {
            if line.trim().is_empty() {
                lines.push("///".to_string());
            } else {
                lines.push(format!("/// {}", line.trim_end()));
            }
        }
    }
    lines.push(format!(
        "pub const GQL_{}: GqlObject = GqlObject {{",
        entry.name
    ));
    lines.push(format!("{INDENT}name: \"{}\",", entry.name));
    lines.push(format!("{INDENT}fields: &["));
    for field in entry.fields.iter().flatten() {
        lines.extend(
            format_field(field)
                .into_iter()
                .map(|line| format!("{INDENT}{INDENT}{line}")),
        );
    }
    lines.push(format!("{INDENT}],"));
    lines.push("};".to_string());

    Ok(lines.join("\n"))
}

fn format_field(field: &Field) -> Vec<String> {
    let mut lines = vec!["GqlField {".to_string()];
    lines.extend(base_lines(&field.name, field.description.as_deref(), &field.ty));
    if field.args.is_empty() {
        lines.push(format!("{INDENT}..GqlField::EMPTY"));
    } else {
        lines.push(format!("{INDENT}args: &["));
        for arg in &field.args {
            lines.extend(
                format_arg(arg)
                    .into_iter()
                    .map(|line| format!("{INDENT}{INDENT}{line}")),
            );
        }
        lines.push(format!("{INDENT}],"));
    }
    lines.push("},".to_string());
    lines
}

fn format_arg(arg: &InputValue) -> Vec<String> {
    let mut lines = vec!["GqlArg {".to_string()];
    lines.extend(base_lines(&arg.name, arg.description.as_deref(), &arg.ty));
    lines.push("},".to_string());
    lines
}

fn base_lines(name: &str, description: Option<&str>, ty: &TypeRef) -> [String; 3] {
    [
        format!("{INDENT}name: \"{name}\","),
        format!(
            "{INDENT}description: \"{}\",",
            escape_description(description.unwrap_or_default())
        ),
        format!("{INDENT}type_chain: {},", format_type(ty)),
    ]
}

fn format_type(ty: &TypeRef) -> String {
    let tokens: Vec<String> = ty
        .resolve()
        .iter()
        .map(|token| format!("\"{token}\""))
        .collect();
    format!("&[{}]", tokens.join(", "))
}

/// Double quotes become single quotes so the literal stays intact.
fn escape_description(description: &str) -> String {
    description
        .replace('\\', "\\\\")
        .replace('"', "'")
        .replace('\r', "")
        .replace('\n', "\\n")
}

fn single_line(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One top-level schema type scheduled for emission.
#[derive(Debug, Clone)]
pub struct SchemaTypeEntry<'a> {
    pub kind: TypeKind,
    pub name: &'a str,
    pub data: &'a SchemaType,
    /// `None` for SCALAR entries.
    pub rendered: Option<String>,
}

/// Per-kind output of one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratedSources<'a> {
    enums: Vec<SchemaTypeEntry<'a>>,
    objects: Vec<SchemaTypeEntry<'a>>,
    scalars: Vec<SchemaTypeEntry<'a>>,
}

impl<'a> GeneratedSources<'a> {
    pub fn entries(&self, kind: TypeKind) -> &[SchemaTypeEntry<'a>] {
        match kind {
            TypeKind::Enum => &self.enums,
            TypeKind::Object => &self.objects,
            TypeKind::Scalar => &self.scalars,
            _ => &[],
        }
    }

    /// Header followed by every rendered entry, separated by blank lines.
    pub fn source(&self, kind: TypeKind) -> Option<String> {
        let header = match kind {
            TypeKind::Enum => ENUM_HEADER,
            TypeKind::Object => OBJECT_HEADER,
            _ => return None,
        };

        let mut blocks = vec![header];
        blocks.extend(
            self.entries(kind)
                .iter()
                .filter_map(|entry| entry.rendered.as_deref()),
        );
        let mut source = blocks.join("\n\n");
        source.push('\n');
        Some(source)
    }
}

/// Destination for generated source units.
pub trait SourceWriter {
    fn write_source(&mut self, file_name: &str, contents: &str) -> Result<()>;
}

impl SourceWriter for BTreeMap<String, String> {
    fn write_source(&mut self, file_name: &str, contents: &str) -> Result<()> {
        self.insert(file_name.to_string(), contents.to_string());
        Ok(())
    }
}

pub struct SchemaCodeGenerator;

impl SchemaCodeGenerator {
    /// File each emitted kind is written to.
    pub const OUTPUTS: [(TypeKind, &'static str); 2] =
        [(TypeKind::Enum, "enums.rs"), (TypeKind::Object, "objects.rs")];

    pub fn generate(schema: &IntrospectionSchema) -> Result<GeneratedSources<'_>> {
        let mut sources = GeneratedSources::default();

        for data in &schema.types {
            let (bucket, rendered) = match data.kind {
                TypeKind::Enum => {
                    data.validate()?;
                    (&mut sources.enums, Some(render_enum(data)?))
                }
                TypeKind::Object => {
                    data.validate()?;
                    (&mut sources.objects, Some(render_object(data)?))
                }
                TypeKind::Scalar => (&mut sources.scalars, None),
                _ => continue,
            };

            bucket.push(SchemaTypeEntry {
                kind: data.kind,
                name: &data.name,
                data,
                rendered,
            });
        }

        log::debug!(
            "generated {} enums, {} objects, {} scalars",
            sources.enums.len(),
            sources.objects.len(),
            sources.scalars.len()
        );
        Ok(sources)
    }

    pub fn emit(sources: &GeneratedSources<'_>, writer: &mut dyn SourceWriter) -> Result<()> {
        for (kind, file_name) in Self::OUTPUTS {
            if let Some(contents) = sources.source(kind) {
                writer.write_source(file_name, &contents)?;
            }
        }
        Ok(())
    }
}
