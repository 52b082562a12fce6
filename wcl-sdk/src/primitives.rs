// ABOUTME: Static descriptor types that generated enum and object sources are built from
// ABOUTME: Generated `enums.rs` / `objects.rs` files declare constants of these types

/// Generated enum: the ordered, documented value names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GqlEnum {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl GqlEnum {
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GqlArg {
    pub name: &'static str,
    pub description: &'static str,
    pub type_chain: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GqlField {
    pub name: &'static str,
    pub description: &'static str,
    pub type_chain: &'static [&'static str],
    pub args: &'static [GqlArg],
}

impl GqlField {
    /// Base for struct-update syntax on fields without arguments.
    pub const EMPTY: GqlField = GqlField {
        name: "",
        description: "",
        type_chain: &[],
        args: &[],
    };

    pub fn arg(&self, name: &str) -> Option<&GqlArg> {
        self.args.iter().find(|arg| arg.name == name)
    }

    pub fn is_non_null(&self) -> bool {
        self.type_chain.first() == Some(&"NON_NULL")
    }

    /// Terminal named type of the chain.
    pub fn named_type(&self) -> Option<&'static str> {
        self.type_chain.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GqlObject {
    pub name: &'static str,
    pub fields: &'static [GqlField],
}

impl GqlObject {
    pub fn field(&self, name: &str) -> Option<&GqlField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(non_upper_case_globals)]
    const GQL_Fight: GqlObject = GqlObject {
        name: "ReportFight",
        fields: &[
            GqlField {
                name: "id",
                description: "The id of the fight.",
                type_chain: &["NON_NULL", "Int"],
                ..GqlField::EMPTY
            },
            GqlField {
                name: "enemyNPCs",
                description: "The NPCs the players fought.",
                type_chain: &["LIST", "ReportFightNPC"],
                args: &[GqlArg {
                    name: "limit",
                    description: "Maximum entries.",
                    type_chain: &["Int"],
                }],
            },
        ],
    };

    #[test]
    fn test_field_lookup() {
        let id = GQL_Fight.field("id").unwrap();
        assert!(id.is_non_null());
        assert_eq!(id.named_type(), Some("Int"));
        assert!(id.args.is_empty());
        assert!(GQL_Fight.field("missing").is_none());
    }

    #[test]
    fn test_arg_lookup() {
        let npcs = GQL_Fight.field("enemyNPCs").unwrap();
        assert!(!npcs.is_non_null());
        assert_eq!(npcs.arg("limit").unwrap().type_chain, &["Int"]);
    }

    #[test]
    fn test_enum_contains() {
        let difficulty = GqlEnum {
            name: "RankingCompareType",
            values: &["Rankings", "Parses"],
        };
        assert!(difficulty.contains("Parses"));
        assert!(!difficulty.contains("Other"));
    }
}
