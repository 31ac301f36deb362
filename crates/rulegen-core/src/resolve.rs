//! Operand references and their resolution to Java expressions
//!
//! Three reference forms appear in rule lines, all wrapped in `項目「…」`:
//!
//! - entity field: `項目「手袋(Ｌ０１).(請求コード)」`
//! - direct variable: `項目「D\区分」` (one ASCII letter category)
//! - boolean flag: `項目「*変更フラグ」`
//!
//! The resolver turns references and literals into expressions, consulting the
//! entity catalog for fields, and records the semantic type of every field
//! expression it produces in a `TypeIndex`.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::compare::japanese_eq;
use crate::error::ResolveError;
use crate::java::SemanticType;
use crate::metadata::{EntityCatalog, FieldMetadata};
use crate::normalize::{fold_digits, is_number};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

/// Blank literal spellings
pub const BLANK_LITERALS: [&str; 2] = ["ブランク", "ﾌﾞﾗﾝｸ"];

/// A parsed operand reference, borrowing from the line it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    EntityField { entity: &'a str, comment: &'a str },
    Direct { category: char, name: &'a str },
    Flag { name: &'a str },
}

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| Regex::new(r"(?:項目)?「([^」]*)」").unwrap())
}

fn entity_field_regex() -> &'static Regex {
    static ENTITY_FIELD: OnceLock<Regex> = OnceLock::new();
    ENTITY_FIELD.get_or_init(|| Regex::new(r"^(.+)\.\(([^()]+)\)$").unwrap())
}

/// Interpret the content between `「` and `」`
pub fn parse_reference_content(content: &str) -> Option<Reference<'_>> {
    let content = content.trim();

    if let Some(name) = content.strip_prefix('*') {
        let name = name.trim();
        return (!name.is_empty()).then_some(Reference::Flag { name });
    }

    let mut chars = content.chars();
    if let (Some(category), Some('\\')) = (chars.next(), chars.next()) {
        if category.is_ascii_alphabetic() {
            let name = chars.as_str().trim();
            return (!name.is_empty()).then_some(Reference::Direct { category, name });
        }
    }

    let captures = entity_field_regex().captures(content)?;
    let entity = captures.get(1)?.as_str().trim();
    let comment = captures.get(2)?.as_str().trim();
    (!entity.is_empty() && !comment.is_empty()).then_some(Reference::EntityField { entity, comment })
}

/// Parse a token that consists of exactly one reference
pub fn parse_reference(token: &str) -> Option<Reference<'_>> {
    let token = token.trim();
    let captures = reference_regex().captures(token)?;
    let whole = captures.get(0)?;
    if whole.start() != 0 || whole.end() != token.len() {
        return None;
    }
    parse_reference_content(captures.get(1)?.as_str())
}

/// Reference at the very start of a line, with the remaining text
pub fn leading_reference(line: &str) -> Option<(Reference<'_>, &str)> {
    let captures = reference_regex().captures(line)?;
    let whole = captures.get(0)?;
    if whole.start() != 0 {
        return None;
    }
    let reference = parse_reference_content(captures.get(1)?.as_str())?;
    Some((reference, &line[whole.end()..]))
}

/// Whether the text contains at least one valid reference
pub fn contains_reference(text: &str) -> bool {
    reference_regex()
        .captures_iter(text)
        .any(|captures| captures.get(1).and_then(|m| parse_reference_content(m.as_str())).is_some())
}

pub fn is_blank_literal(text: &str) -> bool {
    BLANK_LITERALS.contains(&text.trim())
}

pub fn contains_blank_literal(text: &str) -> bool {
    BLANK_LITERALS.iter().any(|blank| text.contains(blank))
}

/// Expression → semantic type for every resolved entity field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeIndex {
    types: BTreeMap<String, SemanticType>,
}

impl TypeIndex {
    pub fn record(&mut self, expression: impl Into<String>, semantic_type: SemanticType) {
        self.types.insert(expression.into(), semantic_type);
    }

    pub fn lookup(&self, expression: &str) -> Option<SemanticType> {
        self.types.get(expression.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A resolved operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub expression: String,
    pub semantic_type: Option<SemanticType>,
}

impl Resolved {
    fn untyped(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            semantic_type: None,
        }
    }
}

/// An entity field bound to its receiver instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTarget {
    pub instance: String,
    pub field: FieldMetadata,
}

impl FieldTarget {
    /// `<instance>.<getter>()`
    pub fn getter_expression(&self) -> String {
        format!("{}.{}()", self.instance, self.field.getter_name)
    }

    /// `<instance>.<setter>`, without the argument list
    pub fn setter_expression(&self) -> String {
        format!("{}.{}", self.instance, self.field.setter_name)
    }
}

/// Resolves references against the entity catalog
#[derive(Debug, Default)]
pub struct Resolver {
    catalog: EntityCatalog,
    instances: BTreeMap<String, String>,
    types: TypeIndex,
}

impl Resolver {
    pub fn new(catalog: EntityCatalog, instances: BTreeMap<String, String>) -> Self {
        Self {
            catalog,
            instances,
            types: TypeIndex::default(),
        }
    }

    pub fn type_index(&self) -> &TypeIndex {
        &self.types
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    /// Resolve a raw operand token
    pub fn resolve(&mut self, token: &str) -> Result<Resolved, ResolveError> {
        let token = token.trim();
        if let Some(reference) = parse_reference(token) {
            return self.resolve_reference(&reference);
        }
        if is_blank_literal(token) {
            return Ok(Resolved::untyped("\"\""));
        }
        if is_number(token) {
            return Ok(Resolved::untyped(fold_digits(token)));
        }
        Ok(Resolved::untyped(token))
    }

    /// Resolve a parsed reference
    pub fn resolve_reference(&mut self, reference: &Reference<'_>) -> Result<Resolved, ResolveError> {
        match *reference {
            Reference::EntityField { entity, comment } => {
                let target = self.resolve_field(entity, comment)?;
                Ok(Resolved {
                    expression: target.getter_expression(),
                    semantic_type: Some(target.field.semantic_type),
                })
            }
            Reference::Direct { category, name } => Ok(Resolved::untyped(format!("this.{category}{name}"))),
            Reference::Flag { name } => Ok(Resolved::untyped(format!("this.{name}"))),
        }
    }

    /// Look up a field by entity identifier and comment
    pub fn resolve_field(&mut self, entity: &str, comment: &str) -> Result<FieldTarget, ResolveError> {
        let Some(metadata) = self.catalog.get(entity) else {
            warn!(entity, "Entity not found");
            return Err(ResolveError::EntityNotFound {
                entity: entity.to_string(),
            });
        };

        let Some(field) = metadata.find_by_comment(comment) else {
            warn!(entity, comment, "Field not found");
            return Err(ResolveError::FieldNotFound {
                entity: entity.to_string(),
                comment: comment.to_string(),
            });
        };

        let instance = self
            .instance_for(entity)
            .or_else(|| metadata.instance_name())
            .unwrap_or_else(|| entity.to_string());

        let target = FieldTarget {
            instance,
            field: field.clone(),
        };
        self.types
            .record(target.getter_expression(), target.field.semantic_type);
        Ok(target)
    }

    /// Configured receiver for an entity id, matched like catalog lookups
    fn instance_for(&self, entity: &str) -> Option<String> {
        self.instances
            .get(entity)
            .or_else(|| {
                self.instances
                    .iter()
                    .find(|(id, _)| japanese_eq(id, entity))
                    .map(|(_, instance)| instance)
            })
            .cloned()
    }
}
