//! Line-level scanning helpers for Java sources
//!
//! Entity classes and the variable definitions file are both read line by line;
//! neither needs a real Java parser. This module holds the shared declaration
//! pattern and the mapping from declared types to semantic types.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Type category used to pick comparison helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    String,
    Numeric,
    Long,
    Date,
    Boolean,
    Unknown,
}

impl SemanticType {
    /// Classify a declared Java type token
    pub fn from_java_type(declared: &str) -> Self {
        let simple = declared.rsplit('.').next().unwrap_or(declared);
        match simple {
            "Integer" | "int" | "Double" | "double" | "Float" | "float" | "Short" | "short"
            | "BigDecimal" => SemanticType::Numeric,
            "Long" | "long" => SemanticType::Long,
            "String" => SemanticType::String,
            "Date" | "LocalDate" | "LocalDateTime" | "Timestamp" => SemanticType::Date,
            "Boolean" | "boolean" => SemanticType::Boolean,
            _ => SemanticType::Unknown,
        }
    }

    /// Whether comparisons on this type go through the numeric helper
    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Numeric | SemanticType::Long)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::String => "String",
            SemanticType::Numeric => "Numeric",
            SemanticType::Long => "Long",
            SemanticType::Date => "Date",
            SemanticType::Boolean => "Boolean",
            SemanticType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// A `private <Type> <name> [= <default>];` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub declared_type: String,
    pub name: String,
    pub default_value: Option<String>,
}

fn declaration_regex() -> &'static Regex {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    DECLARATION.get_or_init(|| {
        Regex::new(
            r"^private\s+(?:final\s+)?([A-Za-z_][\w.]*(?:<[^;=]*>)?(?:\[\])*)\s+([A-Za-z_]\w*)\s*(?:=\s*([^;]*?))?\s*;",
        )
        .unwrap()
    })
}

fn class_regex() -> &'static Regex {
    static CLASS: OnceLock<Regex> = OnceLock::new();
    CLASS.get_or_init(|| Regex::new(r"public\s+(?:(?:abstract|final)\s+)*class\s+(\w+)").unwrap())
}

/// Parse a trimmed source line as a private field declaration
pub fn parse_declaration(line: &str) -> Option<FieldDeclaration> {
    let captures = declaration_regex().captures(line.trim())?;
    Some(FieldDeclaration {
        declared_type: captures[1].to_string(),
        name: captures[2].to_string(),
        default_value: captures
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty()),
    })
}

/// Extract the class name from a `public class <Name>` line
pub fn parse_class_name(line: &str) -> Option<String> {
    class_regex()
        .captures(line)
        .map(|captures| captures[1].to_string())
}

/// Uppercase the first character
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character
pub fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render text as a Java string literal
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
