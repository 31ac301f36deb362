//! Variable definitions consumed by the postprocessor
//!
//! The definitions file is a plain list of `private <Type> <name> [= default];`
//! declarations describing the `this.<name>` variables that rule conditions
//! compare against each other.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result, SourceKind};
use crate::java::{self, SemanticType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub declared_type: String,
    pub default_value: Option<String>,
    pub semantic_type: SemanticType,
}

/// Name-indexed variable definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinitions {
    entries: BTreeMap<String, VariableDefinition>,
}

impl VariableDefinitions {
    /// Parse definitions from source text; non-declaration lines are ignored
    pub fn parse(text: &str) -> Self {
        let mut definitions = Self::default();
        for declaration in text.lines().filter_map(java::parse_declaration) {
            definitions.insert(
                declaration.name,
                &declaration.declared_type,
                declaration.default_value,
            );
        }
        definitions
    }

    /// Read and parse a definitions file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::source_read(SourceKind::Definitions, path, e))?;
        let definitions = Self::parse(&text);
        debug!(path = %path.display(), count = definitions.len(), "Loaded variable definitions");
        Ok(definitions)
    }

    /// Add or replace a definition
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        declared_type: &str,
        default_value: Option<String>,
    ) {
        let name = name.into();
        self.entries.insert(
            name.clone(),
            VariableDefinition {
                name,
                declared_type: declared_type.to_string(),
                default_value,
                semantic_type: SemanticType::from_java_type(declared_type),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.entries.get(name)
    }

    /// Whether the named variable is declared with a numeric or long type
    pub fn is_numeric(&self, name: &str) -> bool {
        self.get(name)
            .map(|definition| definition.semantic_type.is_numeric())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDefinition> {
        self.entries.values()
    }
}
