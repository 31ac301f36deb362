//! Entity metadata extraction
//!
//! Generated entity classes document each column with a doc comment of the form
//! `[<table_field_name>] <comment>` directly above the field declaration. The
//! extractor scans those comments line by line and builds an index that maps a
//! human-readable comment to the field's accessors and semantic type.
//!
//! `EntityCatalog` caches extracted metadata per entity identifier for the
//! duration of one run.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::compare::{comparison_key, japanese_eq};
use crate::error::{Error, Result, SourceKind};
use crate::java::{self, SemanticType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// One documented field of an entity class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Column name from the doc comment, e.g. `test_field_1`
    pub table_field_name: String,
    /// camelCase identifier derived from the column name
    pub field_identifier: String,
    /// Label used to match references in rule lines
    pub comment: String,
    pub getter_name: String,
    pub setter_name: String,
    /// Raw type token of the declaration following the comment
    pub declared_type: Option<String>,
    pub semantic_type: SemanticType,
}

impl FieldMetadata {
    /// Build a field from its column name and comment; the type stays unknown
    pub fn new(table_field_name: impl Into<String>, comment: impl Into<String>) -> Self {
        let table_field_name = table_field_name.into();
        let field_identifier = field_identifier(&table_field_name);
        let accessor = java::capitalize(&field_identifier);
        Self {
            getter_name: format!("get{accessor}"),
            setter_name: format!("set{accessor}"),
            field_identifier,
            table_field_name,
            comment: comment.into(),
            declared_type: None,
            semantic_type: SemanticType::Unknown,
        }
    }

    /// Attach a declared type
    pub fn with_type(mut self, declared_type: &str) -> Self {
        self.attach_type(declared_type);
        self
    }

    fn attach_type(&mut self, declared_type: &str) {
        self.semantic_type = SemanticType::from_java_type(declared_type);
        self.declared_type = Some(declared_type.to_string());
    }
}

/// Derive the camelCase identifier for a snake_case column name
///
/// `test_field_1` becomes `testField1`; empty segments are skipped.
pub fn field_identifier(table_field_name: &str) -> String {
    let mut segments = table_field_name
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase);

    let mut identifier = segments.next().unwrap_or_default();
    for segment in segments {
        identifier.push_str(&java::capitalize(&segment));
    }
    identifier
}

/// Field index of one entity class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub class_name: Option<String>,
    pub fields: Vec<FieldMetadata>,
}

impl EntityMetadata {
    /// Create metadata for a class with no fields yet
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style)
    pub fn with_field(mut self, field: FieldMetadata) -> Self {
        self.fields.push(field);
        self
    }

    /// First field whose comment matches under normalized-Japanese equality
    pub fn find_by_comment(&self, comment: &str) -> Option<&FieldMetadata> {
        let key = comparison_key(comment);
        if key.is_empty() {
            return None;
        }
        self.fields
            .iter()
            .find(|field| comparison_key(&field.comment) == key)
    }

    /// Default receiver name: the class name with a lowercase first letter
    pub fn instance_name(&self) -> Option<String> {
        self.class_name.as_deref().map(java::lower_first)
    }
}

fn field_comment_regex() -> &'static Regex {
    static FIELD_COMMENT: OnceLock<Regex> = OnceLock::new();
    FIELD_COMMENT.get_or_init(|| Regex::new(r"\[([^\]]+)\][^\S\n]*([^\n]+)").unwrap())
}

/// Line scanner state
#[derive(Default)]
struct EntityScanner {
    metadata: EntityMetadata,
    in_comment: bool,
    buffer: Vec<String>,
    awaiting_type: bool,
}

impl EntityScanner {
    fn scan_line(&mut self, raw: &str) {
        let line = raw.trim();

        if self.metadata.class_name.is_none() && line.contains("class") {
            if let Some(name) = java::parse_class_name(line) {
                self.metadata.class_name = Some(name);
                return;
            }
        }

        if let Some(rest) = line.strip_prefix("/**") {
            self.buffer.clear();
            match rest.find("*/") {
                Some(end) => {
                    self.buffer.push(rest[..end].trim().to_string());
                    self.close_comment();
                }
                None => {
                    self.in_comment = true;
                    if !rest.trim().is_empty() {
                        self.buffer.push(rest.trim().to_string());
                    }
                }
            }
            return;
        }

        if self.in_comment {
            if let Some(end) = line.find("*/") {
                let body = line[..end].trim_start_matches('*').trim();
                if !body.is_empty() {
                    self.buffer.push(body.to_string());
                }
                self.close_comment();
            } else if let Some(body) = line.strip_prefix('*') {
                self.buffer.push(body.trim().to_string());
            }
            return;
        }

        if self.awaiting_type {
            if let Some(declaration) = java::parse_declaration(line) {
                if let Some(field) = self.metadata.fields.last_mut() {
                    field.attach_type(&declaration.declared_type);
                }
                self.awaiting_type = false;
            }
        }
    }

    fn close_comment(&mut self) {
        self.in_comment = false;
        let text = self.buffer.join("\n");
        self.buffer.clear();

        let Some(captures) = field_comment_regex().captures(&text) else {
            return;
        };
        let table_field_name = captures[1].trim();
        let comment = captures[2].trim();
        if table_field_name.is_empty() || comment.is_empty() {
            return;
        }

        self.metadata
            .fields
            .push(FieldMetadata::new(table_field_name, comment));
        self.awaiting_type = true;
    }
}

/// Extract metadata from entity source text
pub fn parse_entity_source(text: &str) -> EntityMetadata {
    let mut scanner = EntityScanner::default();
    for line in text.lines() {
        scanner.scan_line(line);
    }
    scanner.metadata
}

/// Read and extract an entity source file
///
/// When the source declares no public class, the file stem stands in for the
/// class name.
pub fn extract_entity(path: &Path) -> Result<EntityMetadata> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::source_read(SourceKind::Entity, path, e))?;
    let mut metadata = parse_entity_source(&text);
    if metadata.class_name.is_none() {
        metadata.class_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string);
    }
    debug!(
        path = %path.display(),
        class = metadata.class_name.as_deref().unwrap_or(""),
        fields = metadata.fields.len(),
        "Extracted entity metadata"
    );
    Ok(metadata)
}

/// Per-run cache of entity metadata, keyed by entity identifier
///
/// Each identifier is loaded at most once; failed loads are remembered too.
#[derive(Debug, Default)]
pub struct EntityCatalog {
    sources: BTreeMap<String, PathBuf>,
    loaded: BTreeMap<String, Option<Arc<EntityMetadata>>>,
}

impl EntityCatalog {
    /// Create a catalog over configured entity source files
    pub fn new(sources: BTreeMap<String, PathBuf>) -> Self {
        Self {
            sources,
            loaded: BTreeMap::new(),
        }
    }

    /// Register already-extracted metadata under an identifier
    pub fn with_entity(mut self, entity_id: impl Into<String>, metadata: EntityMetadata) -> Self {
        self.loaded.insert(entity_id.into(), Some(Arc::new(metadata)));
        self
    }

    /// Metadata for an entity identifier, loading its source on first use
    ///
    /// Identifiers are matched exactly first, then by comparison key so that
    /// `手袋(L01)` finds a source configured as `手袋(Ｌ０１)`. Among several
    /// matching identifiers the smallest one wins.
    pub fn get(&mut self, entity_id: &str) -> Option<Arc<EntityMetadata>> {
        if let Some(cached) = self.loaded.get(entity_id) {
            return cached.clone();
        }

        let preloaded = self
            .loaded
            .iter()
            .find(|(id, entry)| entry.is_some() && japanese_eq(id, entity_id))
            .and_then(|(_, entry)| entry.clone());
        let result = preloaded.or_else(|| self.load(entity_id));
        self.loaded.insert(entity_id.to_string(), result.clone());
        result
    }

    fn load(&self, entity_id: &str) -> Option<Arc<EntityMetadata>> {
        let path = self.source_path(entity_id)?;
        match extract_entity(path) {
            Ok(metadata) => Some(Arc::new(metadata)),
            Err(err) => {
                warn!(entity = entity_id, error = %err, "Entity source could not be loaded");
                None
            }
        }
    }

    /// Configured source path for an identifier
    pub fn source_path(&self, entity_id: &str) -> Option<&Path> {
        self.sources
            .get(entity_id)
            .or_else(|| {
                self.sources
                    .iter()
                    .find(|(id, _)| japanese_eq(id, entity_id))
                    .map(|(_, path)| path)
            })
            .map(PathBuf::as_path)
    }

    /// Number of identifiers that resolved to metadata
    pub fn loaded_count(&self) -> usize {
        self.loaded.values().filter(|entry| entry.is_some()).count()
    }
}
