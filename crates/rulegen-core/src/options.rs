//! Transpiler options
//!
//! Plain data handed to the core by whatever loads configuration. All maps are
//! ordered so that runs over identical inputs are reproducible.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How input lines are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Condition blocks with guarded assignments
    #[default]
    Block,
    /// Every line converted on its own
    Line,
}

/// Which lines after a condition start belong to its block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockScope {
    /// Only indented lines; a non-indented or blank line closes the block
    Indented,
    /// Every line until the next condition start
    #[default]
    UntilNextCondition,
}

/// What to do with text no rule recognizes, outside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedPolicy {
    #[default]
    Skip,
    Todo,
}

macro_rules! impl_keyword_enum {
    ($ty:ty, $($variant:path => $keyword:literal),+ $(,)?) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($variant => f.write_str($keyword),)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                    $($keyword => Ok($variant),)+
                    other => Err(format!(
                        "unknown value '{}', expected one of: {}",
                        other,
                        [$($keyword),+].join(", ")
                    )),
                }
            }
        }
    };
}

impl_keyword_enum!(ConversionMode, ConversionMode::Block => "block", ConversionMode::Line => "line");
impl_keyword_enum!(
    BlockScope,
    BlockScope::Indented => "indented",
    BlockScope::UntilNextCondition => "until_next_condition",
);
impl_keyword_enum!(UnrecognizedPolicy, UnrecognizedPolicy::Skip => "skip", UnrecognizedPolicy::Todo => "todo");

/// Helper classes used in generated comparisons and string operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperNames {
    pub string: String,
    pub numeric: String,
    pub date: String,
}

impl Default for HelperNames {
    fn default() -> Self {
        Self {
            string: "StrUtil".to_string(),
            numeric: "NumUtil".to_string(),
            date: "DateUtil".to_string(),
        }
    }
}

/// Everything a `Transpiler` needs to know about one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileOptions {
    pub mode: ConversionMode,
    /// Entity identifier → entity source file
    pub entity_files: BTreeMap<String, PathBuf>,
    /// Entity identifier → receiver instance name
    pub entity_instances: BTreeMap<String, String>,
    pub postprocess: bool,
    pub definitions_file: Option<PathBuf>,
    pub unrecognized: UnrecognizedPolicy,
    pub block_scope: BlockScope,
    pub emit_field_comments: bool,
    pub helpers: HelperNames,
}

impl TranspileOptions {
    pub fn with_entity(mut self, entity_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.entity_files.insert(entity_id.into(), path.into());
        self
    }

    pub fn with_instance(mut self, entity_id: impl Into<String>, instance: impl Into<String>) -> Self {
        self.entity_instances.insert(entity_id.into(), instance.into());
        self
    }

    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_postprocess(mut self, definitions_file: Option<PathBuf>) -> Self {
        self.postprocess = true;
        self.definitions_file = definitions_file;
        self
    }

    pub fn with_unrecognized(mut self, policy: UnrecognizedPolicy) -> Self {
        self.unrecognized = policy;
        self
    }

    pub fn with_block_scope(mut self, scope: BlockScope) -> Self {
        self.block_scope = scope;
        self
    }
}
