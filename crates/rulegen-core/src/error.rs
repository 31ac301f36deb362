//! Error types for the rulegen core library
//!
//! Two layers of failure exist. `ResolveError` describes why a single line or
//! operand could not be translated; it is always recovered into a `//TODO:`
//! fragment and never aborts a run. `Error` covers the failures that do end a
//! run: unreadable definition sources and invalid configuration.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rulegen operations
#[derive(Error, Debug)]
pub enum Error {
    /// A source file (entity, definitions, input) could not be read
    #[error("Failed to read {kind} source {}: {source}", path.display())]
    SourceRead {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A fragment-level failure surfaced through an API that has no TODO channel
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a source read error
    pub fn source_read(kind: SourceKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceRead {
            kind,
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

/// The kind of file a `SourceRead` failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Generated entity class
    Entity,
    /// Variable definitions file used by the postprocessor
    Definitions,
    /// Rule lines to transpile
    Input,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Entity => write!(f, "entity"),
            SourceKind::Definitions => write!(f, "definitions"),
            SourceKind::Input => write!(f, "input"),
        }
    }
}

/// Why a line or operand could not be translated
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveError {
    /// The entity identifier has no configured or loadable source file
    #[error("entity not found: {entity}")]
    EntityNotFound { entity: String },

    /// The entity was loaded but no field carries a matching comment
    #[error("field not found: {entity}.({comment})")]
    FieldNotFound { entity: String, comment: String },

    /// The operand was recognized but is not a supported literal form
    #[error("unsupported value: {value}")]
    UnsupportedValue { value: String },

    /// The text does not match any known rule
    #[error("unrecognized pattern: {text}")]
    PatternMismatch { text: String },
}

impl ResolveError {
    /// Stable code used in reports
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            ResolveError::FieldNotFound { .. } => "FIELD_NOT_FOUND",
            ResolveError::UnsupportedValue { .. } => "UNSUPPORTED_VALUE",
            ResolveError::PatternMismatch { .. } => "PATTERN_MISMATCH",
        }
    }

    /// Whether the reason adds nothing beyond the original text
    pub fn is_pattern_mismatch(&self) -> bool {
        matches!(self, ResolveError::PatternMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_read_display() {
        let err = Error::source_read(
            SourceKind::Definitions,
            "defs/Vars.java",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let message = err.to_string();
        assert!(message.contains("definitions"));
        assert!(message.contains("defs/Vars.java"));
    }

    #[test]
    fn test_resolve_error_codes() {
        let err = ResolveError::FieldNotFound {
            entity: "手袋(Ｌ０１)".to_string(),
            comment: "請求コード".to_string(),
        };
        assert_eq!(err.code(), "FIELD_NOT_FOUND");
        assert_eq!(err.to_string(), "field not found: 手袋(Ｌ０１).(請求コード)");
        assert!(!err.is_pattern_mismatch());
    }

    #[test]
    fn test_resolve_error_converts_into_error() {
        let err: Error = ResolveError::UnsupportedValue {
            value: "システム日付".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "unsupported value: システム日付");
    }
}
