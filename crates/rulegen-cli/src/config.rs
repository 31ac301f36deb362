//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments (applied by the convert handler)
//!
//! Relative paths inside a configuration file are resolved against the
//! directory that contains it.

use crate::error::{Error, Result};
use rulegen_core::{BlockScope, ConversionMode, HelperNames, TranspileOptions, UnrecognizedPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion settings
    pub converter: ConverterConfig,

    /// Logging settings
    pub logging: LoggingSection,

    /// File the configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Conversion settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub mode: ConversionMode,
    pub postprocess: bool,
    pub definitions_file: Option<PathBuf>,
    pub unrecognized: UnrecognizedPolicy,
    pub block_scope: BlockScope,
    pub emit_field_comments: bool,
    /// Entity identifier → entity source file
    pub entity_files: BTreeMap<String, PathBuf>,
    /// Entity identifier → receiver instance name
    pub entity_instances: BTreeMap<String, String>,
    pub helpers: HelperNames,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

/// Written by `rulegen config init`
pub const STARTER_CONFIG: &str = r#"# rulegen configuration
converter:
  input_file: input/rules.txt
  output_file: output/Rules.java
  mode: block                 # block | line
  postprocess: false
  # definitions_file: input/Definitions.java
  unrecognized: skip          # skip | todo
  block_scope: until_next_condition  # until_next_condition | indented
  emit_field_comments: false
  entity_files: {}
  #   手袋(Ｌ０１): input/TestTable1BaseEntity.java
  entity_instances: {}
  #   手袋(Ｌ０１): glove
  helpers:
    string: StrUtil
    numeric: NumUtil
    date: DateUtil
logging:
  level: warn
  format: compact             # compact | full | json
"#;

impl ConverterConfig {
    /// Core options for this configuration
    pub fn to_options(&self) -> TranspileOptions {
        TranspileOptions {
            mode: self.mode,
            entity_files: self.entity_files.clone(),
            entity_instances: self.entity_instances.clone(),
            postprocess: self.postprocess,
            definitions_file: self.definitions_file.clone(),
            unrecognized: self.unrecognized,
            block_scope: self.block_scope,
            emit_field_comments: self.emit_field_comments,
            helpers: self.helpers.clone(),
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.input_file.iter_mut().for_each(resolve);
        self.output_file.iter_mut().for_each(resolve);
        self.definitions_file.iter_mut().for_each(resolve);
        self.entity_files.values_mut().for_each(resolve);
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let mut config: Config = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.converter.resolve_paths(base);
        config.source = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                return Self::from_file(&path)
                    .map_err(|e| Error::config(format!("{}: {}", path.display(), e)));
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("rulegen.yaml"),
            PathBuf::from(".rulegen.yaml"),
            PathBuf::from("rulegen.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rulegen").join("config.yaml"));
        }

        paths
    }

    /// Referenced paths that do not exist, with the key that names them
    pub fn missing_paths(&self) -> Vec<(String, PathBuf)> {
        let converter = &self.converter;
        let mut candidates: Vec<(String, &PathBuf)> = Vec::new();
        if let Some(path) = &converter.input_file {
            candidates.push(("converter.input_file".to_string(), path));
        }
        if let Some(path) = &converter.definitions_file {
            candidates.push(("converter.definitions_file".to_string(), path));
        }
        for (entity, path) in &converter.entity_files {
            candidates.push((format!("converter.entity_files.{entity}"), path));
        }

        candidates
            .into_iter()
            .filter(|(_, path)| !path.exists())
            .map(|(key, path)| (key, path.clone()))
            .collect()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_starter_config_parses() {
        let config: Config = serde_yaml::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(config.converter.mode, ConversionMode::Block);
        assert_eq!(config.converter.helpers, HelperNames::default());
        assert_eq!(config.logging.format.as_deref(), Some("compact"));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rulegen.yaml");
        fs::write(
            &path,
            "converter:\n  input_file: input/rules.txt\n  unrecognized: todo\n  entity_files:\n    手袋(Ｌ０１): input/Glove.java\n  entity_instances:\n    手袋(Ｌ０１): glove\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.converter.input_file,
            Some(dir.path().join("input/rules.txt"))
        );
        let options = config.converter.to_options();
        assert_eq!(options.unrecognized, UnrecognizedPolicy::Todo);
        assert_eq!(
            options.entity_files.get("手袋(Ｌ０１)"),
            Some(&dir.path().join("input/Glove.java"))
        );
        assert_eq!(options.entity_instances["手袋(Ｌ０１)"], "glove");
    }

    #[test]
    fn test_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rulegen.json");
        fs::write(&path, r#"{"converter": {"mode": "line", "postprocess": true}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.converter.mode, ConversionMode::Line);
        assert!(config.converter.postprocess);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/rulegen.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_paths() {
        let dir = TempDir::new().unwrap();
        let entity = dir.path().join("Glove.java");
        fs::write(&entity, "public class Glove {}").unwrap();

        let mut config = Config::default();
        config.converter.entity_files.insert("手袋".to_string(), entity);
        config
            .converter
            .entity_files
            .insert("帽子".to_string(), dir.path().join("Hat.java"));

        let missing = config.missing_paths();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0, "converter.entity_files.帽子");
    }
}
