//! Test corpus management for golden tests

use crate::{GoldenError, Result};
use rulegen_core::TranspileOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the case description file in every case directory
pub const CASE_FILE: &str = "case.yaml";

/// Contents of `case.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSpec {
    /// Description of what this tests
    pub description: String,

    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether this test is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Priority level (lower = higher priority)
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Rule lines, relative to the case directory
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Expected Java, relative to the case directory
    #[serde(default = "default_expected")]
    pub expected: PathBuf,

    /// Transpiler options; paths are relative to the case directory
    #[serde(default)]
    pub options: TranspileOptions,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    100
}

fn default_input() -> PathBuf {
    PathBuf::from("input.txt")
}

fn default_expected() -> PathBuf {
    PathBuf::from("expected.java")
}

/// A loaded case with its paths resolved
#[derive(Debug, Clone)]
pub struct GoldenCase {
    /// Directory name of the case
    pub name: String,
    pub dir: PathBuf,
    pub spec: CaseSpec,
}

impl GoldenCase {
    /// Path of the rule lines
    pub fn input_path(&self) -> PathBuf {
        self.dir.join(&self.spec.input)
    }

    /// Path of the expected output
    pub fn expected_path(&self) -> PathBuf {
        self.dir.join(&self.spec.expected)
    }

    /// Read the rule lines
    pub fn read_input(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(self.input_path())?;
        Ok(content
            .trim_start_matches('\u{feff}')
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// Manages the test corpus
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    /// Create a new corpus manager
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    /// Discover all cases in the corpus, ordered by priority then name
    pub fn discover(&self) -> Result<Vec<GoldenCase>> {
        let mut cases = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(cases);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.file_name() == Some(std::ffi::OsStr::new(CASE_FILE)) {
                if let Some(dir) = path.parent() {
                    match self.load_dir(dir) {
                        Ok(case) => cases.push(case),
                        Err(e) => eprintln!("Warning: Failed to load case {:?}: {}", path, e),
                    }
                }
            }
        }

        cases.sort_by(|a, b| {
            a.spec
                .priority
                .cmp(&b.spec.priority)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(cases)
    }

    /// Load a case by directory name
    pub fn load_case(&self, name: &str) -> Result<GoldenCase> {
        let dir = self.corpus_dir.join(name);
        if !dir.join(CASE_FILE).exists() {
            return Err(GoldenError::CorpusError(format!(
                "No {} in {}",
                CASE_FILE,
                dir.display()
            )));
        }
        self.load_dir(&dir)
    }

    fn load_dir(&self, dir: &Path) -> Result<GoldenCase> {
        let content = fs::read_to_string(dir.join(CASE_FILE))?;
        let mut spec: CaseSpec = serde_yaml::from_str(&content)?;

        for path in spec.options.entity_files.values_mut() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        if let Some(path) = spec.options.definitions_file.as_mut() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(GoldenCase {
            name,
            dir: dir.to_path_buf(),
            spec,
        })
    }

    /// Keep cases whose name or tags contain `pattern`; `*` keeps everything
    pub fn filter(&self, cases: Vec<GoldenCase>, pattern: &str) -> Vec<GoldenCase> {
        if pattern == "*" {
            return cases;
        }
        cases
            .into_iter()
            .filter(|c| c.name.contains(pattern) || c.spec.tags.iter().any(|t| t == pattern))
            .collect()
    }

    /// Get enabled cases only
    pub fn filter_enabled(&self, cases: Vec<GoldenCase>) -> Vec<GoldenCase> {
        cases.into_iter().filter(|c| c.spec.enabled).collect()
    }
}
