//! Golden test infrastructure for the rulegen transpilation engine
//!
//! Each case under `golden-corpus/cases/<name>/` carries the rule lines, the
//! entity sources they reference and the Java the transpiler is expected to
//! produce. Set `UPDATE_GOLDEN=1` to rewrite expectations from the current
//! output.

pub mod corpus;
pub mod diff;
pub mod runner;
pub mod snapshot;

use std::path::PathBuf;
use thiserror::Error;

pub use corpus::{CaseSpec, CorpusManager, GoldenCase};
pub use diff::{DiffEngine, DiffOptions, DiffResult};
pub use runner::{GoldenTestRunner, TestResult};
pub use snapshot::SnapshotManager;

/// Golden test error types
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Transpiler error: {0}")]
    Core(#[from] rulegen_core::Error),

    #[error("Snapshot mismatch: {0}")]
    SnapshotMismatch(String),

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("Test failed: {0}")]
    TestFailed(String),
}

pub type Result<T> = std::result::Result<T, GoldenError>;

/// Configuration for golden tests
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    /// Directory holding one subdirectory per case
    pub corpus_dir: PathBuf,

    /// Rewrite expectations that differ
    pub update_snapshots: bool,

    /// Create expectations that are missing
    pub create_missing: bool,

    /// Diff options
    pub diff_options: DiffOptions,

    /// Verbose output
    pub verbose: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        let update_snapshots = env_flag("UPDATE_GOLDEN");

        Self {
            corpus_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../golden-corpus/cases"),
            update_snapshots,
            create_missing: update_snapshots,
            diff_options: DiffOptions::default(),
            verbose: false,
        }
    }
}

impl GoldenConfig {
    /// Create config from environment and defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(corpus_dir) = std::env::var("GOLDEN_CORPUS_DIR") {
            config.corpus_dir = PathBuf::from(corpus_dir);
        }

        config.verbose = env_flag("GOLDEN_VERBOSE");
        config
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Macro for defining a golden test for one case
#[macro_export]
macro_rules! golden_test {
    ($name:ident, $case:expr) => {
        #[test]
        fn $name() {
            use $crate::{GoldenConfig, GoldenTestRunner};

            let runner = GoldenTestRunner::new(GoldenConfig::from_env());
            if let Err(e) = runner.run_case($case) {
                panic!("Golden test failed: {}: {}", $case, e);
            }
        }
    };
}

/// Macro for running every case whose name or tags match a pattern
#[macro_export]
macro_rules! golden_test_batch {
    ($pattern:expr) => {
        #[test]
        fn golden_tests() {
            use $crate::{GoldenConfig, GoldenTestRunner};

            let runner = GoldenTestRunner::new(GoldenConfig::from_env());
            if let Err(e) = runner.run_batch($pattern) {
                panic!("Golden test batch failed: {}: {}", $pattern, e);
            }
        }
    };
}
